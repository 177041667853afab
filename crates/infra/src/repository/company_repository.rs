//! # CompanyRepository
//!
//! 会社情報の永続化を担当するリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quinta_domain::{
    company::{Company, CompanyDetails, CompanyId},
    password::PasswordHash,
    value_objects::ClientCode,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// 会社リポジトリトレイト
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, InfraError>;

    /// 全会社を登録日時順で取得する
    async fn find_all(&self) -> Result<Vec<Company>, InfraError>;

    async fn insert(&self, company: &Company) -> Result<(), InfraError>;
}

const COMPANY_COLUMNS: &str = r#"
    id, client_code, name, tax_id, postal_code, street, phones,
    representative, email, ip, master_user, master_password_hash,
    profit_margin, registered_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    client_code: String,
    name: Option<String>,
    tax_id: Option<String>,
    postal_code: Option<String>,
    street: Option<String>,
    phones: Option<String>,
    representative: Option<String>,
    email: Option<String>,
    ip: Option<String>,
    master_user: Option<String>,
    master_password_hash: Option<String>,
    profit_margin: f64,
    registered_at: DateTime<Utc>,
}

impl TryFrom<CompanyRow> for Company {
    type Error = InfraError;

    fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
        Ok(Company::from_db(
            CompanyId::from_uuid(row.id),
            ClientCode::new(row.client_code)?,
            CompanyDetails {
                name:           row.name,
                tax_id:         row.tax_id,
                postal_code:    row.postal_code,
                street:         row.street,
                phones:         row.phones,
                representative: row.representative,
                email:          row.email,
                ip:             row.ip,
                master_user:    row.master_user,
            },
            PasswordHash::from_optional(row.master_password_hash),
            row.profit_margin,
            row.registered_at,
        ))
    }
}

/// PostgreSQL 実装の CompanyRepository
#[derive(Debug, Clone)]
pub struct PostgresCompanyRepository {
    pool: PgPool,
}

impl PostgresCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, InfraError> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1");
        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Company::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Company>, InfraError> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY registered_at, id");
        let rows = sqlx::query_as::<_, CompanyRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Company::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(company_id = %company.id()))]
    async fn insert(&self, company: &Company) -> Result<(), InfraError> {
        let details = company.details();
        sqlx::query(
            r#"
            INSERT INTO companies (
                id, client_code, name, tax_id, postal_code, street, phones,
                representative, email, ip, master_user, master_password_hash,
                profit_margin, registered_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(company.id().as_uuid())
        .bind(company.client_code().as_str())
        .bind(details.name.as_deref())
        .bind(details.tax_id.as_deref())
        .bind(details.postal_code.as_deref())
        .bind(details.street.as_deref())
        .bind(details.phones.as_deref())
        .bind(details.representative.as_deref())
        .bind(details.email.as_deref())
        .bind(details.ip.as_deref())
        .bind(details.master_user.as_deref())
        .bind(company.master_password_hash().map(PasswordHash::as_str))
        .bind(company.profit_margin())
        .bind(company.registered_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
