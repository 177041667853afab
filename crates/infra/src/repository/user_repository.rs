//! # UserRepository
//!
//! ユーザー情報の永続化を担当するリポジトリ。
//!
//! メールアドレスには一意制約がないため、同じアドレスの行が複数ある場合は
//! 作成日時が最も古い行を返す。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quinta_domain::{
    password::PasswordHash,
    user::{Email, User, UserId, UserProfile},
    value_objects::GoogleId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;

    /// メールアドレスでユーザーを検索する
    ///
    /// 完全一致。複数行ある場合は最も古いユーザーを返す。
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError>;

    async fn find_by_google_id(&self, google_id: &GoogleId) -> Result<Option<User>, InfraError>;

    /// 全ユーザーを作成日時順で取得する
    async fn find_all(&self) -> Result<Vec<User>, InfraError>;

    async fn insert(&self, user: &User) -> Result<(), InfraError>;

    /// 既存ユーザーに Google ID を紐付ける
    async fn link_google_id(&self, id: &UserId, google_id: &GoogleId) -> Result<(), InfraError>;

    /// ユーザーを削除する
    ///
    /// 削除した場合は `true`、該当がなければ `false` を返す。
    async fn delete(&self, id: &UserId) -> Result<bool, InfraError>;
}

const USER_COLUMNS: &str = r#"
    id, email, password_hash, google_id, name,
    tax_id, postal_code, street, exterior_number, interior_number,
    neighbourhood, state, locality, municipality, phone, mobile,
    branch, area, user_type, created_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: Option<String>,
    google_id: Option<String>,
    name: Option<String>,
    tax_id: Option<String>,
    postal_code: Option<String>,
    street: Option<String>,
    exterior_number: Option<String>,
    interior_number: Option<String>,
    neighbourhood: Option<String>,
    state: Option<String>,
    locality: Option<String>,
    municipality: Option<String>,
    phone: Option<String>,
    mobile: Option<String>,
    branch: Option<String>,
    area: Option<String>,
    user_type: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = InfraError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::from_db(
            UserId::from_uuid(row.id),
            Email::new(row.email)?,
            PasswordHash::from_optional(row.password_hash),
            row.google_id
                .filter(|g| !g.trim().is_empty())
                .map(GoogleId::new)
                .transpose()?,
            row.name,
            UserProfile {
                tax_id:          row.tax_id,
                postal_code:     row.postal_code,
                street:          row.street,
                exterior_number: row.exterior_number,
                interior_number: row.interior_number,
                neighbourhood:   row.neighbourhood,
                state:           row.state,
                locality:        row.locality,
                municipality:    row.municipality,
                phone:           row.phone,
                mobile:          row.mobile,
                branch:          row.branch,
                area:            row.area,
                user_type:       row.user_type,
            },
            row.created_at,
        ))
    }
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        condition: &str,
        value: &str,
    ) -> Result<Option<User>, InfraError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {condition} ORDER BY created_at, id LIMIT 1"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
        self.fetch_one_where("email = $1", email.as_str()).await
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_google_id(&self, google_id: &GoogleId) -> Result<Option<User>, InfraError> {
        self.fetch_one_where("google_id = $1", google_id.as_str())
            .await
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<User>, InfraError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %user.id()))]
    async fn insert(&self, user: &User) -> Result<(), InfraError> {
        let profile = user.profile();
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, google_id, name,
                tax_id, postal_code, street, exterior_number, interior_number,
                neighbourhood, state, locality, municipality, phone, mobile,
                branch, area, user_type, created_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            )
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email().as_str())
        .bind(user.password_hash().map(PasswordHash::as_str))
        .bind(user.google_id().map(GoogleId::as_str))
        .bind(user.name())
        .bind(profile.tax_id.as_deref())
        .bind(profile.postal_code.as_deref())
        .bind(profile.street.as_deref())
        .bind(profile.exterior_number.as_deref())
        .bind(profile.interior_number.as_deref())
        .bind(profile.neighbourhood.as_deref())
        .bind(profile.state.as_deref())
        .bind(profile.locality.as_deref())
        .bind(profile.municipality.as_deref())
        .bind(profile.phone.as_deref())
        .bind(profile.mobile.as_deref())
        .bind(profile.branch.as_deref())
        .bind(profile.area.as_deref())
        .bind(profile.user_type.as_deref())
        .bind(user.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn link_google_id(&self, id: &UserId, google_id: &GoogleId) -> Result<(), InfraError> {
        sqlx::query("UPDATE users SET google_id = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(google_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &UserId) -> Result<bool, InfraError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
