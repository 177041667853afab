//! 会社（クライアント）管理ユースケース

use std::sync::Arc;

use quinta_domain::{
    DomainError,
    clock::Clock,
    company::{Company, CompanyDetails},
    password::PlainPassword,
    value_objects::ClientCode,
};
use quinta_infra::{InfraError, PasswordService, repository::CompanyRepository};
use quinta_shared::{event_log::event, log_business_event};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompanyError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

/// 会社登録の入力
#[derive(Debug, Default)]
pub struct CreateCompanyInput {
    pub client_code:     String,
    pub details:         CompanyDetails,
    /// マスターパスワード（平文）。空なら設定しない
    pub master_password: Option<String>,
    pub profit_margin:   Option<f64>,
}

pub struct CompanyUseCaseImpl {
    company_repository: Arc<dyn CompanyRepository>,
    password_service:   Arc<dyn PasswordService>,
    clock:              Arc<dyn Clock>,
}

impl CompanyUseCaseImpl {
    pub fn new(
        company_repository: Arc<dyn CompanyRepository>,
        password_service: Arc<dyn PasswordService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            company_repository,
            password_service,
            clock,
        }
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>, CompanyError> {
        Ok(self.company_repository.find_all().await?)
    }

    /// 会社を登録する
    ///
    /// クライアントコードは小文字に正規化される。
    /// マスターパスワードは Argon2id でハッシュ化してから保存する。
    pub async fn create_company(&self, input: CreateCompanyInput) -> Result<Company, CompanyError> {
        let client_code = ClientCode::new(input.client_code)?;
        input.details.validate()?;

        let master_password_hash = match input.master_password.filter(|p| !p.is_empty()) {
            Some(password) => {
                let password = PlainPassword::for_registration(password)?;
                Some(self.password_service.hash(&password)?)
            }
            None => None,
        };

        let company = Company::new(
            client_code,
            input.details,
            master_password_hash,
            input.profit_margin.unwrap_or(0.0),
            self.clock.now(),
        );
        self.company_repository.insert(&company).await?;

        log_business_event!(
            event.category = event::category::COMPANY,
            event.action = event::action::COMPANY_CREATED,
            event.entity_type = event::entity_type::COMPANY,
            event.entity_id = %company.id(),
            event.result = event::result::SUCCESS,
            company.client_code = %company.client_code(),
            "会社登録"
        );

        Ok(company)
    }
}
