//! # 会社管理ハンドラ
//!
//! - `GET /api/companies` - 会社一覧
//! - `POST /api/companies` - 会社登録

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use quinta_domain::company::{Company, CompanyDetails};
use quinta_shared::ErrorResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::ApiError,
    usecase::{CompanyUseCase, CreateCompanyInput},
};

pub struct CompanyState {
    pub usecase: Arc<dyn CompanyUseCase>,
}

/// 会社登録リクエスト
///
/// 旧 API のスペイン語キーも受け付ける。
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    #[serde(alias = "cliente")]
    pub client_code:     String,
    #[serde(default, alias = "nombre")]
    pub name:            Option<String>,
    #[serde(default, alias = "RFC")]
    pub tax_id:          Option<String>,
    #[serde(default, alias = "CP")]
    pub postal_code:     Option<String>,
    #[serde(default, alias = "domicilio")]
    pub street:          Option<String>,
    #[serde(default, alias = "telefonos")]
    pub phones:          Option<String>,
    #[serde(default, alias = "representante")]
    pub representative:  Option<String>,
    #[serde(default)]
    pub email:           Option<String>,
    #[serde(default)]
    pub ip:              Option<String>,
    #[serde(default, alias = "usermaster")]
    pub master_user:     Option<String>,
    /// 平文。保存前にハッシュ化される
    #[serde(default, alias = "passmaster")]
    pub master_password: Option<String>,
    #[serde(default, alias = "utilidad")]
    pub profit_margin:   Option<f64>,
}

impl From<CreateCompanyRequest> for CreateCompanyInput {
    fn from(req: CreateCompanyRequest) -> Self {
        Self {
            client_code:     req.client_code,
            details:         CompanyDetails {
                name:           req.name,
                tax_id:         req.tax_id,
                postal_code:    req.postal_code,
                street:         req.street,
                phones:         req.phones,
                representative: req.representative,
                email:          req.email,
                ip:             req.ip,
                master_user:    req.master_user,
            },
            master_password: req.master_password,
            profit_margin:   req.profit_margin,
        }
    }
}

/// 会社（マスターパスワードのハッシュは含めない）
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDto {
    pub id:                  Uuid,
    pub client_code:         String,
    pub name:                Option<String>,
    pub tax_id:              Option<String>,
    pub postal_code:         Option<String>,
    pub street:              Option<String>,
    pub phones:              Option<String>,
    pub representative:      Option<String>,
    pub email:               Option<String>,
    pub ip:                  Option<String>,
    pub master_user:         Option<String>,
    pub has_master_password: bool,
    pub profit_margin:       f64,
    pub registered_at:       DateTime<Utc>,
}

impl From<&Company> for CompanyDto {
    fn from(company: &Company) -> Self {
        let details = company.details().clone();
        Self {
            id:                  *company.id().as_uuid(),
            client_code:         company.client_code().as_str().to_string(),
            name:                details.name,
            tax_id:              details.tax_id,
            postal_code:         details.postal_code,
            street:              details.street,
            phones:              details.phones,
            representative:      details.representative,
            email:               details.email,
            ip:                  details.ip,
            master_user:         details.master_user,
            has_master_password: company.master_password_hash().is_some(),
            profit_margin:       company.profit_margin(),
            registered_at:       company.registered_at(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateCompanyResponse {
    pub message: String,
    pub company: CompanyDto,
}

/// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "companies",
    responses(
        (status = 200, description = "会社一覧", body = Vec<CompanyDto>),
        (status = 500, description = "サーバーエラー", body = ErrorResponse)
    )
)]
pub async fn list_companies(
    State(state): State<Arc<CompanyState>>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = state.usecase.list_companies().await?;
    let dtos: Vec<CompanyDto> = companies.iter().map(CompanyDto::from).collect();
    Ok(Json(dtos))
}

/// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "登録成功", body = CreateCompanyResponse),
        (status = 400, description = "入力不正", body = ErrorResponse),
        (status = 500, description = "サーバーエラー", body = ErrorResponse)
    )
)]
pub async fn create_company(
    State(state): State<Arc<CompanyState>>,
    payload: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let company = state.usecase.create_company(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCompanyResponse {
            message: "Company added successfully".to_string(),
            company: CompanyDto::from(&company),
        }),
    ))
}
