//! # 認証ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/auth/register` - メール + パスワードでユーザー登録
//! - `POST /api/auth/login` - ログイン（アクセストークン発行）
//! - `GET /api/auth/google` - Google の同意画面へリダイレクト
//! - `GET /api/auth/google/callback` - Google からのコールバック

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query,
        State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use quinta_domain::user::UserProfile;
use quinta_shared::ErrorResponse;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::ApiError,
    usecase::{AuthUseCase, AuthenticatedUser, RegisterInput},
};

/// 認証ハンドラの共有状態
pub struct AuthState {
    pub usecase:                 Arc<dyn AuthUseCase>,
    /// Google サインイン失敗時のリダイレクト先
    pub google_failure_redirect: String,
}

// --- リクエスト/レスポンス型 ---

/// ユーザー登録リクエスト
///
/// プロフィール項目は任意。旧 API のスペイン語キーも受け付ける。
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email:           String,
    pub password:        String,
    #[serde(default, alias = "nombre")]
    pub name:            Option<String>,
    #[serde(default, alias = "RFC")]
    pub tax_id:          Option<String>,
    #[serde(default, alias = "CP")]
    pub postal_code:     Option<String>,
    #[serde(default, alias = "calle")]
    pub street:          Option<String>,
    #[serde(default, alias = "noexterior")]
    pub exterior_number: Option<String>,
    #[serde(default, alias = "nointerior")]
    pub interior_number: Option<String>,
    #[serde(default, alias = "colonia")]
    pub neighbourhood:   Option<String>,
    #[serde(default, alias = "estado")]
    pub state:           Option<String>,
    #[serde(default, alias = "localidad")]
    pub locality:        Option<String>,
    #[serde(default, alias = "municipio")]
    pub municipality:    Option<String>,
    #[serde(default, alias = "telefono")]
    pub phone:           Option<String>,
    #[serde(default, alias = "celular")]
    pub mobile:          Option<String>,
    #[serde(default, alias = "sucursal")]
    pub branch:          Option<String>,
    #[serde(default)]
    pub area:            Option<String>,
    #[serde(default, alias = "tipoUsuario")]
    pub user_type:       Option<String>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email:    req.email,
            password: req.password,
            name:     req.name,
            profile:  UserProfile {
                tax_id:          req.tax_id,
                postal_code:     req.postal_code,
                street:          req.street,
                exterior_number: req.exterior_number,
                interior_number: req.interior_number,
                neighbourhood:   req.neighbourhood,
                state:           req.state,
                locality:        req.locality,
                municipality:    req.municipality,
                phone:           req.phone,
                mobile:          req.mobile,
                branch:          req.branch,
                area:            req.area,
                user_type:       req.user_type,
            },
        }
    }
}

/// 処理結果メッセージ
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// ログインリクエスト
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email:    String,
    pub password: String,
}

/// ログイン・Google サインインのレスポンス
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token:      String,
    pub expires_at: DateTime<Utc>,
    pub user_id:    Uuid,
    pub email:      String,
    pub name:       Option<String>,
}

impl From<AuthenticatedUser> for TokenResponse {
    fn from(auth: AuthenticatedUser) -> Self {
        Self {
            token:      auth.token,
            expires_at: auth.expires_at,
            user_id:    *auth.user_id.as_uuid(),
            email:      auth.email.into_string(),
            name:       auth.name,
        }
    }
}

/// Google コールバックのクエリ
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GoogleCallbackQuery {
    pub code:  Option<String>,
    pub state: Option<String>,
    /// ユーザーが同意を拒否した場合などに Google が付与する
    pub error: Option<String>,
}

// --- ハンドラ ---

/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "登録成功", body = MessageResponse),
        (status = 400, description = "登録済みまたは入力不正", body = ErrorResponse),
        (status = 500, description = "サーバーエラー", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AuthState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    state.usecase.register(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /api/auth/login
///
/// ユーザーが存在しない場合もダミー検証で処理時間を均一化する。
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "ログイン成功", body = TokenResponse),
        (status = 400, description = "認証失敗", body = ErrorResponse),
        (status = 500, description = "サーバーエラー", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AuthState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let authenticated = state.usecase.login(&req.email, &req.password).await?;

    Ok(Json(TokenResponse::from(authenticated)))
}

/// GET /api/auth/google
#[utoipa::path(
    get,
    path = "/api/auth/google",
    tag = "auth",
    responses(
        (status = 302, description = "Google の同意画面へリダイレクト")
    )
)]
pub async fn google_sign_in(State(state): State<Arc<AuthState>>) -> Result<Response, ApiError> {
    let url = state.usecase.google_authorization_url()?;
    Ok(found(&url))
}

/// GET /api/auth/google/callback
///
/// 成功時はアクセストークンを返す。失敗時は設定されたリダイレクト先へ戻す。
#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    tag = "auth",
    params(GoogleCallbackQuery),
    responses(
        (status = 200, description = "サインイン成功", body = TokenResponse),
        (status = 302, description = "サインイン失敗（失敗時のリダイレクト先へ）")
    )
)]
pub async fn google_callback(
    State(state): State<Arc<AuthState>>,
    query: Result<Query<GoogleCallbackQuery>, QueryRejection>,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Google コールバックのクエリが不正");
            return found(&state.google_failure_redirect);
        }
    };

    let (Some(code), Some(oauth_state)) = (params.code, params.state) else {
        tracing::warn!(
            provider_error = params.error.as_deref().unwrap_or("-"),
            "Google コールバックに code または state がない"
        );
        return found(&state.google_failure_redirect);
    };

    match state.usecase.google_callback(&code, &oauth_state).await {
        Ok(authenticated) => Json(TokenResponse::from(authenticated)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Google サインインに失敗");
            found(&state.google_failure_redirect)
        }
    }
}

/// 302 Found でリダイレクトする
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
