//! # ユーザー管理ハンドラ
//!
//! - `GET /api/auth/users` - ユーザー一覧
//! - `DELETE /api/auth/users/{id}` - ユーザー削除

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use quinta_domain::user::User;
use quinta_shared::ErrorResponse;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::{AuthState, MessageResponse};
use crate::error::ApiError;

/// ユーザー一覧の要素
///
/// パスワードハッシュは返さず、有無だけを返す。
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id:                 Uuid,
    pub email:              String,
    pub name:               Option<String>,
    pub has_password:       bool,
    pub has_google_account: bool,
    pub tax_id:             Option<String>,
    pub postal_code:        Option<String>,
    pub street:             Option<String>,
    pub phone:              Option<String>,
    pub mobile:             Option<String>,
    pub branch:             Option<String>,
    pub area:               Option<String>,
    pub user_type:          Option<String>,
    pub created_at:         DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        let profile = user.profile();
        Self {
            id:                 *user.id().as_uuid(),
            email:              user.email().as_str().to_string(),
            name:               user.name().map(str::to_string),
            has_password:       user.password_hash().is_some(),
            has_google_account: user.google_id().is_some(),
            tax_id:             profile.tax_id.clone(),
            postal_code:        profile.postal_code.clone(),
            street:             profile.street.clone(),
            phone:              profile.phone.clone(),
            mobile:             profile.mobile.clone(),
            branch:             profile.branch.clone(),
            area:               profile.area.clone(),
            user_type:          profile.user_type.clone(),
            created_at:         user.created_at(),
        }
    }
}

/// GET /api/auth/users
#[utoipa::path(
    get,
    path = "/api/auth/users",
    tag = "users",
    responses(
        (status = 200, description = "ユーザー一覧", body = Vec<UserDto>),
        (status = 500, description = "サーバーエラー", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<Arc<AuthState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.usecase.list_users().await?;
    let dtos: Vec<UserDto> = users.iter().map(UserDto::from).collect();
    Ok(Json(dtos))
}

/// DELETE /api/auth/users/{id}
#[utoipa::path(
    delete,
    path = "/api/auth/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "ユーザー ID")),
    responses(
        (status = 200, description = "削除成功", body = MessageResponse),
        (status = 404, description = "ユーザーが見つからない", body = ErrorResponse),
        (status = 500, description = "サーバーエラー", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AuthState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.usecase.delete_user(&id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
