//! # Auth Service エラー定義
//!
//! ユースケースのエラーを HTTP レスポンス（RFC 9457 Problem Details）に変換する。
//!
//! 5xx の `detail` は固定の `"Server error"`。原因は `error.category` / `error.kind`
//! 付きでログにのみ出力する。

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quinta_domain::{DomainError, notification::NotificationError};
use quinta_infra::{InfraError, error::InfraErrorKind};
use quinta_shared::{ErrorResponse, event_log::error};
use thiserror::Error;

use crate::usecase::{AuthError, CompanyError, InvitationError};

/// HTTP 境界のエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// リクエストボディ・クエリの形式不正
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 入力値のバリデーションエラー
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    #[error("会社が見つかりません")]
    CompanyNotFound,

    #[error("ユーザーが見つかりません")]
    UserNotFound,

    #[error("ユーザーは既に存在します")]
    UserAlreadyExists,

    #[error("認証に失敗しました")]
    InvalidCredentials,

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error("{context}: {source}")]
    Notification {
        context: &'static str,
        kind:    &'static str,
        #[source]
        source:  NotificationError,
    },

    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let DomainError::Validation(msg) = err;
        Self::Validation(msg)
    }
}

impl From<InvitationError> for ApiError {
    fn from(err: InvitationError) -> Self {
        match err {
            InvitationError::CompanyNotFound(_) => Self::CompanyNotFound,
            InvitationError::Persistence(e) => Self::Infra(e),
            InvitationError::Transport(source) => Self::Notification {
                context: "招待メールの送信に失敗",
                kind: error::kind::MAIL_TRANSPORT,
                source,
            },
            InvitationError::Template(source) => Self::Notification {
                context: "招待メールの生成に失敗",
                kind: error::kind::TEMPLATE,
                source,
            },
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserAlreadyExists => Self::UserAlreadyExists,
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::UserNotFound(_) => Self::UserNotFound,
            AuthError::InvalidOAuthState => Self::BadRequest("Invalid OAuth state".to_string()),
            AuthError::GoogleSignInFailed(e) | AuthError::Infra(e) => Self::Infra(e),
            AuthError::Validation(e) => e.into(),
        }
    }
}

impl From<CompanyError> for ApiError {
    fn from(err: CompanyError) -> Self {
        match err {
            CompanyError::Validation(e) => e.into(),
            CompanyError::Infra(e) => Self::Infra(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            ApiError::Validation(msg) => ErrorResponse::validation_error(msg.clone()),
            ApiError::CompanyNotFound => ErrorResponse::new(
                "company-not-found",
                "Not Found",
                404,
                "Company not found",
            ),
            ApiError::UserNotFound => {
                ErrorResponse::new("user-not-found", "Not Found", 404, "User not found")
            }
            ApiError::UserAlreadyExists => ErrorResponse::new(
                "user-already-exists",
                "Bad Request",
                400,
                "User already exists",
            ),
            ApiError::InvalidCredentials => ErrorResponse::new(
                "invalid-credentials",
                "Bad Request",
                400,
                "Invalid credentials",
            ),
            ApiError::Infra(e) => {
                log_infra_error(e);
                ErrorResponse::internal_error()
            }
            ApiError::Notification {
                context,
                kind,
                source,
            } => {
                tracing::error!(
                    error.category = error::category::INFRASTRUCTURE,
                    error.kind = *kind,
                    error = %source,
                    "{context}"
                );
                ErrorResponse::internal_error()
            }
            ApiError::Internal(msg) => {
                tracing::error!(
                    error.category = error::category::INFRASTRUCTURE,
                    error.kind = error::kind::INTERNAL,
                    "内部エラー: {msg}"
                );
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

fn log_infra_error(e: &InfraError) {
    let (category, kind) = match e.kind() {
        InfraErrorKind::Database(_) | InfraErrorKind::InvalidData(_) => {
            (error::category::INFRASTRUCTURE, error::kind::DATABASE)
        }
        InfraErrorKind::ExternalService { .. } => {
            (error::category::EXTERNAL_SERVICE, error::kind::OAUTH)
        }
        InfraErrorKind::Token(_) => (error::category::INFRASTRUCTURE, error::kind::TOKEN),
        InfraErrorKind::PasswordHash(_) => {
            (error::category::INFRASTRUCTURE, error::kind::PASSWORD_HASH)
        }
        InfraErrorKind::Serialization(_) | InfraErrorKind::Unexpected(_) => {
            (error::category::INFRASTRUCTURE, error::kind::INTERNAL)
        }
    };

    tracing::error!(
        error.category = category,
        error.kind = kind,
        span_trace = %e.span_trace(),
        "インフラエラー: {e}"
    );
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    async fn into_parts(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[rstest]
    #[case::会社なし(ApiError::CompanyNotFound, 404, "Company not found")]
    #[case::ユーザーなし(ApiError::UserNotFound, 404, "User not found")]
    #[case::登録済み(ApiError::UserAlreadyExists, 400, "User already exists")]
    #[case::認証失敗(ApiError::InvalidCredentials, 400, "Invalid credentials")]
    #[case::内部エラー(ApiError::Internal("boom".to_string()), 500, "Server error")]
    #[tokio::test]
    async fn test_エラーごとのステータスとdetail(
        #[case] err: ApiError,
        #[case] status: u16,
        #[case] detail: &str,
    ) {
        let (actual_status, json) = into_parts(err).await;

        assert_eq!(actual_status.as_u16(), status);
        assert_eq!(json["status"], status);
        assert_eq!(json["detail"], detail);
    }

    #[tokio::test]
    async fn test_送信失敗は原因を隠して500を返す() {
        let err: ApiError = InvitationError::Transport(NotificationError::SendFailed(
            "smtp.example.com: connection refused".to_string(),
        ))
        .into();

        let (status, json) = into_parts(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["detail"], "Server error");
        assert!(!json.to_string().contains("smtp.example.com"));
    }

    #[tokio::test]
    async fn test_データベースエラーは500() {
        let err: ApiError = InvitationError::Persistence(sqlx::Error::PoolTimedOut.into()).into();

        let (status, json) = into_parts(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json["type"],
            "https://quinta.example.com/errors/internal-error"
        );
    }

    #[tokio::test]
    async fn test_バリデーションエラーは400() {
        let err: ApiError =
            CompanyError::Validation(DomainError::Validation("クライアントコードは必須です".to_string()))
                .into();

        let (status, json) = into_parts(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["type"],
            "https://quinta.example.com/errors/validation-error"
        );
    }
}
