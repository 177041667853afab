//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はサービス側の責務
//! - よく使うエラー種別は便利コンストラクタで提供する

use serde::{Deserialize, Serialize};

/// error_type URI のベースパス
const ERROR_TYPE_BASE: &str = "https://quinta.example.com/errors";

/// エラーレスポンス（RFC 9457 Problem Details）
///
/// `detail` は利用者向けメッセージ（英語）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

impl ErrorResponse {
    /// 汎用コンストラクタ
    ///
    /// `error_type_suffix` はベース URI に付加される（例: `"company-not-found"`）。
    pub fn new(
        error_type_suffix: &str,
        title: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            error_type: format!("{ERROR_TYPE_BASE}/{error_type_suffix}"),
            title: title.into(),
            status,
            detail: detail.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("bad-request", "Bad Request", 400, detail)
    }

    /// 400 Validation Error
    pub fn validation_error(detail: impl Into<String>) -> Self {
        Self::new("validation-error", "Validation Error", 400, detail)
    }

    /// 401 Unauthorized
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new("unauthorized", "Unauthorized", 401, detail)
    }

    /// 404 Not Found
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("not-found", "Not Found", 404, detail)
    }

    /// 500 Internal Server Error
    ///
    /// detail は固定値。原因はログにのみ出力する。
    pub fn internal_error() -> Self {
        Self::new("internal-error", "Internal Server Error", 500, "Server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newで全フィールドが設定される() {
        let error = ErrorResponse::new("company-not-found", "Not Found", 404, "Company not found");

        assert_eq!(
            error.error_type,
            "https://quinta.example.com/errors/company-not-found"
        );
        assert_eq!(error.title, "Not Found");
        assert_eq!(error.status, 404);
        assert_eq!(error.detail, "Company not found");
    }

    #[test]
    fn test_internal_errorは固定のdetailを返す() {
        let error = ErrorResponse::internal_error();

        assert_eq!(error.status, 500);
        assert_eq!(error.detail, "Server error");
    }

    #[test]
    fn test_jsonではtypeフィールド名になる() {
        let json = serde_json::to_value(ErrorResponse::bad_request("Invalid credentials")).unwrap();

        assert_eq!(json["type"], "https://quinta.example.com/errors/bad-request");
        assert_eq!(json["status"], 400);
        assert_eq!(json["detail"], "Invalid credentials");
        assert!(json.get("error_type").is_none());
    }

    #[test]
    fn test_便利コンストラクタのstatus() {
        assert_eq!(ErrorResponse::validation_error("").status, 400);
        assert_eq!(ErrorResponse::unauthorized("").status, 401);
        assert_eq!(ErrorResponse::not_found("").status, 404);
    }
}
