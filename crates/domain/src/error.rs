//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//!
//! ## 使用例
//!
//! ```rust
//! use quinta_domain::DomainError;
//!
//! fn validate_code(code: &str) -> Result<(), DomainError> {
//!     if code.is_empty() {
//!         return Err(DomainError::Validation("クライアントコードは必須です".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! let error = validate_code("").unwrap_err();
//! assert_eq!(error.to_string(), "バリデーションエラー: クライアントコードは必須です");
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// - 必須フィールドが未入力
    /// - 文字数制限の超過
    /// - 不正なフォーマット
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
