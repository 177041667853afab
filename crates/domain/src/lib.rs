//! # Quinta ドメイン層
//!
//! 認証サービスのドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! auth-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、SMTP、外部 API）に依存しない。
//!
//! ## モジュール構成
//!
//! - [`company`] - 会社（招待メールの差出元）
//! - [`user`] - ユーザーと招待可否の判定
//! - [`invitation`] - 招待メール送信の入力と結果
//! - [`password`] - パスワード関連の値オブジェクト
//! - [`notification`] - メールメッセージと送信エラー
//! - [`clock`] - 時刻プロバイダ
//!
//! ## 使用例
//!
//! ```rust
//! use quinta_domain::{DomainError, value_objects::ClientCode};
//!
//! let code = ClientCode::new(" Acme ")?;
//! assert_eq!(code.as_str(), "acme");
//!
//! let error = ClientCode::new("   ").unwrap_err();
//! assert!(matches!(error, DomainError::Validation(_)));
//! # Ok::<(), DomainError>(())
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod company;
pub mod error;
pub mod invitation;
pub mod notification;
pub mod password;
pub mod user;
pub mod value_objects;

pub use error::DomainError;
