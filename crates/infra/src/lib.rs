//! # Quinta インフラ層
//!
//! 外部システムとの接続・通信を担当する。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プールとマイグレーション
//! - **リポジトリ実装**: ユーザー・会社の永続化
//! - **メール送信**: SMTP / Noop
//! - **外部 API クライアント**: Google OAuth
//! - **暗号処理**: Argon2id パスワードハッシュ、JWT
//!
//! ## 依存関係
//!
//! ```text
//! auth-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL 接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - [`notification`] - メール送信
//! - [`google`] - Google OAuth クライアント
//! - [`password`] - パスワードハッシュ
//! - [`token`] - JWT 発行・検証

pub mod db;
pub mod error;
pub mod google;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod password;
pub mod repository;
pub mod token;

pub use error::InfraError;
pub use password::{Argon2PasswordService, PasswordService};
pub use token::{JwtTokenIssuer, TokenIssuer};
