//! # Quinta 共有ユーティリティ
//!
//! サービス横断で使う、ビジネスロジックを含まないユーティリティ。
//!
//! - [`error_response`] - RFC 9457 エラーレスポンス
//! - [`health`] - ヘルスチェックのレスポンス型
//! - [`event_log`] - ビジネスイベントログの規約
//! - [`observability`] - トレーシング初期化・リクエストスパン
//! - `canonical_log` - リクエスト完了サマリ（`observability` feature）

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod error_response;
pub mod event_log;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
