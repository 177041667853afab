//! # 通知送信
//!
//! メール送信を担当するインフラストラクチャモジュール。
//!
//! - `NotificationSender` trait でメール送信を抽象化する
//! - 実装は SMTP（lettre）と Noop（ログ出力のみ）
//! - `NOTIFICATION_BACKEND` で起動時に選択する
//!
//! 送信はリクエスト内で同期的に 1 通ずつ行い、再送はしない。

mod noop;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopNotificationSender;
use quinta_domain::notification::{EmailMessage, NotificationError};
pub use smtp::{SmtpCredentials, SmtpNotificationSender};

/// メール送信トレイト
///
/// 送信元アドレスは実装側が保持する。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを 1 通送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
