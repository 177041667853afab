//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` でメールを送信する。
//! 認証情報がなければ平文 SMTP（Mailpit 等のローカルサーバー向け）、
//! あれば STARTTLS + 認証で接続する。

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use quinta_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// SMTP 認証情報
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// SMTP 通知送信
pub struct SmtpNotificationSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: Mailbox,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "localhost"）
    /// - `port`: SMTP サーバーのポート番号（例: 1025 for Mailpit）
    /// - `from_address`: 送信元メールアドレス
    /// - `credentials`: 認証情報（`None` なら認証なし・TLS なし）
    ///
    /// # Errors
    ///
    /// 送信元アドレスの形式が不正な場合、TLS 設定に失敗した場合
    pub fn new(
        host: &str,
        port: u16,
        from_address: &str,
        credentials: Option<SmtpCredentials>,
    ) -> Result<Self, NotificationError> {
        let from_address: Mailbox = from_address
            .parse()
            .map_err(|e| NotificationError::SendFailed(format!("送信元アドレス不正: {e}")))?;

        let transport = match credentials {
            Some(SmtpCredentials { username, password }) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| NotificationError::SendFailed(format!("TLS 設定失敗: {e}")))?
                    .port(port)
                    .credentials(Credentials::new(username, password))
                    .build()
            }
            None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .port(port)
                .build(),
        };

        Ok(Self {
            transport,
            from_address,
        })
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?;

        Message::builder()
            .from(self.from_address.clone())
            .to(to)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    #[tracing::instrument(skip_all, level = "debug", fields(to = %email.to))]
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation() -> EmailMessage {
        EmailMessage {
            to:        "b@x.com".to_string(),
            subject:   "Invitation for Acme".to_string(),
            html_body: "<p>Dear client</p>".to_string(),
            text_body: "Dear client".to_string(),
        }
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpNotificationSender>();
    }

    #[tokio::test]
    async fn 不正な送信元アドレスは作成時にエラーになる() {
        let result = SmtpNotificationSender::new("localhost", 1025, "not an address", None);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn html本文とテキスト本文を持つメッセージを組み立てる() {
        let sender =
            SmtpNotificationSender::new("localhost", 1025, "noreply@quinta.example.com", None)
                .unwrap();

        let message = sender.build_message(&invitation()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Invitation for Acme"));
        assert!(raw.contains("To: b@x.com"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
    }

    #[tokio::test]
    async fn 不正な宛先はメッセージ構築時にエラーになる() {
        let sender =
            SmtpNotificationSender::new("localhost", 1025, "noreply@quinta.example.com", None)
                .unwrap();
        let mut email = invitation();
        email.to = "broken".to_string();

        assert!(matches!(
            sender.build_message(&email),
            Err(NotificationError::SendFailed(_))
        ));
    }

    #[test]
    fn 認証情報のdebug出力はパスワードをマスクする() {
        let credentials = SmtpCredentials {
            username: "mailer".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("mailer"));
        assert!(!debug.contains("hunter2"));
    }
}
