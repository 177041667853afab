//! # インフラ層エラー定義
//!
//! データベース・外部 API・暗号処理で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターン:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! `From` 実装や convenience constructor でエラーを生成した時点の
//! スパン情報が [`SpanTrace`] として記録される。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使う:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::ExternalService { service, .. } => { /* Google 連携失敗 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー
    ///
    /// SQL クエリの実行失敗、接続エラー、マイグレーション失敗など。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// シリアライズ/デシリアライズエラー
    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    /// 外部サービス（Google OAuth など）との通信エラー
    #[error("{service} との通信に失敗: {message}")]
    ExternalService {
        /// サービス名（例: "google"）
        service: &'static str,
        message: String,
    },

    /// トークンの署名・検証エラー
    #[error("トークンエラー: {0}")]
    Token(String),

    /// パスワードハッシュ処理のエラー
    #[error("パスワードハッシュエラー: {0}")]
    PasswordHash(String),

    /// 永続化データの不整合
    ///
    /// DB に保存された値がドメインの制約を満たさない場合。
    #[error("データ不整合: {0}")]
    InvalidData(String),

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// InfraError を分解して InfraErrorKind と SpanTrace を取り出す
    pub fn into_parts(self) -> (InfraErrorKind, SpanTrace) {
        (self.kind, self.span_trace)
    }

    fn capture(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    // ===== Convenience constructors =====

    /// 外部サービスとの通信エラーを生成する
    pub fn external_service(service: &'static str, message: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::ExternalService {
            service,
            message: message.into(),
        })
    }

    /// トークンエラーを生成する
    pub fn token(msg: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::Token(msg.into()))
    }

    /// パスワードハッシュエラーを生成する
    pub fn password_hash(msg: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::PasswordHash(msg.into()))
    }

    /// データ不整合エラーを生成する
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::InvalidData(msg.into()))
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::Unexpected(msg.into()))
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self::capture(InfraErrorKind::Database(source))
    }
}

impl From<sqlx::migrate::MigrateError> for InfraError {
    fn from(source: sqlx::migrate::MigrateError) -> Self {
        Self::capture(InfraErrorKind::Database(sqlx::Error::Migrate(Box::new(
            source,
        ))))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self::capture(InfraErrorKind::Serialization(source))
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(source: reqwest::Error) -> Self {
        Self::external_service("google", source.to_string())
    }
}

impl From<quinta_domain::DomainError> for InfraError {
    fn from(source: quinta_domain::DomainError) -> Self {
        Self::invalid_data(source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    #[test]
    fn test_from_sqlx_errorでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("find_user_by_email");
            let _enter = span.enter();

            let err: InfraError = sqlx::Error::RowNotFound.into();

            assert!(matches!(err.kind(), InfraErrorKind::Database(_)));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("find_user_by_email"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn test_external_serviceでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("google_exchange_code");
            let _enter = span.enter();

            let err = InfraError::external_service("google", "invalid_grant");

            assert!(matches!(
                err.kind(),
                InfraErrorKind::ExternalService { service, message }
                    if *service == "google" && message == "invalid_grant"
            ));
            assert!(format!("{}", err.span_trace()).contains("google_exchange_code"));
        });
    }

    #[test]
    fn test_domain_errorはデータ不整合に変換される() {
        let domain = quinta_domain::DomainError::Validation("email".to_string());
        let err: InfraError = domain.into();

        assert!(matches!(err.kind(), InfraErrorKind::InvalidData(_)));
    }

    #[test]
    fn test_displayがinfra_error_kindのメッセージを出力する() {
        let err = InfraError::token("署名が不正");
        assert_eq!(format!("{err}"), "トークンエラー: 署名が不正");
    }

    #[test]
    fn test_sourceがinfra_error_kindに委譲する() {
        use std::error::Error;

        let err: InfraError = sqlx::Error::RowNotFound.into();
        assert!(err.source().is_some());

        let err = InfraError::unexpected("test");
        assert!(err.source().is_none());
    }
}
