//! # Auth Service 設定
//!
//! 環境変数から Auth Service の設定を読み込む。
//!
//! | 変数名 | 必須 | デフォルト |
//! |--------|------|-----------|
//! | `APP_HOST` | No | `0.0.0.0` |
//! | `APP_PORT` | No | `3000` |
//! | `DATABASE_URL` | **Yes** | |
//! | `JWT_SECRET` | **Yes** | |
//! | `JWT_TTL_SECONDS` | No | `3600` |
//! | `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET` | **Yes** | |
//! | `GOOGLE_REDIRECT_URI` | No | `http://localhost:3000/api/auth/google/callback` |
//! | `GOOGLE_FAILURE_REDIRECT` | No | `/` |
//! | `NOTIFICATION_BACKEND` | No | `noop`（`smtp` / `noop`） |
//! | `SMTP_HOST` / `SMTP_PORT` | No | `localhost` / `1025` |
//! | `SMTP_USERNAME` / `SMTP_PASSWORD` | No | 未設定なら認証なし |
//! | `NOTIFICATION_FROM_ADDRESS` | No | `noreply@quinta.example.com` |

use std::{collections::HashMap, str::FromStr};

use quinta_infra::{google::GoogleOAuthConfig, notification::SmtpCredentials};
use thiserror::Error;

/// 設定の読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// メール送信バックエンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationBackend {
    /// ログ出力のみ（開発用）
    Noop,
    Smtp {
        host:        String,
        port:        u16,
        credentials: Option<SmtpCredentials>,
    },
}

/// Auth Service の設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// バインドアドレス
    pub host:                    String,
    pub port:                    u16,
    /// データベース接続 URL
    pub database_url:            String,
    /// JWT 署名用の秘密鍵
    pub jwt_secret:              String,
    pub jwt_ttl_seconds:         i64,
    pub google:                  GoogleOAuthConfig,
    /// Google サインイン失敗時のリダイレクト先
    pub google_failure_redirect: String,
    pub notification_backend:    NotificationBackend,
    /// 送信元メールアドレス
    pub from_address:            String,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let notification_backend = match get("NOTIFICATION_BACKEND").as_deref() {
            None | Some("noop") => NotificationBackend::Noop,
            Some("smtp") => NotificationBackend::Smtp {
                host:        get("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
                port:        parse_or(get("SMTP_PORT"), "SMTP_PORT", 1025)?,
                credentials: match (get("SMTP_USERNAME"), get("SMTP_PASSWORD")) {
                    (Some(username), Some(password)) => {
                        Some(SmtpCredentials { username, password })
                    }
                    _ => None,
                },
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name:  "NOTIFICATION_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("APP_PORT"), "APP_PORT", 3000)?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_seconds: parse_or(get("JWT_TTL_SECONDS"), "JWT_TTL_SECONDS", 3600)?,
            google: GoogleOAuthConfig {
                client_id:     required("GOOGLE_CLIENT_ID")?,
                client_secret: required("GOOGLE_CLIENT_SECRET")?,
                redirect_uri:  get("GOOGLE_REDIRECT_URI").unwrap_or_else(|| {
                    "http://localhost:3000/api/auth/google/callback".to_string()
                }),
            },
            google_failure_redirect: get("GOOGLE_FAILURE_REDIRECT")
                .unwrap_or_else(|| "/".to_string()),
            notification_backend,
            from_address: get("NOTIFICATION_FROM_ADDRESS")
                .unwrap_or_else(|| "noreply@quinta.example.com".to_string()),
        })
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { name, value: v }),
    }
}
