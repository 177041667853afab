//! # Google OAuth クライアント
//!
//! Google サインインの外部連携部分を担当する。
//!
//! - 認可 URL の組み立て（[`GoogleOAuthConfig::authorization_url`]）
//! - 認可コードとアクセストークンの交換
//! - userinfo エンドポイントからのプロフィール取得
//!
//! OAuth プロトコル自体（PKCE、ID トークン検証など）は扱わない。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InfraError;

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const SCOPES: &str = "openid email profile";

/// Google OAuth の設定
#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id:     String,
    pub client_secret: String,
    pub redirect_uri:  String,
}

impl std::fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl GoogleOAuthConfig {
    /// 同意画面へのリダイレクト URL を組み立てる
    ///
    /// `state` はコールバック時にそのまま返ってくる値。
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{AUTHORIZATION_ENDPOINT}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        )
    }
}

/// userinfo エンドポイントのレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleUserInfo {
    /// Google アカウント ID
    pub id:    String,
    pub email: String,
    pub name:  Option<String>,
}

/// Google OAuth 連携トレイト
#[async_trait]
pub trait GoogleOAuthClient: Send + Sync {
    /// 認可 URL を返す
    fn authorization_url(&self, state: &str) -> String;

    /// 認可コードをアクセストークンに交換する
    async fn exchange_code(&self, code: &str) -> Result<String, InfraError>;

    /// アクセストークンでプロフィールを取得する
    async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, InfraError>;
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    code:          &'a str,
    client_id:     &'a str,
    client_secret: &'a str,
    redirect_uri:  &'a str,
    grant_type:    &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// reqwest による GoogleOAuthClient 実装
pub struct ReqwestGoogleOAuthClient {
    client: reqwest::Client,
    config: GoogleOAuthConfig,
}

impl ReqwestGoogleOAuthClient {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl GoogleOAuthClient for ReqwestGoogleOAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        self.config.authorization_url(state)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn exchange_code(&self, code: &str) -> Result<String, InfraError> {
        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&TokenRequest {
                code,
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                redirect_uri: &self.config.redirect_uri,
                grant_type: "authorization_code",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InfraError::external_service(
                "google",
                format!("トークン交換に失敗: {status} {body}"),
            ));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, InfraError> {
        let response = self
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InfraError::external_service(
                "google",
                format!("userinfo の取得に失敗: {status}"),
            ));
        }

        Ok(response.json().await?)
    }
}
