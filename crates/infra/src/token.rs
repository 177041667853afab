//! # トークン発行
//!
//! HS256 の JWT でアクセストークンと OAuth の `state` を発行・検証する。
//!
//! | トークン | `aud` | 有効期間 |
//! |---------|-------|---------|
//! | アクセストークン | なし | 設定値（既定 1 時間） |
//! | OAuth state | `google-oauth-state` | 10 分 |
//!
//! `aud` の有無で用途を区別するため、state をアクセストークンとして使うことはできない。

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use quinta_domain::user::User;
use serde::{Deserialize, Serialize};

use crate::error::InfraError;

const STATE_AUDIENCE: &str = "google-oauth-state";
const STATE_TTL_SECONDS: i64 = 600;

/// アクセストークンのクレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// ユーザー ID
    pub sub:   String,
    pub email: String,
    pub iat:   i64,
    pub exp:   i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    aud:   String,
    nonce: String,
    iat:   i64,
    exp:   i64,
}

/// 発行済みトークン
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token:      String,
    pub expires_at: DateTime<Utc>,
}

/// トークン発行・検証トレイト
pub trait TokenIssuer: Send + Sync {
    /// ユーザーのアクセストークンを発行する
    fn issue_access_token(&self, user: &User, now: DateTime<Utc>)
    -> Result<IssuedToken, InfraError>;

    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, InfraError>;

    /// OAuth の `state` を発行する
    fn issue_state(&self, now: DateTime<Utc>) -> Result<String, InfraError>;

    fn verify_state(&self, state: &str) -> Result<(), InfraError>;
}

/// jsonwebtoken による TokenIssuer 実装
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl:          Duration,
}

impl JwtTokenIssuer {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl:          Duration::seconds(ttl_seconds),
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_access_token(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, InfraError> {
        let expires_at = now + self.ttl;
        let claims = AccessClaims {
            sub:   user.id().to_string(),
            email: user.email().to_string(),
            iat:   now.timestamp(),
            exp:   expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| InfraError::token(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, InfraError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| InfraError::token(e.to_string()))?;
        Ok(data.claims)
    }

    fn issue_state(&self, now: DateTime<Utc>) -> Result<String, InfraError> {
        let claims = StateClaims {
            aud:   STATE_AUDIENCE.to_string(),
            nonce: uuid::Uuid::new_v4().to_string(),
            iat:   now.timestamp(),
            exp:   (now + Duration::seconds(STATE_TTL_SECONDS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| InfraError::token(e.to_string()))
    }

    fn verify_state(&self, state: &str) -> Result<(), InfraError> {
        let mut validation = Validation::default();
        validation.set_audience(&[STATE_AUDIENCE]);

        decode::<StateClaims>(state, &self.decoding_key, &validation)
            .map_err(|e| InfraError::token(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quinta_domain::{
        password::PasswordHash,
        user::{Email, UserProfile},
    };
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::new("test-secret-key-for-testing-only", 3600)
    }

    #[fixture]
    fn user() -> User {
        User::registered(
            Email::new("a@x.com").unwrap(),
            PasswordHash::new("$argon2id$stub"),
            None,
            UserProfile::default(),
            Utc::now(),
        )
    }

    #[rstest]
    fn test_発行したアクセストークンを検証できる(issuer: JwtTokenIssuer, user: User) {
        let now = Utc::now();
        let issued = issuer.issue_access_token(&user, now).unwrap();

        let claims = issuer.verify_access_token(&issued.token).unwrap();

        assert_eq!(claims.sub, user.id().to_string());
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[rstest]
    fn test_異なる秘密鍵のトークンは拒否される(issuer: JwtTokenIssuer, user: User) {
        let other = JwtTokenIssuer::new("wrong-secret", 3600);
        let issued = other.issue_access_token(&user, Utc::now()).unwrap();

        assert!(issuer.verify_access_token(&issued.token).is_err());
    }

    #[rstest]
    fn test_期限切れのトークンは拒否される(issuer: JwtTokenIssuer, user: User) {
        let long_ago = Utc::now() - Duration::hours(3);
        let issued = issuer.issue_access_token(&user, long_ago).unwrap();

        assert!(issuer.verify_access_token(&issued.token).is_err());
    }

    #[rstest]
    fn test_stateを発行して検証できる(issuer: JwtTokenIssuer) {
        let state = issuer.issue_state(Utc::now()).unwrap();
        assert!(issuer.verify_state(&state).is_ok());
    }

    #[rstest]
    fn test_stateとアクセストークンは取り違えられない(issuer: JwtTokenIssuer, user: User) {
        let state = issuer.issue_state(Utc::now()).unwrap();
        let access = issuer.issue_access_token(&user, Utc::now()).unwrap();

        assert!(issuer.verify_access_token(&state).is_err());
        assert!(issuer.verify_state(&access.token).is_err());
    }

    #[rstest]
    fn test_不正な文字列のstateは拒否される(issuer: JwtTokenIssuer) {
        assert!(issuer.verify_state("garbage").is_err());
    }
}
