//! # パスワードハッシュ
//!
//! Argon2id によるパスワードのハッシュ化と検証を提供する。
//! ユーザー登録・ログインと、会社のマスターパスワード保存で使う。

use argon2::{
    Argon2,
    PasswordHasher as _,
    PasswordVerifier as _,
    password_hash::{PasswordHash as Argon2PasswordHash, SaltString, rand_core::OsRng},
};
use quinta_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};

use crate::InfraError;

/// パスワードのハッシュ化と検証を担当するトレイト
pub trait PasswordService: Send + Sync {
    /// ランダムなソルトでハッシュ化する
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;

    /// パスワードを検証する
    ///
    /// # Errors
    ///
    /// - 保存されたハッシュの形式が不正な場合
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError>;
}

/// Argon2id 実装
///
/// パラメータは argon2 クレートの既定値（Argon2id v19, m=19456, t=2, p=1）。
/// 検証時はハッシュ文字列に埋め込まれたパラメータが使われるため、
/// 既定値を変えても既存のハッシュはそのまま検証できる。
#[derive(Default)]
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| InfraError::password_hash(e.to_string()))?;

        Ok(PasswordHash::new(hash.to_string()))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let parsed = Argon2PasswordHash::new(hash.as_str())
            .map_err(|e| InfraError::password_hash(format!("不正なハッシュ形式: {e}")))?;

        let matched = self
            .argon2
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok();

        Ok(PasswordVerifyResult::from(matched))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    // password123（m=65536,t=1,p=1 で生成）
    const LEGACY_HASH: &str = "$argon2id$v=19$m=65536,t=1,p=1$olntqw+EoVpwH4B1vUAI0A$5yCA1izLODgz8nQOInDGwbuQB/AS0sIQDwpmIilve5M";

    #[rstest]
    fn test_ハッシュ化したパスワードを検証できる() {
        let service = Argon2PasswordService::new();
        let password = PlainPassword::new("s3cret-pass");

        let hash = service.hash(&password).unwrap();

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(service.verify(&password, &hash).unwrap().is_match());
        assert!(
            !service
                .verify(&PlainPassword::new("other"), &hash)
                .unwrap()
                .is_match()
        );
    }

    #[rstest]
    fn test_同じパスワードでもソルトが異なる() {
        let service = Argon2PasswordService::new();
        let password = PlainPassword::new("same");

        let first = service.hash(&password).unwrap();
        let second = service.hash(&password).unwrap();

        assert_ne!(first, second);
    }

    #[rstest]
    fn test_異なるパラメータで作られたハッシュも検証できる() {
        let service = Argon2PasswordService::new();
        let hash = PasswordHash::new(LEGACY_HASH);

        assert!(
            service
                .verify(&PlainPassword::new("password123"), &hash)
                .unwrap()
                .is_match()
        );
    }

    #[rstest]
    fn test_不正なハッシュ形式はエラー() {
        let service = Argon2PasswordService::new();
        let result = service.verify(
            &PlainPassword::new("password123"),
            &PasswordHash::new("not-a-valid-hash"),
        );

        assert!(result.is_err());
    }
}
