//! # パスワード
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`PlainPassword`] | 平文パスワード | 登録・ログイン時の入力値、会社のマスターパスワード |
//! | [`PasswordHash`] | パスワードハッシュ | 永続化用のハッシュ値 |
//! | [`PasswordVerifyResult`] | 検証結果 | ログイン時の照合結果 |
//!
//! 招待対象の判定では「パスワードハッシュを持つかどうか」が
//! 登録済みユーザーの条件になる（[`crate::user::User::invitation_eligibility`]）。

use crate::DomainError;

/// 平文パスワード
///
/// Debug 出力では値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

impl PlainPassword {
    /// 入力値をそのまま保持する（ログイン照合用）
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 新しく設定するパスワードとして検証する
    ///
    /// 登録・会社作成時に使う。空文字列は受け付けない。
    pub fn for_registration(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation("パスワードは必須です".to_string()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// パスワードハッシュ（Argon2id の PHC 文字列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// ハッシュ文字列から復元する
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// DB の nullable カラムから復元する
    ///
    /// NULL と空文字列はどちらも「パスワード未設定」とみなす。
    pub fn from_optional(hash: Option<String>) -> Option<Self> {
        hash.filter(|h| !h.is_empty()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// パスワード検証結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerifyResult {
    Match,
    Mismatch,
}

impl PasswordVerifyResult {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

impl From<bool> for PasswordVerifyResult {
    fn from(matched: bool) -> Self {
        if matched { Self::Match } else { Self::Mismatch }
    }
}
