//! # 値オブジェクト
//!
//! 複数のエンティティから使われる文字列系の値オブジェクトを定義する。
//!
//! | 型 | ドメイン用語 |
//! |---|------------|
//! | [`ClientCode`] | クライアントコード（会社の業務キー、小文字で保持） |
//! | [`GoogleId`] | Google アカウント ID（外部 ID トークン） |

use crate::DomainError;

define_validated_string! {
    /// Google アカウント ID
    ///
    /// Google の userinfo が返す `id`（数値文字列）を保持する。
    /// 値の意味は解釈しない（不透明なトークン）。
    pub struct GoogleId {
        label: "Google ID",
        max_length: 255,
    }
}

/// クライアントコード
///
/// 会社（Quicliente）の業務キー。登録時に小文字へ正規化する。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ClientCode(String);

impl ClientCode {
    /// 最大文字数
    const MAX_LENGTH: usize = 100;

    /// クライアントコードを作成する
    ///
    /// trim + 小文字化の後、空文字列と最大長を検証する。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_lowercase();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "クライアントコードは必須です".to_string(),
            ));
        }

        if value.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "クライアントコードは {} 文字以内である必要があります",
                Self::MAX_LENGTH
            )));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 任意項目の文字数上限を検証する
///
/// 文字数は `chars().count()` で数える（PostgreSQL の `VARCHAR(n)` と同じ単位）。
pub(crate) fn ensure_max_length(
    label: &str,
    value: Option<&str>,
    max_length: usize,
) -> Result<(), DomainError> {
    match value {
        Some(v) if v.chars().count() > max_length => Err(DomainError::Validation(format!(
            "{label}は {max_length} 文字以内である必要があります"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_google_idは空文字列を拒否する(#[case] input: &str) {
        assert!(GoogleId::new(input).is_err());
    }

    #[rstest]
    #[case::未設定(None, true)]
    #[case::上限ちょうど(Some("ñ".repeat(20)), true)]
    #[case::上限超過(Some("ñ".repeat(21)), false)]
    fn test_任意項目の文字数は文字単位で数える(
        #[case] value: Option<String>,
        #[case] ok: bool,
    ) {
        let result = ensure_max_length("郵便番号", value.as_deref(), 20);
        assert_eq!(result.is_ok(), ok);
    }

    #[test]
    fn test_クライアントコードは小文字に正規化される() {
        let code = ClientCode::new(" TSMTrucking ").unwrap();
        assert_eq!(code.as_str(), "tsmtrucking");
    }

    #[test]
    fn test_クライアントコードは空文字列を拒否する() {
        assert!(ClientCode::new("  ").is_err());
    }

    #[test]
    fn test_google_idはjsonで文字列として扱われる() {
        let id = GoogleId::new("1234567890").unwrap();
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::json!("1234567890"));
    }
}
