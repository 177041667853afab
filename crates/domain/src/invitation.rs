//! # 招待
//!
//! 招待メール送信ワークフローの入力と結果を表す値オブジェクト。
//!
//! | 型 | 役割 |
//! |---|------|
//! | [`Language`] | テンプレート言語（スペイン語 / 英語） |
//! | [`InvitationRequest`] | 検証済みの送信依頼 |
//! | [`RecipientDisposition`] | 宛先ごとの処理結果 |
//! | [`InvitationOutcome`] | 3 区分に振り分けた結果 |
//!
//! 宛先は入力順に処理され、各区分内の順序も入力順を保つ。

use serde::{Deserialize, Serialize};

use crate::{DomainError, user::{Email, UserId}};

/// テンプレート言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// スペイン語
    Es,
    /// 英語
    En,
}

impl Language {
    /// リクエストの言語指定から決定する
    ///
    /// `"es"` のみスペイン語。それ以外（未指定を含む）は英語。
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some("es") => Self::Es,
            _ => Self::En,
        }
    }

    /// 本文メッセージが空のときに使う既定の文面
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Es => {
                "Estimado cliente, le invitamos a formar parte de nuestro servicio exclusivo."
            }
            Self::En => "Dear client, we invite you to join our exclusive service.",
        }
    }
}

/// 招待メールの送信依頼
///
/// 宛先はすべて検証済み。1 件でも不正なアドレスがあれば作成に失敗する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationRequest {
    company_ref: String,
    language:    Language,
    recipients:  Vec<Email>,
    message:     Option<String>,
}

impl InvitationRequest {
    /// 送信依頼を作成する
    ///
    /// `company_ref` は会社 ID の文字列表現。解決はユースケースで行う。
    pub fn new(
        company_ref: impl Into<String>,
        language: Language,
        recipients: Vec<String>,
        message: Option<String>,
    ) -> Result<Self, DomainError> {
        let recipients = recipients
            .into_iter()
            .map(Email::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            company_ref: company_ref.into(),
            language,
            recipients,
            message,
        })
    }

    pub fn company_ref(&self) -> &str {
        &self.company_ref
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn recipients(&self) -> &[Email] {
        &self.recipients
    }

    /// 本文に差し込むメッセージ
    ///
    /// 未指定・空白のみの場合は言語ごとの既定文面になる。
    /// それ以外は受け取った文字列をそのまま使う。
    pub fn effective_message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(self.language.default_message())
    }
}

/// 宛先ごとの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientDisposition {
    /// 招待メールを送信した
    Invited {
        user_id:       UserId,
        /// このリクエストでユーザーを新規作成したか
        newly_created: bool,
    },
    /// パスワード登録済みのため送信しなかった
    SkippedHasCredential,
    /// Google 連携済みのため送信しなかった
    SkippedHasExternalIdentity,
}

/// 招待ワークフローの結果
///
/// 各宛先はちょうど 1 つの区分に入る。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvitationOutcome {
    pub sent:           Vec<Email>,
    pub with_password:  Vec<Email>,
    pub with_google_id: Vec<Email>,
}

impl InvitationOutcome {
    /// 宛先の処理結果を該当区分の末尾に追加する
    pub fn record(&mut self, email: Email, disposition: &RecipientDisposition) {
        match disposition {
            RecipientDisposition::Invited { .. } => self.sent.push(email),
            RecipientDisposition::SkippedHasCredential => self.with_password.push(email),
            RecipientDisposition::SkippedHasExternalIdentity => {
                self.with_google_id.push(email)
            }
        }
    }

    /// 処理した宛先の総数
    pub fn total(&self) -> usize {
        self.sent.len() + self.with_password.len() + self.with_google_id.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("es"), Language::Es)]
    #[case(Some("en"), Language::En)]
    #[case(Some("fr"), Language::En)]
    #[case(Some("ES"), Language::En)]
    #[case(None, Language::En)]
    fn test_言語指定の解釈(#[case] selector: Option<&str>, #[case] expected: Language) {
        assert_eq!(Language::from_selector(selector), expected);
    }

    #[rstest]
    fn test_不正なアドレスを含む依頼は作成できない() {
        let result = InvitationRequest::new(
            "c1",
            Language::En,
            vec!["ok@x.com".to_string(), "broken".to_string()],
            None,
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[rstest]
    #[case(None, Language::Es, "Estimado cliente, le invitamos a formar parte de nuestro servicio exclusivo.")]
    #[case(Some("   "), Language::En, "Dear client, we invite you to join our exclusive service.")]
    #[case(Some(" Hola "), Language::Es, " Hola ")]
    #[case(Some("Hi\n"), Language::En, "Hi\n")]
    fn test_本文メッセージの決定(
        #[case] message: Option<&str>,
        #[case] language: Language,
        #[case] expected: &str,
    ) {
        let request = InvitationRequest::new(
            "c1",
            language,
            vec!["a@x.com".to_string()],
            message.map(str::to_string),
        )
        .unwrap();

        assert_eq!(request.effective_message(), expected);
    }

    #[rstest]
    fn test_結果は区分ごとに入力順を保つ() {
        let mut outcome = InvitationOutcome::default();
        let invited = RecipientDisposition::Invited {
            user_id:       UserId::new(),
            newly_created: true,
        };

        outcome.record(Email::new("b@x.com").unwrap(), &invited);
        outcome.record(
            Email::new("a@x.com").unwrap(),
            &RecipientDisposition::SkippedHasCredential,
        );
        outcome.record(Email::new("c@x.com").unwrap(), &invited);

        assert_eq!(
            outcome.sent,
            vec![Email::new("b@x.com").unwrap(), Email::new("c@x.com").unwrap()]
        );
        assert_eq!(outcome.with_password, vec![Email::new("a@x.com").unwrap()]);
        assert!(outcome.with_google_id.is_empty());
        assert_eq!(outcome.total(), 3);
    }
}
