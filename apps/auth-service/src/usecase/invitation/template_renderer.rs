//! # 招待メールのテンプレートレンダラー
//!
//! tera で招待メールを HTML / plaintext の両形式で生成する。
//!
//! - テンプレートは `include_str!` でバイナリに埋め込む
//! - 言語ごとに `invitation_{es,en}.{html,txt}` の 4 ファイル
//! - 件名: `Invitación para {会社名}` / `Invitation for {会社名}`
//! - `.html` は tera の autoescape が効くため、会社名やメッセージの HTML はエスケープされる

use quinta_domain::{
    invitation::Language,
    notification::{EmailMessage, NotificationError},
    user::{Email, UserId},
};
use tera::{Context, Tera};

/// 招待メールのテンプレートレンダラー
pub struct InvitationTemplateRenderer {
    engine: Tera,
}

impl InvitationTemplateRenderer {
    /// 埋め込みテンプレートを登録してレンダラーを作成する
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "invitation_es.html",
                    include_str!("../../../templates/invitations/invitation_es.html"),
                ),
                (
                    "invitation_es.txt",
                    include_str!("../../../templates/invitations/invitation_es.txt"),
                ),
                (
                    "invitation_en.html",
                    include_str!("../../../templates/invitations/invitation_en.html"),
                ),
                (
                    "invitation_en.txt",
                    include_str!("../../../templates/invitations/invitation_en.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 宛先 1 件分の招待メールを生成する
    pub fn render(
        &self,
        language: Language,
        company_name: &str,
        user_id: &UserId,
        message: &str,
        to: &Email,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("company_name", company_name);
        context.insert("user_id", &user_id.to_string());
        context.insert("message", message);

        let template_name = format!("invitation_{language}");

        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: to.as_str().to_string(),
            subject: subject(language, company_name),
            html_body,
            text_body,
        })
    }
}

fn subject(language: Language, company_name: &str) -> String {
    match language {
        Language::Es => format!("Invitación para {company_name}"),
        Language::En => format!("Invitation for {company_name}"),
    }
}
