//! # 招待メール送信ユースケース
//!
//! 会社を解決し、宛先ごとに「送信 / パスワード登録済み / Google 連携済み」の
//! 3 区分へ振り分けて招待メールを送る。
//!
//! ## 処理の流れ
//!
//! 1. 会社 ID から会社を取得する（見つからなければ何もせず `CompanyNotFound`）
//! 2. 宛先を入力順に 1 件ずつ処理する
//!    - 既存ユーザーにパスワードがあればスキップ
//!    - なければ、Google ID があればスキップ
//!    - 既存ユーザーがいなければ会社の住所情報で新規作成する
//! 3. 送信対象にはテンプレートをレンダリングして 1 通ずつ送る
//!
//! 途中で永続化・テンプレート・送信のいずれかが失敗した時点で中断する。
//! それまでに送ったメールと作成したユーザーは取り消さない。再送もしない。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera による招待メール生成

pub mod template_renderer;

use std::sync::Arc;

use quinta_domain::{
    clock::Clock,
    company::{Company, CompanyId},
    invitation::{InvitationOutcome, InvitationRequest, RecipientDisposition},
    notification::NotificationError,
    user::{Email, InvitationEligibility, User},
};
use quinta_infra::{
    InfraError,
    notification::NotificationSender,
    repository::{CompanyRepository, UserRepository},
};
use quinta_shared::{event_log::event, log_business_event};
pub use template_renderer::InvitationTemplateRenderer;
use thiserror::Error;

/// 招待ワークフローのエラー
#[derive(Debug, Error)]
pub enum InvitationError {
    /// 会社が存在しない（ID の形式不正を含む）
    #[error("会社が見つかりません: {0}")]
    CompanyNotFound(String),

    /// ユーザー・会社の読み書きに失敗
    #[error("永続化に失敗: {0}")]
    Persistence(#[from] InfraError),

    /// メール送信に失敗
    #[error("招待メールの送信に失敗: {0}")]
    Transport(#[source] NotificationError),

    /// テンプレートのレンダリングに失敗
    #[error("招待メールの生成に失敗: {0}")]
    Template(#[source] NotificationError),
}

/// 招待ユースケースの実装
pub struct InvitationUseCaseImpl {
    company_repository: Arc<dyn CompanyRepository>,
    user_repository:    Arc<dyn UserRepository>,
    sender:             Arc<dyn NotificationSender>,
    renderer:           InvitationTemplateRenderer,
    clock:              Arc<dyn Clock>,
}

impl InvitationUseCaseImpl {
    pub fn new(
        company_repository: Arc<dyn CompanyRepository>,
        user_repository: Arc<dyn UserRepository>,
        sender: Arc<dyn NotificationSender>,
        renderer: InvitationTemplateRenderer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            company_repository,
            user_repository,
            sender,
            renderer,
            clock,
        }
    }

    /// 招待メールを送信する
    #[tracing::instrument(skip_all, fields(company_ref = %request.company_ref()))]
    pub async fn send_invitations(
        &self,
        request: InvitationRequest,
    ) -> Result<InvitationOutcome, InvitationError> {
        let company = self.resolve_company(request.company_ref()).await?;

        let mut outcome = InvitationOutcome::default();
        for email in request.recipients() {
            let disposition = self.classify(email, &company).await?;

            match &disposition {
                RecipientDisposition::Invited {
                    user_id,
                    newly_created,
                } => {
                    let message = self
                        .renderer
                        .render(
                            request.language(),
                            company.display_name(),
                            user_id,
                            request.effective_message(),
                            email,
                        )
                        .map_err(InvitationError::Template)?;

                    self.sender
                        .send_email(&message)
                        .await
                        .map_err(InvitationError::Transport)?;

                    log_business_event!(
                        event.category = event::category::INVITATION,
                        event.action = event::action::INVITATION_SENT,
                        event.entity_type = event::entity_type::USER,
                        event.entity_id = %user_id,
                        event.result = event::result::SUCCESS,
                        invitation.recipient = %email,
                        invitation.language = %request.language(),
                        invitation.newly_created = newly_created,
                        "招待メール送信"
                    );
                }
                RecipientDisposition::SkippedHasCredential => {
                    log_skipped(email, event::skip_reason::HAS_PASSWORD);
                }
                RecipientDisposition::SkippedHasExternalIdentity => {
                    log_skipped(email, event::skip_reason::HAS_GOOGLE_ID);
                }
            }

            outcome.record(email.clone(), &disposition);
        }

        log_business_event!(
            event.category = event::category::INVITATION,
            event.action = event::action::INVITATION_COMPLETED,
            event.entity_type = event::entity_type::COMPANY,
            event.entity_id = %company.id(),
            event.result = event::result::SUCCESS,
            invitation.sent = outcome.sent.len(),
            invitation.with_password = outcome.with_password.len(),
            invitation.with_google_id = outcome.with_google_id.len(),
            invitation.total = outcome.total(),
            "招待メール送信処理完了"
        );

        Ok(outcome)
    }

    async fn resolve_company(&self, company_ref: &str) -> Result<Company, InvitationError> {
        let Some(company_id) = CompanyId::parse(company_ref) else {
            return Err(InvitationError::CompanyNotFound(company_ref.to_string()));
        };

        self.company_repository
            .find_by_id(&company_id)
            .await?
            .ok_or_else(|| InvitationError::CompanyNotFound(company_ref.to_string()))
    }

    /// 宛先 1 件を振り分ける
    ///
    /// 既存ユーザーがいなければ、この時点で作成する。
    async fn classify(
        &self,
        email: &Email,
        company: &Company,
    ) -> Result<RecipientDisposition, InvitationError> {
        if let Some(user) = self.user_repository.find_by_email(email).await? {
            return Ok(match user.invitation_eligibility() {
                InvitationEligibility::HasCredential => RecipientDisposition::SkippedHasCredential,
                InvitationEligibility::HasExternalIdentity => {
                    RecipientDisposition::SkippedHasExternalIdentity
                }
                InvitationEligibility::Eligible => RecipientDisposition::Invited {
                    user_id:       user.id().clone(),
                    newly_created: false,
                },
            });
        }

        let user = User::invited(email.clone(), company, self.clock.now());
        self.user_repository.insert(&user).await?;

        log_business_event!(
            event.category = event::category::INVITATION,
            event.action = event::action::INVITED_USER_CREATED,
            event.entity_type = event::entity_type::USER,
            event.entity_id = %user.id(),
            event.result = event::result::SUCCESS,
            invitation.recipient = %email,
            "招待先ユーザーを作成"
        );

        Ok(RecipientDisposition::Invited {
            user_id:       user.id().clone(),
            newly_created: true,
        })
    }
}

fn log_skipped(email: &Email, reason: &'static str) {
    log_business_event!(
        event.category = event::category::INVITATION,
        event.action = event::action::INVITATION_SKIPPED,
        event.entity_type = event::entity_type::USER,
        event.result = event::result::SUCCESS,
        invitation.recipient = %email,
        invitation.skip_reason = reason,
        "招待対象外のためスキップ"
    );
}
