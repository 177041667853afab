//! # 招待メールハンドラ
//!
//! - `POST /api/send-email` - 招待メール送信

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use quinta_domain::{
    invitation::{InvitationOutcome, InvitationRequest, Language},
    user::Email,
};
use quinta_shared::ErrorResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::ApiError, usecase::InvitationUseCase};

/// 完了メッセージ
const COMPLETION_MESSAGE: &str = "Email processing completed";

/// 招待ハンドラの共有状態
pub struct InvitationState {
    pub usecase: Arc<dyn InvitationUseCase>,
}

/// 宛先指定（単一アドレスまたはリスト）
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(address) => vec![address],
            Self::Many(addresses) => addresses,
        }
    }
}

/// 招待メール送信リクエスト
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub company_id: String,
    /// `"es"` でスペイン語、それ以外は英語
    #[serde(default)]
    pub language:   Option<String>,
    pub emails:     Recipients,
    #[serde(default)]
    pub message:    Option<String>,
}

/// 招待メール送信レスポンス
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub message:               String,
    pub sent_emails:           Vec<String>,
    pub emails_with_password:  Vec<String>,
    pub emails_with_google_id: Vec<String>,
}

impl From<InvitationOutcome> for SendEmailResponse {
    fn from(outcome: InvitationOutcome) -> Self {
        let to_strings =
            |emails: Vec<Email>| emails.into_iter().map(Email::into_string).collect();
        Self {
            message:               COMPLETION_MESSAGE.to_string(),
            sent_emails:           to_strings(outcome.sent),
            emails_with_password:  to_strings(outcome.with_password),
            emails_with_google_id: to_strings(outcome.with_google_id),
        }
    }
}

/// POST /api/send-email
///
/// 会社の招待メールを宛先ごとに送信する。
/// パスワード登録済み・Google 連携済みの宛先には送らない。
#[utoipa::path(
    post,
    path = "/api/send-email",
    tag = "invitations",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "処理完了", body = SendEmailResponse),
        (status = 400, description = "リクエスト形式またはメールアドレスが不正", body = ErrorResponse),
        (status = 404, description = "会社が見つからない", body = ErrorResponse),
        (status = 500, description = "永続化・送信の失敗", body = ErrorResponse)
    )
)]
pub async fn send_email(
    State(state): State<Arc<InvitationState>>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let request = InvitationRequest::new(
        req.company_id,
        Language::from_selector(req.language.as_deref()),
        req.emails.into_vec(),
        req.message,
    )?;

    let outcome = state.usecase.send_invitations(request).await?;

    Ok(Json(SendEmailResponse::from(outcome)))
}
