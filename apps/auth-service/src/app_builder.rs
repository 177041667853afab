//! # Auth Service アプリケーション構築
//!
//! State の組み立てとルーター定義を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Json,
    Router,
    routing::{delete, get, post},
};
use quinta_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    handler::{
        AuthState,
        CompanyState,
        InvitationState,
        ReadinessState,
        create_company,
        delete_user,
        google_callback,
        google_sign_in,
        health_check,
        list_companies,
        list_users,
        login,
        readiness_check,
        register,
        root,
        send_email,
    },
    openapi::ApiDoc,
    usecase::{AuthUseCase, CompanyUseCase, InvitationUseCase},
};

/// ルーターが依存するユースケース群
pub struct AppDependencies {
    pub auth_usecase:            Arc<dyn AuthUseCase>,
    pub company_usecase:         Arc<dyn CompanyUseCase>,
    pub invitation_usecase:      Arc<dyn InvitationUseCase>,
    /// Google サインイン失敗時のリダイレクト先
    pub google_failure_redirect: String,
}

/// State を組み立ててルーターを構築する
pub fn build_app(deps: AppDependencies, readiness_state: Arc<ReadinessState>) -> Router {
    let auth_state = Arc::new(AuthState {
        usecase:                 deps.auth_usecase,
        google_failure_redirect: deps.google_failure_redirect,
    });
    let company_state = Arc::new(CompanyState {
        usecase: deps.company_usecase,
    });
    let invitation_state = Arc::new(InvitationState {
        usecase: deps.invitation_usecase,
    });

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route("/api/send-email", post(send_email))
                .with_state(invitation_state),
        )
        .merge(
            Router::new()
                .route("/api/auth/register", post(register))
                .route("/api/auth/login", post(login))
                .route("/api/auth/google", get(google_sign_in))
                .route("/api/auth/google/callback", get(google_callback))
                .route("/api/auth/users", get(list_users))
                .route("/api/auth/users/{id}", delete(delete_user))
                .with_state(auth_state),
        )
        .merge(
            Router::new()
                .route("/api/companies", get(list_companies).post(create_company))
                .with_state(company_state),
        )
        .layer(CorsLayer::permissive())
        // 下に書いたものが外側
        // 1. SetRequestIdLayer: UUID v7 を生成（クライアント提供値があればそれを使う）
        // 2. TraceLayer: request_id 付きのスパンを作る
        // 3. CanonicalLogLineLayer: 完了時の 1 行サマリ
        // 4. PropagateRequestIdLayer: レスポンスヘッダーへコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

/// GET /api-docs/openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
