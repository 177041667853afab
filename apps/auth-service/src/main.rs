//! # Auth Service サーバー
//!
//! 認証と招待メール送信を担当する API サーバー。
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │    Client    │────▶│ Auth Service │────▶│  PostgreSQL  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                        │          │
//!                        ▼          ▼
//!                   ┌────────┐ ┌────────┐
//!                   │  SMTP  │ │ Google │
//!                   └────────┘ └────────┘
//! ```
//!
//! 環境変数は [`quinta_auth_service::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（メールはログ出力のみ）
//! cargo run -p quinta-auth-service
//!
//! # SMTP 経由で送信
//! NOTIFICATION_BACKEND=smtp SMTP_HOST=localhost SMTP_PORT=1025 cargo run -p quinta-auth-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use quinta_auth_service::{
    app_builder::{AppDependencies, build_app},
    config::{AppConfig, NotificationBackend},
    handler::ReadinessState,
    usecase::{
        AuthUseCaseImpl,
        CompanyUseCaseImpl,
        InvitationTemplateRenderer,
        InvitationUseCaseImpl,
    },
};
use quinta_domain::clock::{Clock, SystemClock};
use quinta_infra::{
    Argon2PasswordService,
    JwtTokenIssuer,
    PasswordService,
    db,
    google::ReqwestGoogleOAuthClient,
    notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender},
    repository::{
        CompanyRepository,
        PostgresCompanyRepository,
        PostgresUserRepository,
        UserRepository,
    },
};
use quinta_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Auth Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("auth-service");
    init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "auth-service").entered();

    let config = AppConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Auth Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .context("マイグレーションの実行に失敗しました")?;
    tracing::info!("マイグレーションを適用しました");

    // Readiness Check 用 State（pool が move される前に clone）
    let readiness_state = Arc::new(ReadinessState { pool: pool.clone() });

    let user_repository: Arc<dyn UserRepository> =
        Arc::new(PostgresUserRepository::new(pool.clone()));
    let company_repository: Arc<dyn CompanyRepository> =
        Arc::new(PostgresCompanyRepository::new(pool));
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sender = build_notification_sender(&config)?;

    let auth_usecase = AuthUseCaseImpl::new(
        user_repository.clone(),
        password_service.clone(),
        Arc::new(JwtTokenIssuer::new(&config.jwt_secret, config.jwt_ttl_seconds)),
        Arc::new(ReqwestGoogleOAuthClient::new(config.google.clone())),
        clock.clone(),
    );
    let company_usecase =
        CompanyUseCaseImpl::new(company_repository.clone(), password_service, clock.clone());
    let invitation_usecase = InvitationUseCaseImpl::new(
        company_repository,
        user_repository,
        sender,
        InvitationTemplateRenderer::new().context("メールテンプレートの読み込みに失敗しました")?,
        clock,
    );

    let app = build_app(
        AppDependencies {
            auth_usecase:            Arc::new(auth_usecase),
            company_usecase:         Arc::new(company_usecase),
            invitation_usecase:      Arc::new(invitation_usecase),
            google_failure_redirect: config.google_failure_redirect.clone(),
        },
        readiness_state,
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Auth Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// 設定に応じてメール送信バックエンドを選ぶ
fn build_notification_sender(config: &AppConfig) -> anyhow::Result<Arc<dyn NotificationSender>> {
    match &config.notification_backend {
        NotificationBackend::Noop => {
            tracing::info!("メール送信バックエンド: noop（ログ出力のみ）");
            Ok(Arc::new(NoopNotificationSender))
        }
        NotificationBackend::Smtp {
            host,
            port,
            credentials,
        } => {
            tracing::info!(smtp.host = %host, smtp.port = port, "メール送信バックエンド: SMTP");
            let sender =
                SmtpNotificationSender::new(host, *port, &config.from_address, credentials.clone())
                    .context("SMTP 送信の初期化に失敗しました")?;
            Ok(Arc::new(sender))
        }
    }
}
