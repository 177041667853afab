//! # OpenAPI 仕様定義
//!
//! utoipa を使用して Auth Service の OpenAPI 仕様を Rust の型から生成する。
//! `GET /api-docs/openapi.json` で配信する。

use utoipa::OpenApi;

use crate::handler::{auth, company, health, invitation, user};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quinta Auth Service API",
        version = "0.1.0",
        description = "認証と招待メール送信の API"
    ),
    paths(
        // health
        health::health_check,
        health::readiness_check,
        // invitations
        invitation::send_email,
        // auth
        auth::register,
        auth::login,
        auth::google_sign_in,
        auth::google_callback,
        // users
        user::list_users,
        user::delete_user,
        // companies
        company::list_companies,
        company::create_company,
    ),
    components(schemas(quinta_shared::ErrorResponse)),
    tags(
        (name = "health", description = "ヘルスチェック"),
        (name = "invitations", description = "招待メール"),
        (name = "auth", description = "認証"),
        (name = "users", description = "ユーザー管理"),
        (name = "companies", description = "会社管理"),
    )
)]
pub struct ApiDoc;
