//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//! ハンドラは DTO の変換だけを行い、ビジネスロジックは usecase 層に委譲する。
//!
//! ## ハンドラ一覧
//!
//! - `health`: ルート・ヘルスチェック
//! - `invitation`: 招待メール送信
//! - `auth`: 登録・ログイン・Google サインイン
//! - `user`: ユーザー一覧・削除
//! - `company`: 会社一覧・登録

pub mod auth;
pub mod company;
pub mod health;
pub mod invitation;
pub mod user;

pub use auth::{AuthState, google_callback, google_sign_in, login, register};
pub use company::{CompanyState, create_company, list_companies};
pub use health::{ReadinessState, health_check, readiness_check, root};
pub use invitation::{InvitationState, send_email};
pub use user::{delete_user, list_users};
