//! # ビジネスイベントログとエラーコンテキスト
//!
//! ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! - ビジネスイベントは [`log_business_event!`] で出力する。
//!   `event.kind = "business_event"` が自動付与され、
//!   `jq 'select(.["event.kind"] == "business_event")'` で抽出できる
//! - エラーログには `error.category` + `error.kind` を付ける（[`error`] の定数）
//!
//! フィールド名はドット記法（`event.category`、`error.kind`）。

/// ビジネスイベントを構造化ログとして出力する。
///
/// ## 慣例フィールド
///
/// - `event.category`: [`event::category`]
/// - `event.action`: [`event::action`]
/// - `event.entity_type` / `event.entity_id`
/// - `event.result`: [`event::result`]
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    pub mod category {
        pub const AUTH: &str = "auth";
        pub const INVITATION: &str = "invitation";
        pub const COMPANY: &str = "company";
    }

    pub mod action {
        // 認証
        pub const USER_REGISTERED: &str = "auth.user_registered";
        pub const LOGIN_SUCCESS: &str = "auth.login_success";
        pub const LOGIN_FAILURE: &str = "auth.login_failure";
        pub const GOOGLE_SIGN_IN: &str = "auth.google_sign_in";
        pub const GOOGLE_LINKED: &str = "auth.google_linked";
        pub const USER_DELETED: &str = "auth.user_deleted";

        // 招待
        pub const INVITATION_SENT: &str = "invitation.sent";
        pub const INVITATION_SKIPPED: &str = "invitation.skipped";
        pub const INVITED_USER_CREATED: &str = "invitation.user_created";
        pub const INVITATION_COMPLETED: &str = "invitation.completed";

        // 会社
        pub const COMPANY_CREATED: &str = "company.created";
    }

    pub mod entity_type {
        pub const USER: &str = "user";
        pub const COMPANY: &str = "company";
    }

    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }

    /// 招待をスキップした理由
    pub mod skip_reason {
        pub const HAS_PASSWORD: &str = "has_password";
        pub const HAS_GOOGLE_ID: &str = "has_google_id";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    pub mod category {
        /// DB・SMTP などのインフラ
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// Google などの外部サービス
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    pub mod kind {
        pub const DATABASE: &str = "database";
        pub const MAIL_TRANSPORT: &str = "mail_transport";
        pub const TEMPLATE: &str = "template";
        pub const PASSWORD_HASH: &str = "password_hash";
        pub const TOKEN: &str = "token";
        pub const OAUTH: &str = "oauth";
        pub const INTERNAL: &str = "internal";
    }
}
