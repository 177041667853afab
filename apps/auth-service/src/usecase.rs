//! # ユースケース層
//!
//! Auth Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: ハンドラはトレイト越しに呼び出し、テストではスタブに差し替える
//! - **依存性注入**: リポジトリ・メール送信・トークン発行は `Arc<dyn ...>` で外部から注入
//! - **薄いハンドラ**: ハンドラは DTO 変換だけを行い、ロジックはユースケースに集約

pub mod auth;
pub mod company;
pub mod invitation;

use async_trait::async_trait;
pub use auth::{AuthError, AuthUseCaseImpl, AuthenticatedUser, RegisterInput};
pub use company::{CompanyError, CompanyUseCaseImpl, CreateCompanyInput};
pub use invitation::{InvitationError, InvitationTemplateRenderer, InvitationUseCaseImpl};
use quinta_domain::{
    company::Company,
    invitation::{InvitationOutcome, InvitationRequest},
    user::User,
};

/// 認証ユースケーストレイト
#[async_trait]
pub trait AuthUseCase: Send + Sync {
    /// メール + パスワードでユーザーを登録する
    async fn register(&self, input: RegisterInput) -> Result<User, AuthError>;

    /// ログインしてアクセストークンを発行する
    async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError>;

    /// Google の同意画面 URL を返す
    fn google_authorization_url(&self) -> Result<String, AuthError>;

    /// Google のコールバックを処理してアクセストークンを発行する
    async fn google_callback(
        &self,
        code: &str,
        state: &str,
    ) -> Result<AuthenticatedUser, AuthError>;

    async fn list_users(&self) -> Result<Vec<User>, AuthError>;

    /// ユーザーを削除する（`id` は UUID 文字列）
    async fn delete_user(&self, id: &str) -> Result<(), AuthError>;
}

/// 会社管理ユースケーストレイト
#[async_trait]
pub trait CompanyUseCase: Send + Sync {
    async fn list_companies(&self) -> Result<Vec<Company>, CompanyError>;

    async fn create_company(&self, input: CreateCompanyInput) -> Result<Company, CompanyError>;
}

/// 招待メール送信ユースケーストレイト
#[async_trait]
pub trait InvitationUseCase: Send + Sync {
    /// 宛先を振り分けて招待メールを送信する
    ///
    /// ## 戻り値
    ///
    /// - `Ok(InvitationOutcome)`: 送信済み・パスワード登録済み・Google 連携済みの 3 区分
    /// - `Err(InvitationError::CompanyNotFound)`: 会社が存在しない（副作用なし）
    /// - `Err(_)`: 永続化・テンプレート・送信の失敗（それまでの副作用は残る）
    async fn send_invitations(
        &self,
        request: InvitationRequest,
    ) -> Result<InvitationOutcome, InvitationError>;
}

#[async_trait]
impl AuthUseCase for AuthUseCaseImpl {
    async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        self.register(input).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        self.login(email, password).await
    }

    fn google_authorization_url(&self) -> Result<String, AuthError> {
        self.google_authorization_url()
    }

    async fn google_callback(
        &self,
        code: &str,
        state: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        self.google_callback(code, state).await
    }

    async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        self.list_users().await
    }

    async fn delete_user(&self, id: &str) -> Result<(), AuthError> {
        self.delete_user(id).await
    }
}

#[async_trait]
impl CompanyUseCase for CompanyUseCaseImpl {
    async fn list_companies(&self) -> Result<Vec<Company>, CompanyError> {
        self.list_companies().await
    }

    async fn create_company(&self, input: CreateCompanyInput) -> Result<Company, CompanyError> {
        self.create_company(input).await
    }
}

#[async_trait]
impl InvitationUseCase for InvitationUseCaseImpl {
    async fn send_invitations(
        &self,
        request: InvitationRequest,
    ) -> Result<InvitationOutcome, InvitationError> {
        self.send_invitations(request).await
    }
}
