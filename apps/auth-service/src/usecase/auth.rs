//! # 認証ユースケース
//!
//! メール + パスワードの登録・ログイン、Google サインイン、ユーザー一覧・削除を扱う。
//!
//! ## タイミング攻撃対策
//!
//! ログインでユーザーが存在しない（またはパスワード未設定の）場合も、
//! ダミーハッシュで検証を実行して処理時間を均一化する。
//!
//! ## Google サインイン
//!
//! 1. 署名付きの `state` を付けた同意画面 URL を返す
//! 2. コールバックで `state` を検証し、認可コードをアクセストークンに交換する
//! 3. userinfo の Google ID でユーザーを探す
//! 4. 見つからなければ、同じメールアドレスの資格情報なしユーザーに Google ID を紐付ける
//! 5. それもなければ新規作成する

use std::sync::Arc;

use chrono::{DateTime, Utc};
use quinta_domain::{
    DomainError,
    clock::Clock,
    password::{PasswordHash, PlainPassword},
    user::{Email, User, UserId, UserProfile},
    value_objects::GoogleId,
};
use quinta_infra::{
    InfraError,
    PasswordService,
    TokenIssuer,
    google::GoogleOAuthClient,
    repository::UserRepository,
};
use quinta_shared::{event_log::event, log_business_event};
use thiserror::Error;

/// ダミーハッシュ（有効な Argon2id 形式）
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// 認証ユースケースのエラー
#[derive(Debug, Error)]
pub enum AuthError {
    /// 同じメールアドレスのユーザーが既に存在する
    #[error("ユーザーは既に存在します")]
    UserAlreadyExists,

    /// メールアドレスまたはパスワードが一致しない
    #[error("認証に失敗しました")]
    InvalidCredentials,

    #[error("ユーザーが見つかりません: {0}")]
    UserNotFound(String),

    /// OAuth の `state` が不正または期限切れ
    #[error("OAuth state が不正です")]
    InvalidOAuthState,

    /// Google との連携に失敗
    #[error("Google サインインに失敗: {0}")]
    GoogleSignInFailed(#[source] InfraError),

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

/// ユーザー登録の入力
#[derive(Debug)]
pub struct RegisterInput {
    pub email:    String,
    pub password: String,
    pub name:     Option<String>,
    pub profile:  UserProfile,
}

/// ログイン・Google サインインの結果
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id:    UserId,
    pub email:      Email,
    pub name:       Option<String>,
    pub token:      String,
    pub expires_at: DateTime<Utc>,
}

/// 認証ユースケースの実装
pub struct AuthUseCaseImpl {
    user_repository:  Arc<dyn UserRepository>,
    password_service: Arc<dyn PasswordService>,
    token_issuer:     Arc<dyn TokenIssuer>,
    google_client:    Arc<dyn GoogleOAuthClient>,
    clock:            Arc<dyn Clock>,
}

impl AuthUseCaseImpl {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_service: Arc<dyn PasswordService>,
        token_issuer: Arc<dyn TokenIssuer>,
        google_client: Arc<dyn GoogleOAuthClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            password_service,
            token_issuer,
            google_client,
            clock,
        }
    }

    /// メール + パスワードでユーザーを登録する
    ///
    /// 招待で作成された資格情報なしのユーザーが同じアドレスで存在する場合も
    /// 登録済みとして拒否する。
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        let email = Email::new(input.email)?;
        User::validate_name(input.name.as_deref())?;
        input.profile.validate()?;

        if self.user_repository.find_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "登録失敗: メールアドレスは登録済み");
            return Err(AuthError::UserAlreadyExists);
        }

        let password = PlainPassword::for_registration(input.password)?;
        let password_hash = self.password_service.hash(&password)?;

        let user = User::registered(
            email,
            password_hash,
            input.name,
            input.profile,
            self.clock.now(),
        );
        self.user_repository.insert(&user).await?;

        log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::USER_REGISTERED,
            event.entity_type = event::entity_type::USER,
            event.entity_id = %user.id(),
            event.result = event::result::SUCCESS,
            "ユーザー登録"
        );

        Ok(user)
    }

    /// メール + パスワードでログインし、アクセストークンを発行する
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let password = PlainPassword::new(password);

        let user = match Email::new(email) {
            Ok(email) => self.user_repository.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some((user, hash)) = user.and_then(|u| {
            let hash = u.password_hash().cloned()?;
            Some((u, hash))
        }) else {
            self.dummy_verification(&password);
            log_login_failure(email);
            return Err(AuthError::InvalidCredentials);
        };

        if !self.password_service.verify(&password, &hash)?.is_match() {
            log_login_failure(email);
            return Err(AuthError::InvalidCredentials);
        }

        let authenticated = self.issue_for(&user)?;

        log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::LOGIN_SUCCESS,
            event.entity_type = event::entity_type::USER,
            event.entity_id = %user.id(),
            event.result = event::result::SUCCESS,
            "ログイン成功"
        );

        Ok(authenticated)
    }

    /// Google の同意画面 URL を返す
    pub fn google_authorization_url(&self) -> Result<String, AuthError> {
        let state = self.token_issuer.issue_state(self.clock.now())?;
        Ok(self.google_client.authorization_url(&state))
    }

    /// Google からのコールバックを処理する
    pub async fn google_callback(
        &self,
        code: &str,
        state: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        self.token_issuer
            .verify_state(state)
            .map_err(|_| AuthError::InvalidOAuthState)?;

        let access_token = self
            .google_client
            .exchange_code(code)
            .await
            .map_err(AuthError::GoogleSignInFailed)?;
        let info = self
            .google_client
            .fetch_user_info(&access_token)
            .await
            .map_err(AuthError::GoogleSignInFailed)?;

        let google_id = GoogleId::new(info.id)?;
        let email = Email::new(info.email)?;

        let user = match self.user_repository.find_by_google_id(&google_id).await? {
            Some(user) => user,
            None => self.link_or_create(google_id, email, info.name).await?,
        };

        let authenticated = self.issue_for(&user)?;

        log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::GOOGLE_SIGN_IN,
            event.entity_type = event::entity_type::USER,
            event.entity_id = %user.id(),
            event.result = event::result::SUCCESS,
            "Google サインイン成功"
        );

        Ok(authenticated)
    }

    /// 全ユーザーを作成日時順で返す
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.user_repository.find_all().await?)
    }

    /// ユーザーを削除する
    ///
    /// ID の形式が不正な場合も「見つからない」として扱う。
    pub async fn delete_user(&self, id: &str) -> Result<(), AuthError> {
        let Some(user_id) = UserId::parse(id) else {
            return Err(AuthError::UserNotFound(id.to_string()));
        };

        if !self.user_repository.delete(&user_id).await? {
            tracing::warn!(user_id = %id, "削除対象のユーザーが見つかりません");
            return Err(AuthError::UserNotFound(id.to_string()));
        }

        log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::USER_DELETED,
            event.entity_type = event::entity_type::USER,
            event.entity_id = %user_id,
            event.result = event::result::SUCCESS,
            "ユーザー削除"
        );

        Ok(())
    }

    async fn link_or_create(
        &self,
        google_id: GoogleId,
        email: Email,
        name: Option<String>,
    ) -> Result<User, AuthError> {
        let existing = self
            .user_repository
            .find_by_email(&email)
            .await?
            .filter(User::is_credential_free);

        if let Some(user) = existing {
            self.user_repository
                .link_google_id(user.id(), &google_id)
                .await?;

            log_business_event!(
                event.category = event::category::AUTH,
                event.action = event::action::GOOGLE_LINKED,
                event.entity_type = event::entity_type::USER,
                event.entity_id = %user.id(),
                event.result = event::result::SUCCESS,
                "既存ユーザーに Google アカウントを紐付け"
            );

            return Ok(user.with_google_id(google_id));
        }

        let user = User::from_google(google_id, email, name, self.clock.now());
        self.user_repository.insert(&user).await?;
        tracing::info!(user_id = %user.id(), "Google サインインでユーザーを作成");

        Ok(user)
    }

    fn issue_for(&self, user: &User) -> Result<AuthenticatedUser, AuthError> {
        let issued = self
            .token_issuer
            .issue_access_token(user, self.clock.now())?;

        Ok(AuthenticatedUser {
            user_id:    user.id().clone(),
            email:      user.email().clone(),
            name:       user.name().map(str::to_string),
            token:      issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// ダミーハッシュで検証を実行する（タイミング攻撃対策）
    ///
    /// 固定 sleep ではなく実際に Argon2id 検証を実行し、同じ時間特性にする。
    fn dummy_verification(&self, password: &PlainPassword) {
        let _ = self
            .password_service
            .verify(password, &PasswordHash::new(DUMMY_HASH));
    }
}

fn log_login_failure(email: &str) {
    log_business_event!(
        event.category = event::category::AUTH,
        event.action = event::action::LOGIN_FAILURE,
        event.entity_type = event::entity_type::USER,
        event.result = event::result::FAILURE,
        auth.email = %email,
        "ログイン失敗"
    );
}
