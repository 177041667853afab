//! # テスト用モック
//!
//! ユースケース・ハンドラのテストで使うインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! quinta-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use quinta_domain::{
    company::{Company, CompanyId},
    notification::{EmailMessage, NotificationError},
    user::{Email, User, UserId},
    value_objects::GoogleId,
};

use crate::{
    error::InfraError,
    google::{GoogleOAuthClient, GoogleUserInfo},
    notification::NotificationSender,
    repository::{CompanyRepository, UserRepository},
};

// ===== MockUserRepository =====

/// インメモリのユーザーリポジトリ
///
/// 挿入順を作成順とみなし、メール検索では先に入ったユーザーを返す。
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users:        Arc<Mutex<Vec<User>>>,
    fail_inserts: Arc<AtomicBool>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    /// 保存済みの全ユーザー（挿入順）
    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    /// 以後の `insert` をデータベースエラーにする
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id() == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn find_by_google_id(&self, google_id: &GoogleId) -> Result<Option<User>, InfraError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.google_id() == Some(google_id))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, InfraError> {
        Ok(self.users())
    }

    async fn insert(&self, user: &User) -> Result<(), InfraError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn link_google_id(&self, id: &UserId, google_id: &GoogleId) -> Result<(), InfraError> {
        let mut users = self.users.lock().unwrap();
        if let Some(index) = users.iter().position(|u| u.id() == id) {
            let user = users.remove(index);
            users.insert(index, user.with_google_id(google_id.clone()));
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, InfraError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id() != id);
        Ok(users.len() < before)
    }
}

// ===== MockCompanyRepository =====

#[derive(Clone, Default)]
pub struct MockCompanyRepository {
    companies: Arc<Mutex<Vec<Company>>>,
}

impl MockCompanyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_company(&self, company: Company) {
        self.companies.lock().unwrap().push(company);
    }

    pub fn companies(&self) -> Vec<Company> {
        self.companies.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompanyRepository for MockCompanyRepository {
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, InfraError> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id() == id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Company>, InfraError> {
        Ok(self.companies())
    }

    async fn insert(&self, company: &Company) -> Result<(), InfraError> {
        self.companies.lock().unwrap().push(company.clone());
        Ok(())
    }
}

// ===== MockNotificationSender =====

/// 送信内容を記録する NotificationSender
///
/// `fail_from(n)` を指定すると、n 通目（0 始まり）以降の送信が失敗する。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:      Arc<Mutex<Vec<EmailMessage>>>,
    attempts:  Arc<AtomicUsize>,
    fail_from: Option<usize>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// n 通目以降の送信を失敗させる
    pub fn fail_from(n: usize) -> Self {
        Self {
            fail_from: Some(n),
            ..Self::default()
        }
    }

    /// 送信に成功したメール（送信順）
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// 失敗を含む送信試行回数
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_from.is_some_and(|n| attempt >= n) {
            return Err(NotificationError::SendFailed(
                "SMTP 送信失敗: connection refused".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ===== MockGoogleOAuthClient =====

/// 固定のプロフィールを返す GoogleOAuthClient
///
/// `user_info` が `None` の場合、コード交換が失敗する。
#[derive(Clone)]
pub struct MockGoogleOAuthClient {
    user_info: Option<GoogleUserInfo>,
}

impl MockGoogleOAuthClient {
    pub fn returning(user_info: GoogleUserInfo) -> Self {
        Self {
            user_info: Some(user_info),
        }
    }

    pub fn failing() -> Self {
        Self { user_info: None }
    }
}

#[async_trait]
impl GoogleOAuthClient for MockGoogleOAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://accounts.google.com/o/oauth2/v2/auth?state={state}")
    }

    async fn exchange_code(&self, code: &str) -> Result<String, InfraError> {
        match self.user_info {
            Some(_) => Ok(format!("access-token-for-{code}")),
            None => Err(InfraError::external_service("google", "invalid_grant")),
        }
    }

    async fn fetch_user_info(&self, _access_token: &str) -> Result<GoogleUserInfo, InfraError> {
        self.user_info
            .clone()
            .ok_or_else(|| InfraError::external_service("google", "unauthorized"))
    }
}
