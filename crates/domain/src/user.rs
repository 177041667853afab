//! # ユーザー
//!
//! 認証の主体となるユーザーを定義する。
//!
//! ユーザーは次のいずれかの経路で作成される:
//!
//! - メール + パスワードでの登録（[`User::registered`]）
//! - Google サインイン（[`User::from_google`]）
//! - 招待メールの送信時（[`User::invited`]）。資格情報を持たない状態で作られ、
//!   招待リンク経由で後から登録を完了する
//!
//! メールアドレスは業務キーだが一意制約はない。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use chrono::Utc;
//! use quinta_domain::{
//!     company::{Company, CompanyDetails},
//!     user::{Email, InvitationEligibility, User},
//!     value_objects::ClientCode,
//! };
//!
//! let company = Company::new(
//!     ClientCode::new("acme")?,
//!     CompanyDetails::default(),
//!     None,
//!     0.0,
//!     Utc::now(),
//! );
//! let user = User::invited(Email::new("b@x.com")?, &company, Utc::now());
//! assert_eq!(user.name(), Some("acme"));
//! assert_eq!(user.invitation_eligibility(), InvitationEligibility::Eligible);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    DomainError,
    company::Company,
    password::PasswordHash,
    value_objects::{GoogleId, ensure_max_length},
};

define_uuid_id! {
    /// ユーザー ID
    pub struct UserId;
}

/// メールアドレス
///
/// `local@domain` の形式を要求する。前後の空白は除去し、大文字小文字は保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    const MAX_LENGTH: usize = 255;

    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `@` を 1 つだけ含み、前後が空でない
    /// - 空白を含まない
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let invalid = || {
            DomainError::Validation(format!("メールアドレスの形式が不正です: {value}"))
        };

        let Some((local, domain)) = value.split_once('@') else {
            return Err(invalid());
        };

        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || value.chars().any(char::is_whitespace)
        {
            return Err(invalid());
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "メールアドレスは{}文字以内である必要があります",
                Self::MAX_LENGTH
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ユーザーの住所・連絡先プロフィール
///
/// すべて任意項目。招待で作成されたユーザーは会社の値で初期化される。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    /// 税務 ID（RFC）
    pub tax_id:          Option<String>,
    /// 郵便番号（CP）
    pub postal_code:     Option<String>,
    /// 通り（calle）
    pub street:          Option<String>,
    /// 外番号
    pub exterior_number: Option<String>,
    /// 内番号
    pub interior_number: Option<String>,
    /// 地区（colonia）
    pub neighbourhood:   Option<String>,
    /// 州
    pub state:           Option<String>,
    /// 地域（localidad）
    pub locality:        Option<String>,
    /// 市町村
    pub municipality:    Option<String>,
    /// 電話番号
    pub phone:           Option<String>,
    /// 携帯電話番号
    pub mobile:          Option<String>,
    /// 支店
    pub branch:          Option<String>,
    /// 部署
    pub area:            Option<String>,
    /// ユーザー種別
    pub user_type:       Option<String>,
}

impl UserProfile {
    /// 各項目の文字数上限を検証する
    ///
    /// 電話番号は会社の電話番号（最大 100 文字）をそのまま引き継ぐため同じ上限にする。
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_max_length("税務 ID", self.tax_id.as_deref(), 50)?;
        ensure_max_length("郵便番号", self.postal_code.as_deref(), 20)?;
        ensure_max_length("外番号", self.exterior_number.as_deref(), 50)?;
        ensure_max_length("内番号", self.interior_number.as_deref(), 50)?;
        ensure_max_length("地区", self.neighbourhood.as_deref(), 200)?;
        ensure_max_length("州", self.state.as_deref(), 100)?;
        ensure_max_length("地域", self.locality.as_deref(), 200)?;
        ensure_max_length("市町村", self.municipality.as_deref(), 200)?;
        ensure_max_length("電話番号", self.phone.as_deref(), 100)?;
        ensure_max_length("携帯電話番号", self.mobile.as_deref(), 50)?;
        ensure_max_length("支店", self.branch.as_deref(), 100)?;
        ensure_max_length("部署", self.area.as_deref(), 100)?;
        ensure_max_length("ユーザー種別", self.user_type.as_deref(), 50)
    }
}

/// 招待メールの送信可否
///
/// パスワードの判定が Google ID の判定より優先される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationEligibility {
    /// パスワード登録済み（送信しない）
    HasCredential,
    /// Google アカウント連携済み（送信しない）
    HasExternalIdentity,
    /// 招待可能
    Eligible,
}

/// ユーザーエンティティ
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: Email,
    password_hash: Option<PasswordHash>,
    google_id: Option<GoogleId>,
    name: Option<String>,
    profile: UserProfile,
    created_at: DateTime<Utc>,
}

impl User {
    /// メール + パスワードで登録したユーザーを作成する
    pub fn registered(
        email: Email,
        password_hash: PasswordHash,
        name: Option<String>,
        profile: UserProfile,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            email,
            password_hash: Some(password_hash),
            google_id: None,
            name,
            profile,
            created_at: now,
        }
    }

    /// Google サインインで初めて現れたユーザーを作成する
    pub fn from_google(
        google_id: GoogleId,
        email: Email,
        name: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            email,
            password_hash: None,
            google_id: Some(google_id),
            name,
            profile: UserProfile::default(),
            created_at: now,
        }
    }

    /// 招待先として資格情報なしのユーザーを作成する
    ///
    /// 名前は会社名、税務 ID・郵便番号・通り・電話番号は会社の値を引き継ぐ。
    pub fn invited(email: Email, company: &Company, now: DateTime<Utc>) -> Self {
        let details = company.details();
        Self {
            id: UserId::new(),
            email,
            password_hash: None,
            google_id: None,
            name: Some(company.display_name().to_string()),
            profile: UserProfile {
                tax_id: details.tax_id.clone(),
                postal_code: details.postal_code.clone(),
                street: details.street.clone(),
                phone: details.phones.clone(),
                ..Default::default()
            },
            created_at: now,
        }
    }

    /// ユーザー名の文字数上限（200 文字）を検証する
    pub fn validate_name(name: Option<&str>) -> Result<(), DomainError> {
        ensure_max_length("ユーザー名", name, 200)
    }

    /// 既存のデータから復元する
    pub fn from_db(
        id: UserId,
        email: Email,
        password_hash: Option<PasswordHash>,
        google_id: Option<GoogleId>,
        name: Option<String>,
        profile: UserProfile,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            google_id,
            name,
            profile,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password_hash.as_ref()
    }

    pub fn google_id(&self) -> Option<&GoogleId> {
        self.google_id.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 招待メールを送ってよいかを判定する
    pub fn invitation_eligibility(&self) -> InvitationEligibility {
        if self.password_hash.is_some() {
            InvitationEligibility::HasCredential
        } else if self.google_id.is_some() {
            InvitationEligibility::HasExternalIdentity
        } else {
            InvitationEligibility::Eligible
        }
    }

    /// 資格情報（パスワード・Google ID）をどちらも持たないか
    pub fn is_credential_free(&self) -> bool {
        self.invitation_eligibility() == InvitationEligibility::Eligible
    }

    /// Google ID を紐付けた新しいインスタンスを返す
    pub fn with_google_id(self, google_id: GoogleId) -> Self {
        Self {
            google_id: Some(google_id),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::{
        company::CompanyDetails,
        value_objects::ClientCode,
    };

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[fixture]
    fn acme(now: DateTime<Utc>) -> Company {
        Company::new(
            ClientCode::new("acme").unwrap(),
            CompanyDetails {
                name: Some("Acme".to_string()),
                tax_id: Some("ACM010101ABC".to_string()),
                postal_code: Some("01000".to_string()),
                street: Some("Av. Reforma 1".to_string()),
                phones: Some("555-0100".to_string()),
                ..Default::default()
            },
            None,
            0.0,
            now,
        )
    }

    // Email のテスト

    #[rstest]
    #[case("user@example.com")]
    #[case("  padded@example.com ")]
    #[case("First.Last@Example.COM")]
    fn test_メールアドレスは正常な形式を受け入れる(#[case] input: &str) {
        assert!(Email::new(input).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("@example.com")]
    #[case("user@")]
    #[case("a@b@c")]
    #[case("has space@example.com")]
    fn test_メールアドレスは不正な形式を拒否する(#[case] input: &str) {
        assert!(Email::new(input).is_err());
    }

    #[test]
    fn test_メールアドレスは大文字小文字を保持する() {
        let email = Email::new(" First.Last@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "First.Last@Example.COM");
    }

    // 招待可否のテスト

    #[rstest]
    fn test_パスワードを持つユーザーは招待対象外(now: DateTime<Utc>) {
        let user = User::registered(
            Email::new("a@x.com").unwrap(),
            PasswordHash::new("$argon2id$hash"),
            None,
            UserProfile::default(),
            now,
        );

        assert_eq!(
            user.invitation_eligibility(),
            InvitationEligibility::HasCredential
        );
    }

    #[rstest]
    fn test_google連携済みユーザーは招待対象外(now: DateTime<Utc>) {
        let user = User::from_google(
            GoogleId::new("1234").unwrap(),
            Email::new("g@x.com").unwrap(),
            Some("G".to_string()),
            now,
        );

        assert_eq!(
            user.invitation_eligibility(),
            InvitationEligibility::HasExternalIdentity
        );
    }

    #[rstest]
    fn test_パスワードとgoogle_idの両方を持つ場合はパスワードが優先される(
        now: DateTime<Utc>,
    ) {
        let user = User::registered(
            Email::new("both@x.com").unwrap(),
            PasswordHash::new("$argon2id$hash"),
            None,
            UserProfile::default(),
            now,
        )
        .with_google_id(GoogleId::new("1234").unwrap());

        assert_eq!(
            user.invitation_eligibility(),
            InvitationEligibility::HasCredential
        );
    }

    #[rstest]
    fn test_招待ユーザーは会社の住所情報を引き継ぐ(acme: Company, now: DateTime<Utc>) {
        let user = User::invited(Email::new("b@x.com").unwrap(), &acme, now);

        assert_eq!(user.name(), Some("Acme"));
        assert_eq!(user.profile().tax_id.as_deref(), Some("ACM010101ABC"));
        assert_eq!(user.profile().postal_code.as_deref(), Some("01000"));
        assert_eq!(user.profile().street.as_deref(), Some("Av. Reforma 1"));
        assert_eq!(user.profile().phone.as_deref(), Some("555-0100"));
        assert_eq!(user.profile().mobile, None);
        assert_eq!(user.created_at(), now);
        assert!(user.is_credential_free());
    }

    #[rstest]
    fn test_上限ちょうどの会社から招待したユーザーも上限内に収まる(now: DateTime<Utc>) {
        let company = Company::new(
            ClientCode::new("w".repeat(100)).unwrap(),
            CompanyDetails {
                name:           Some("n".repeat(200)),
                tax_id:         Some("t".repeat(50)),
                postal_code:    Some("p".repeat(20)),
                street:         Some("s".repeat(500)),
                phones:         Some("5".repeat(100)),
                representative: Some("r".repeat(200)),
                email:          Some("e".repeat(255)),
                ip:             Some("i".repeat(100)),
                master_user:    Some("m".repeat(100)),
            },
            None,
            0.0,
            now,
        );
        assert!(company.details().validate().is_ok());

        let user = User::invited(Email::new("b@x.com").unwrap(), &company, now);

        assert!(user.profile().validate().is_ok());
        assert!(User::validate_name(user.name()).is_ok());
    }

    #[rstest]
    #[case::電話番号(UserProfile { phone: Some("5".repeat(101)), ..Default::default() })]
    #[case::携帯電話番号(UserProfile { mobile: Some("5".repeat(51)), ..Default::default() })]
    #[case::郵便番号(UserProfile { postal_code: Some("0".repeat(21)), ..Default::default() })]
    fn test_上限を超えるプロフィールはバリデーションエラー(#[case] profile: UserProfile) {
        assert!(matches!(profile.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_ユーザー名は200文字まで() {
        assert!(User::validate_name(Some(&"a".repeat(200))).is_ok());
        assert!(User::validate_name(Some(&"a".repeat(201))).is_err());
        assert!(User::validate_name(None).is_ok());
    }
}
