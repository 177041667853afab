//! # 会社（クライアント）
//!
//! 招待メールの差出元となる会社を定義する。
//!
//! 招待ワークフローからは読み取り専用で参照され、
//! メール本文の会社名と、新規ユーザーの住所系フィールドの初期値に使われる。

use chrono::{DateTime, Utc};

use crate::{
    DomainError,
    password::PasswordHash,
    value_objects::{ClientCode, ensure_max_length},
};

define_uuid_id! {
    /// 会社 ID
    pub struct CompanyId;
}

/// 会社の連絡先・住所情報
///
/// すべて任意項目。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyDetails {
    /// 表示名（nombre）
    pub name:           Option<String>,
    /// 税務 ID（RFC）
    pub tax_id:         Option<String>,
    /// 郵便番号（CP）
    pub postal_code:    Option<String>,
    /// 住所（domicilio）
    pub street:         Option<String>,
    /// 電話番号（telefonos）
    pub phones:         Option<String>,
    /// 代表者
    pub representative: Option<String>,
    /// 連絡先メールアドレス
    pub email:          Option<String>,
    /// IP / ホスト
    pub ip:             Option<String>,
    /// マスターユーザー名
    pub master_user:    Option<String>,
}

impl CompanyDetails {
    /// 各項目の文字数上限を検証する
    ///
    /// 住所（`street`）は上限なし。
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_max_length("会社名", self.name.as_deref(), 200)?;
        ensure_max_length("税務 ID", self.tax_id.as_deref(), 50)?;
        ensure_max_length("郵便番号", self.postal_code.as_deref(), 20)?;
        ensure_max_length("電話番号", self.phones.as_deref(), 100)?;
        ensure_max_length("代表者", self.representative.as_deref(), 200)?;
        ensure_max_length("連絡先メールアドレス", self.email.as_deref(), 255)?;
        ensure_max_length("IP", self.ip.as_deref(), 100)?;
        ensure_max_length("マスターユーザー", self.master_user.as_deref(), 100)
    }
}

/// 会社エンティティ
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    id: CompanyId,
    client_code: ClientCode,
    details: CompanyDetails,
    master_password_hash: Option<PasswordHash>,
    profit_margin: f64,
    registered_at: DateTime<Utc>,
}

impl Company {
    /// 新しい会社を作成する
    ///
    /// マスターパスワードはハッシュ化済みの値を受け取る。
    pub fn new(
        client_code: ClientCode,
        details: CompanyDetails,
        master_password_hash: Option<PasswordHash>,
        profit_margin: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CompanyId::new(),
            client_code,
            details,
            master_password_hash,
            profit_margin,
            registered_at: now,
        }
    }

    /// 既存のデータから復元する
    pub fn from_db(
        id: CompanyId,
        client_code: ClientCode,
        details: CompanyDetails,
        master_password_hash: Option<PasswordHash>,
        profit_margin: f64,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            client_code,
            details,
            master_password_hash,
            profit_margin,
            registered_at,
        }
    }

    pub fn id(&self) -> &CompanyId {
        &self.id
    }

    pub fn client_code(&self) -> &ClientCode {
        &self.client_code
    }

    pub fn details(&self) -> &CompanyDetails {
        &self.details
    }

    pub fn master_password_hash(&self) -> Option<&PasswordHash> {
        self.master_password_hash.as_ref()
    }

    pub fn profit_margin(&self) -> f64 {
        self.profit_margin
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// メール件名・本文に使う会社名
    ///
    /// 表示名が未設定の場合はクライアントコードで代用する。
    pub fn display_name(&self) -> &str {
        self.details
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(self.client_code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    #[rstest]
    fn test_表示名があればそれを会社名として使う(now: DateTime<Utc>) {
        let company = Company::new(
            ClientCode::new("acme").unwrap(),
            CompanyDetails {
                name: Some("Acme S.A. de C.V.".to_string()),
                ..Default::default()
            },
            None,
            0.0,
            now,
        );

        assert_eq!(company.display_name(), "Acme S.A. de C.V.");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn test_表示名がなければクライアントコードで代用する(
        now: DateTime<Utc>,
        #[case] name: Option<&str>,
    ) {
        let company = Company::new(
            ClientCode::new("ACME").unwrap(),
            CompanyDetails {
                name: name.map(str::to_string),
                ..Default::default()
            },
            None,
            0.0,
            now,
        );

        assert_eq!(company.display_name(), "acme");
    }

    #[rstest]
    fn test_新規作成時は登録日時に注入された時刻を使う(now: DateTime<Utc>) {
        let company = Company::new(
            ClientCode::new("acme").unwrap(),
            CompanyDetails::default(),
            Some(PasswordHash::new("$argon2id$hash")),
            12.5,
            now,
        );

        assert_eq!(company.registered_at(), now);
        assert_eq!(company.profit_margin(), 12.5);
        assert!(company.master_password_hash().is_some());
    }

    #[test]
    fn test_上限ちょうどの会社情報は受け入れる() {
        let details = CompanyDetails {
            name:           Some("n".repeat(200)),
            tax_id:         Some("t".repeat(50)),
            postal_code:    Some("p".repeat(20)),
            street:         Some("s".repeat(1000)),
            phones:         Some("5".repeat(100)),
            representative: Some("r".repeat(200)),
            email:          Some("e".repeat(255)),
            ip:             Some("i".repeat(100)),
            master_user:    Some("m".repeat(100)),
        };

        assert!(details.validate().is_ok());
    }

    #[rstest]
    #[case::会社名(CompanyDetails { name: Some("n".repeat(201)), ..Default::default() })]
    #[case::税務id(CompanyDetails { tax_id: Some("t".repeat(51)), ..Default::default() })]
    #[case::郵便番号(CompanyDetails { postal_code: Some("p".repeat(21)), ..Default::default() })]
    #[case::電話番号(CompanyDetails { phones: Some("5".repeat(101)), ..Default::default() })]
    #[case::マスターユーザー(CompanyDetails { master_user: Some("m".repeat(101)), ..Default::default() })]
    fn test_上限を超える会社情報はバリデーションエラー(#[case] details: CompanyDetails) {
        assert!(matches!(details.validate(), Err(DomainError::Validation(_))));
    }
}
