//! # リポジトリ実装
//!
//! リポジトリトレイトと PostgreSQL 実装を提供する。
//! ユースケース層はトレイト経由で利用し、テストでは `mock` のインメモリ実装に差し替える。

pub mod company_repository;
pub mod user_repository;

pub use company_repository::{CompanyRepository, PostgresCompanyRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
