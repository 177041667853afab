//! # Quinta Auth Service
//!
//! 認証と招待メール送信を担当する API サーバー。
//!
//! - **招待メール**: 会社の名前で宛先ごとに招待メールを送る。
//!   未登録の宛先はその場で資格情報なしのユーザーとして作成する
//! - **パスワード認証**: Argon2id で検証し、JWT アクセストークンを発行する
//! - **Google サインイン**: OAuth 2.0 認可コードフロー
//!
//! バイナリ（`main.rs`）はインフラの初期化とサーバー起動だけを行い、
//! ルーター構築は [`app_builder`] に置く。結合テストも同じルーターを使う。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod openapi;
pub mod usecase;
