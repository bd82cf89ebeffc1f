//! 인증 컨텍스트 모델

pub mod authenticated_account;
pub mod auth_session;

pub use authenticated_account::AuthenticatedAccount;
pub use auth_session::AuthSession;
