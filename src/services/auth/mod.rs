//! 인증 서비스 모듈
//!
//! - [`password_hasher`] - bcrypt 자격 증명 해셔
//! - [`token_service`] - JWT 발급/검증, 리프레시 토큰 지문, 재설정 토큰 해시
//! - [`session_guard`] - Bearer 액세스 토큰 → 계정
//! - [`google_auth_service`] - Google OAuth 핸드셰이크 → 검증된 프로필

pub mod password_hasher;
pub mod token_service;
pub mod session_guard;
pub mod google_auth_service;

pub use password_hasher::CredentialHasher;
pub use token_service::{TokenError, TokenKeys, TokenLifetimes, TokenService};
pub use session_guard::SessionGuard;
pub use google_auth_service::{GoogleAuthService, GoogleOAuthSettings};
