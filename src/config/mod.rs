//! # Configuration Module
//!
//! 백엔드 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 환경, 서버, 데이터베이스, 비밀번호 정책
//! - [`auth_config`] - JWT 키/수명, Google OAuth, 메일 발송
//!
//! ## 환경 변수 설정 가이드
//!
//! ### 필수 환경 변수 (프로덕션)
//!
//! ```bash
//! export JWT_SECRET="access-token-secret"
//! export REFRESH_TOKEN_SECRET="refresh-token-secret"
//! export EMAIL_VERIFICATION_SECRET="email-action-secret"
//! export OAUTH_STATE_SECRET="oauth-state-secret"
//!
//! export GOOGLE_CLIENT_ID="your-client-id"
//! export GOOGLE_CLIENT_SECRET="your-client-secret"
//! export GOOGLE_REDIRECT_URI="https://api.example.com/api/v1/auth/google/callback"
//! ```
//!
//! ### 선택적 환경 변수
//!
//! ```bash
//! export ENVIRONMENT="production"  # development, test, staging, production
//! export BCRYPT_COST="12"          # 4-15 범위
//! export FRONTEND_URL="https://app.example.com"
//! export MAIL_API_URL="https://mail.example.com/send"
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
