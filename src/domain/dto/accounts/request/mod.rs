//! # 계정 관련 요청 DTO 모듈
//!
//! 클라이언트로부터 받은 JSON을 구조화된 타입으로 변환하고 `validator`로
//! 형식 규칙을 검사합니다. 검증 실패는 핸들러에서 `AppError::ValidationError`
//! (400 Bad Request)로 변환됩니다.
//!
//! - [`auth_request`] - 로그인 전 엔드포인트 (가입, 로그인, 토큰, 비밀번호 재설정)
//! - [`account_request`] - Session Guard 뒤의 엔드포인트 (비밀번호/이메일 변경, 삭제)

pub mod auth_request;
pub mod account_request;

pub use auth_request::{
    ForgotPasswordRequest, LoginRequest, LogoutRequest, OAuthCallbackQuery,
    RefreshTokenRequest, RegisterRequest, ResendVerificationRequest, ResetPasswordRequest,
    VerifyEmailRequest,
};
pub use account_request::{ChangePasswordRequest, DeleteAccountRequest, UpdateEmailRequest};
