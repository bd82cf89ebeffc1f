//! 인증 요청 DTO
//!
//! 가입, 로그인, 이메일 인증, 토큰 갱신, 비밀번호 재설정처럼
//! 로그인 전에 호출되는 엔드포인트의 요청 본문입니다.
use serde::Deserialize;
use validator::Validate;
use crate::utils::string_utils::deserialize_optional_string;

/// 회원가입 요청
///
/// 비밀번호 정책(최소 길이)은 서비스 계층에서 `PasswordConfig` 기준으로 검사합니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    pub name: String,

    #[validate(length(min = 1, message = "이메일을 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 로컬 로그인 요청
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "이메일을 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 이메일 인증 요청 (메일 링크의 토큰)
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "인증 토큰이 필요합니다"))]
    pub token: String,
}

/// 인증 메일 재발송 요청
#[derive(Debug, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    #[validate(length(min = 1, message = "이메일을 입력해주세요"))]
    pub email: String,
}

/// 리프레시 토큰 갱신 요청
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}

/// 로그아웃 요청
///
/// 토큰을 생략하면 아무 것도 폐기하지 않고 성공합니다.
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub refresh_token: Option<String>,
}

/// 비밀번호 재설정 메일 요청
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "이메일을 입력해주세요"))]
    pub email: String,
}

/// 비밀번호 재설정 요청
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "재설정 토큰이 필요합니다"))]
    pub token: String,

    #[validate(length(min = 1, message = "새 비밀번호를 입력해주세요"))]
    pub password: String,
}

/// OAuth 콜백 쿼리 파라미터
///
/// 사용자가 동의를 거부하면 Google은 `code` 없이 `error`만 보냅니다.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
