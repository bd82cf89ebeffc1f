//! 인증된 계정 관리 요청 DTO
use serde::Deserialize;
use validator::Validate;

/// 비밀번호 변경 요청
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "현재 비밀번호를 입력해주세요"))]
    pub current_password: String,

    #[validate(length(min = 1, message = "새 비밀번호를 입력해주세요"))]
    pub new_password: String,
}

/// 이메일 변경 요청
///
/// 형식 검사는 정규화 이후 서비스 계층에서 다시 수행합니다.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmailRequest {
    #[validate(length(min = 1, message = "새 이메일을 입력해주세요"))]
    pub email: String,
}

/// 계정 삭제 요청
///
/// 비밀번호가 있는 계정만 `password`가 필요합니다.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub password: Option<String>,
}
