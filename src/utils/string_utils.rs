//! # 문자열 유틸리티
//!
//! 이메일 정규화, 필수 입력 검사, 비밀번호 정책처럼 여러 계층에서 공유하는
//! 문자열 처리 함수들입니다.

use serde::Deserialize;
use validator::ValidateEmail;
use crate::errors::AppError;

/// 필수 문자열 필드 검증 및 정리
///
/// 공백만 있으면 `ValidationError`, 그 외에는 앞뒤 공백을 제거한 값을 반환합니다.
///
/// ```rust,ignore
/// assert_eq!(validate_required_string("  Ann  ", "이름").unwrap(), "Ann");
/// assert!(validate_required_string("   ", "이름").is_err());
/// ```
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            format!("{}은(는) 필수입니다", field_name)
        ));
    }
    Ok(trimmed.to_string())
}

/// 이메일 정규화 (앞뒤 공백 제거 + 소문자)
///
/// 저장, 조회, 비교는 모두 정규화된 값으로 수행합니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 이메일 형식 검사
pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

/// 정규화 후 형식까지 확인한 이메일을 반환
pub fn validate_email(email: &str) -> Result<String, AppError> {
    let normalized = normalize_email(email);
    if normalized.is_empty() {
        return Err(AppError::ValidationError("이메일은 필수입니다".to_string()));
    }
    if !is_valid_email(&normalized) {
        return Err(AppError::ValidationError("유효한 이메일 주소를 입력해주세요".to_string()));
    }
    Ok(normalized)
}

/// 비밀번호 정책 검사 (최소 길이)
///
/// 길이는 바이트가 아니라 문자 수로 셉니다.
pub fn validate_password_policy(password: &str, min_length: usize) -> Result<(), AppError> {
    if password.chars().count() < min_length {
        return Err(AppError::ValidationError(
            format!("비밀번호는 최소 {}자 이상이어야 합니다", min_length)
        ));
    }
    Ok(())
}

/// 선택적 문자열 필드 정리
///
/// 값이 없거나 공백뿐이면 None, 그 외에는 trim 한 값을 반환합니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 선택적 문자열 필드를 위한 serde deserializer
///
/// `#[serde(default, deserialize_with = "deserialize_optional_string")]`와 함께 사용합니다.
/// 빈 문자열과 null은 모두 None이 됩니다.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}
