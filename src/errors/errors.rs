//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다. 계정 상태 머신의 모든 실패는 고유한
//! `code`를 가진 타입화된 결과로 표현되며, 라우팅 계층은 이를 그대로
//! HTTP 상태 코드와 JSON 본문으로 변환합니다.
//!
//! ## 응답 형식
//!
//! ```json
//! { "error": "email_not_verified", "message": "...", "email": "ann@x.com", "requires_verification": true }
//! ```
//!
//! 저장소/외부 서비스 장애(`Dependency` 분류)는 서버 로그에만 상세 내용을 남기고
//! 클라이언트에는 일반 메시지만 반환합니다.

use actix_web::http::StatusCode;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// 에러 분류
///
/// 라우팅 계층과 로깅에서 에러를 묶어서 다룰 때 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 잘못된 입력 (사용자가 수정 가능)
    Validation,
    /// 잘못되었거나 없거나 만료된 자격 증명/토큰
    Authentication,
    /// 유일성 위반
    Conflict,
    /// 리소스 없음
    NotFound,
    /// 계정의 인증 방식 때문에 허용되지 않는 작업
    Policy,
    /// 저장소, 메일 발송 등 외부 의존성 장애
    Dependency,
}

/// 애플리케이션 전역 에러 타입
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 외부 서비스 에러 (메일 발송, Google API 등) (500)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500)
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// 입력값 검증 에러 (400)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 접근 거부 (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("이미 사용 중인 이메일입니다")]
    EmailInUse,

    #[error("잘못된 이메일 또는 비밀번호입니다")]
    InvalidCredentials,

    #[error("Google 로그인으로 가입된 계정입니다. Google 버튼으로 로그인해주세요")]
    UseGoogleAuth,

    #[error("로그인하기 전에 이메일 인증을 완료해주세요")]
    EmailNotVerified { email: String },

    #[error("이미 인증된 이메일입니다")]
    AlreadyVerified,

    #[error("유효하지 않은 인증 토큰입니다")]
    TokenEmailMismatch,

    #[error("토큰이 유효하지 않거나 만료되었습니다")]
    InvalidOrExpiredToken,

    #[error("인증 메일을 다시 요청하려면 잠시 기다려주세요")]
    VerificationThrottled { retry_after_secs: i64 },

    #[error("Google 계정은 비밀번호가 없습니다")]
    GoogleAccountNoPassword,

    #[error("Google 계정의 이메일은 Google에서 관리됩니다")]
    GoogleManaged,

    #[error("Google 계정은 비밀번호를 재설정할 수 없습니다. Google로 로그인해주세요")]
    PasswordResetUnavailable,

    #[error("현재 비밀번호가 올바르지 않습니다")]
    IncorrectPassword,

    #[error("새 비밀번호가 현재 비밀번호와 같습니다")]
    SamePassword,

    #[error("이미 현재 사용 중인 이메일입니다")]
    EmailUnchanged,

    #[error("계정이 동시에 수정되었습니다. 다시 시도해주세요")]
    ConcurrentModification,
}

impl AppError {
    /// 에러 분류
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::DatabaseError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_) => ErrorCategory::Dependency,

            AppError::ValidationError(_)
            | AppError::AlreadyVerified
            | AppError::TokenEmailMismatch
            | AppError::SamePassword
            | AppError::EmailUnchanged
            | AppError::VerificationThrottled { .. } => ErrorCategory::Validation,

            AppError::NotFound(_) => ErrorCategory::NotFound,

            AppError::ConflictError(_)
            | AppError::EmailInUse
            | AppError::ConcurrentModification => ErrorCategory::Conflict,

            AppError::Unauthorized(_)
            | AppError::Forbidden(_)
            | AppError::InvalidCredentials
            | AppError::EmailNotVerified { .. }
            | AppError::InvalidOrExpiredToken
            | AppError::IncorrectPassword => ErrorCategory::Authentication,

            AppError::UseGoogleAuth
            | AppError::GoogleAccountNoPassword
            | AppError::GoogleManaged
            | AppError::PasswordResetUnavailable => ErrorCategory::Policy,
        }
    }

    /// 클라이언트가 분기할 수 있는 고정 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_) => "dependency_failure",
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::ConflictError(_) => "conflict",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::EmailInUse => "email_in_use",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::UseGoogleAuth => "use_google_auth",
            AppError::EmailNotVerified { .. } => "email_not_verified",
            AppError::AlreadyVerified => "already_verified",
            AppError::TokenEmailMismatch => "token_email_mismatch",
            AppError::InvalidOrExpiredToken => "invalid_or_expired_token",
            AppError::VerificationThrottled { .. } => "verification_throttled",
            AppError::GoogleAccountNoPassword => "google_account_no_password",
            AppError::GoogleManaged => "google_managed",
            AppError::PasswordResetUnavailable => "password_reset_unavailable",
            AppError::IncorrectPassword => "incorrect_password",
            AppError::SamePassword => "same_password",
            AppError::EmailUnchanged => "email_unchanged",
            AppError::ConcurrentModification => "concurrent_modification",
        }
    }

    /// 클라이언트에게 노출할 메시지
    ///
    /// `Dependency` 분류는 내부 정보를 숨깁니다.
    pub fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_) => {
                "요청을 처리하는 중 서버 오류가 발생했습니다. 잠시 후 다시 시도해주세요".to_string()
            }
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    fn extra_fields(&self) -> Map<String, Value> {
        let mut extra = Map::new();
        match self {
            AppError::EmailNotVerified { email } => {
                extra.insert("requires_verification".into(), json!(true));
                extra.insert("email".into(), json!(email));
            }
            AppError::UseGoogleAuth => {
                extra.insert("use_google_auth".into(), json!(true));
            }
            AppError::AlreadyVerified => {
                extra.insert("already_verified".into(), json!(true));
            }
            AppError::InvalidOrExpiredToken => {
                extra.insert("expired".into(), json!(true));
            }
            AppError::VerificationThrottled { retry_after_secs } => {
                extra.insert("retry_after_secs".into(), json!(retry_after_secs));
            }
            _ => {}
        }
        extra
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_)
            | AppError::EmailInUse
            | AppError::ConcurrentModification => StatusCode::CONFLICT,
            AppError::Unauthorized(_) | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::EmailNotVerified { .. } => StatusCode::FORBIDDEN,
            AppError::VerificationThrottled { .. } => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        if self.category() == ErrorCategory::Dependency {
            log::error!("요청 처리 실패: {}", self);
        }

        let mut body = Map::new();
        body.insert("error".into(), json!(self.code()));
        body.insert("message".into(), json!(self.public_message()));
        body.extend(self.extra_fields());

        actix_web::HttpResponse::build(self.status_code()).json(Value::Object(body))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::MessageBody;

    fn body_json(error: &AppError) -> Value {
        let response = error.error_response();
        let bytes = response.into_body().try_into_bytes().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("Email is required".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_status_codes_for_account_outcomes() {
        assert_eq!(AppError::EmailInUse.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::EmailNotVerified { email: "a@b.com".into() }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::VerificationThrottled { retry_after_secs: 30 }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(AppError::Forbidden("revoked".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::SamePassword.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_policy_category() {
        assert_eq!(AppError::UseGoogleAuth.category(), ErrorCategory::Policy);
        assert_eq!(AppError::GoogleManaged.category(), ErrorCategory::Policy);
        assert_eq!(AppError::PasswordResetUnavailable.category(), ErrorCategory::Policy);
    }

    #[test]
    fn test_email_not_verified_carries_email() {
        let body = body_json(&AppError::EmailNotVerified { email: "ann@x.com".into() });

        assert_eq!(body["error"], "email_not_verified");
        assert_eq!(body["email"], "ann@x.com");
        assert_eq!(body["requires_verification"], true);
    }

    #[test]
    fn test_dependency_failure_hides_details() {
        let error = AppError::DatabaseError("connection refused at 10.0.0.3:27017".into());
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(&error);
        assert_eq!(body["error"], "dependency_failure");
        assert!(!body["message"].as_str().unwrap().contains("10.0.0.3"));
    }
}
