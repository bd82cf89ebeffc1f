//! 알림 발송 경계
//!
//! 계정 서비스는 메일 템플릿이나 전송 방식을 모르고, 종류/계정/링크만 넘깁니다.

use async_trait::async_trait;
use serde::Serialize;
use crate::domain::entities::Account;
use crate::errors::AppResult;

/// 알림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// 이메일 인증 링크
    Verification,
    /// 인증 완료 환영 메일
    Welcome,
    /// 비밀번호 재설정 링크
    PasswordReset,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Verification => "verification",
            NotificationKind::Welcome => "welcome",
            NotificationKind::PasswordReset => "password_reset",
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// 알림 발송. 실패하면 `AppError::ExternalServiceError`
    ///
    /// 재시도하지 않습니다.
    async fn send(&self, kind: NotificationKind, account: &Account, link: &str) -> AppResult<()>;
}

/// 프런트엔드 링크 생성기
#[derive(Debug, Clone)]
pub struct NotificationLinks {
    frontend_url: String,
}

impl NotificationLinks {
    pub fn new(frontend_url: impl Into<String>) -> Self {
        Self { frontend_url: frontend_url.into().trim_end_matches('/').to_string() }
    }

    pub fn verify_email(&self, token: &str) -> String {
        format!("{}/verify-email?token={}", self.frontend_url, urlencoding::encode(token))
    }

    pub fn reset_password(&self, token: &str) -> String {
        format!("{}/reset-password?token={}", self.frontend_url, urlencoding::encode(token))
    }

    pub fn dashboard(&self) -> String {
        format!("{}/dashboard", self.frontend_url)
    }

    /// OAuth 콜백 결과를 전달할 로그인 페이지
    pub fn login(&self) -> String {
        format!("{}/login", self.frontend_url)
    }
}
