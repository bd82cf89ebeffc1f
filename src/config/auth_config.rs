//! 인증 관련 설정
//!
//! JWT 서명 키, 토큰 수명, Google OAuth, 메일 발송 설정을 환경 변수에서 읽습니다.
//! 액세스/리프레시/이메일 액션 토큰은 서로 독립된 비밀 키를 사용합니다.

use std::env;
use serde::{Deserialize, Serialize};
use crate::config::Environment;

/// Google OAuth 2.0 클라이언트 설정
pub struct GoogleOAuthConfig;

impl GoogleOAuthConfig {
    /// 프로덕션에서는 필수. 개발 환경에서 비어 있으면 Google 로그인만 실패합니다.
    pub fn client_id() -> String {
        secret_from_env("GOOGLE_CLIENT_ID", "")
    }

    pub fn client_secret() -> String {
        secret_from_env("GOOGLE_CLIENT_SECRET", "")
    }

    pub fn redirect_uri() -> String {
        env::var("GOOGLE_REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:8080/api/v1/auth/google/callback".to_string())
    }

    pub fn auth_uri() -> String {
        env::var("GOOGLE_AUTH_URI")
            .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/auth".to_string())
    }

    pub fn token_uri() -> String {
        env::var("GOOGLE_TOKEN_URI")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string())
    }

    pub fn userinfo_uri() -> String {
        env::var("GOOGLE_USERINFO_URI")
            .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v2/userinfo".to_string())
    }
}

/// JWT 서명 키와 토큰 수명 설정
pub struct JwtConfig;

impl JwtConfig {
    /// 액세스 토큰 서명 키
    pub fn access_secret() -> String {
        secret_from_env("JWT_SECRET", "dev-access-secret")
    }

    /// 리프레시 토큰 서명 키 (액세스 키와 반드시 달라야 함)
    pub fn refresh_secret() -> String {
        secret_from_env("REFRESH_TOKEN_SECRET", "dev-refresh-secret")
    }

    /// 이메일 인증 토큰 서명 및 비밀번호 재설정 토큰 해시 키
    pub fn email_action_secret() -> String {
        secret_from_env("EMAIL_VERIFICATION_SECRET", "dev-email-action-secret")
    }

    pub fn access_ttl_minutes() -> i64 {
        int_from_env("ACCESS_TOKEN_TTL_MINUTES", 15)
    }

    pub fn refresh_ttl_days() -> i64 {
        int_from_env("REFRESH_TOKEN_TTL_DAYS", 7)
    }

    pub fn email_verification_ttl_hours() -> i64 {
        int_from_env("EMAIL_VERIFICATION_TTL_HOURS", 24)
    }

    pub fn password_reset_ttl_minutes() -> i64 {
        int_from_env("PASSWORD_RESET_TTL_MINUTES", 10)
    }
}

/// OAuth state 서명 설정
pub struct OAuthConfig;

impl OAuthConfig {
    pub fn state_secret() -> String {
        secret_from_env("OAUTH_STATE_SECRET", "dev-oauth-state-secret")
    }

    pub fn session_timeout_minutes() -> i64 {
        int_from_env("OAUTH_SESSION_TIMEOUT_MINUTES", 10)
    }
}

/// 메일 발송 API 설정
///
/// `MAIL_API_URL`이 없으면 메일을 보내지 않고 로그로만 남깁니다 (개발용).
pub struct MailConfig;

impl MailConfig {
    pub fn api_url() -> Option<String> {
        env::var("MAIL_API_URL").ok().filter(|url| !url.trim().is_empty())
    }

    pub fn api_key() -> Option<String> {
        env::var("MAIL_API_KEY").ok()
    }

    pub fn from_address() -> String {
        env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@localhost".to_string())
    }
}

/// 운영 환경에서 값이 비어 있으면 시작 시점에 panic
fn secret_from_env(name: &str, dev_default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            if Environment::current().is_production() {
                panic!("{} must be set in production", name);
            }
            log::warn!("{} not set, using default (not secure for production!)", name);
            dev_default.to_string()
        }
    }
}

fn int_from_env(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 계정의 인증 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// 이메일 + 비밀번호
    Local,
    /// Google 연동 계정
    Google,
}

impl AuthProvider {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "local" => Ok(AuthProvider::Local),
            "google" => Ok(AuthProvider::Google),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "local",
            AuthProvider::Google => "google",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_from_string() {
        assert_eq!(AuthProvider::from_str("local").unwrap(), AuthProvider::Local);
        assert_eq!(AuthProvider::from_str("GOOGLE").unwrap(), AuthProvider::Google);
        assert!(AuthProvider::from_str("github").is_err());
    }

    #[test]
    fn test_auth_provider_serializes_lowercase() {
        let json = serde_json::to_string(&AuthProvider::Google).unwrap();
        assert_eq!(json, "\"google\"");

        let provider: AuthProvider = serde_json::from_str("\"local\"").unwrap();
        assert_eq!(provider, AuthProvider::Local);
    }

    #[test]
    fn test_token_lifetime_defaults() {
        if env::var("ACCESS_TOKEN_TTL_MINUTES").is_err() {
            assert_eq!(JwtConfig::access_ttl_minutes(), 15);
        }
        if env::var("REFRESH_TOKEN_TTL_DAYS").is_err() {
            assert_eq!(JwtConfig::refresh_ttl_days(), 7);
        }
        if env::var("PASSWORD_RESET_TTL_MINUTES").is_err() {
            assert_eq!(JwtConfig::password_reset_ttl_minutes(), 10);
        }
    }
}
