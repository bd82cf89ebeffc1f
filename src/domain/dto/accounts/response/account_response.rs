use serde::{Deserialize, Serialize};
use mongodb::bson::DateTime;
use crate::config::AuthProvider;
use crate::domain::entities::Account;

/// 계정의 공개 정보
///
/// 비밀번호 해시, 재설정 토큰, 리프레시 토큰 지문은 포함하지 않습니다.
/// 시각은 RFC 3339 문자열입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub auth_provider: AuthProvider,
    pub profile_picture: Option<String>,
    pub email_verified: bool,
    pub email_verified_at: Option<String>,
    pub last_login_at: Option<String>,
    pub created_at: Option<String>,
}

fn rfc3339(value: Option<DateTime>) -> Option<String> {
    value.and_then(|dt| dt.try_to_rfc3339_string().ok())
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            auth_provider: account.auth_provider,
            profile_picture: account.profile_picture.clone(),
            email_verified: account.email_verified,
            email_verified_at: rfc3339(account.email_verified_at),
            last_login_at: rfc3339(account.last_login_at),
            created_at: rfc3339(Some(account.created_at)),
        }
    }
}

/// 회원가입 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub account: AccountResponse,
}

/// 메시지만 담는 성공 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
