use serde::{Deserialize, Serialize};
use crate::domain::dto::accounts::response::AccountResponse;
use crate::domain::models::{AuthSession, TokenPair};

/// 토큰을 발급하는 성공 응답 (로그인, 이메일 인증, Google 로그인)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSessionResponse {
    pub account: AccountResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// 액세스 토큰 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

impl From<AuthSession> for AuthSessionResponse {
    fn from(session: AuthSession) -> Self {
        let AuthSession { account, tokens } = session;
        Self {
            account: AccountResponse::from(&account),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.expires_in,
        }
    }
}

/// 리프레시 토큰 갱신 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.expires_in,
        }
    }
}

/// OAuth 로그인 URL 응답
///
/// `state`는 서명된 값이라 서버에 따로 저장하지 않습니다.
#[derive(Debug, Serialize)]
pub struct OAuthLoginUrlResponse {
    pub login_url: String,
    pub state: String,
}
