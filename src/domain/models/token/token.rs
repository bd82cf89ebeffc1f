//! JWT 토큰 클레임 구조체와 발급된 토큰 쌍
//!
//! 모든 토큰은 `header.claims.signature` 형태의 compact JWS이며
//! 최소한 `sub`, `iat`, `exp`, `jti` 클레임을 가집니다.
use serde::{Deserialize, Serialize};

/// 세션 토큰 종류
///
/// 액세스/리프레시 토큰은 서로 다른 키로 서명되며, `kind` 클레임으로도 구분됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// 이메일 액션 토큰의 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailActionPurpose {
    EmailVerification,
    PasswordReset,
}

/// 액세스/리프레시 토큰의 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// 토큰의 주체 (계정 ID)
    pub sub: String,
    /// 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// 토큰 고유 ID
    pub jti: String,
    pub kind: TokenKind,
}

/// 이메일 인증 / 비밀번호 재설정 링크용 토큰의 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailActionClaims {
    pub sub: String,
    /// 토큰이 발급될 당시의 계정 이메일
    pub email: String,
    #[serde(rename = "type")]
    pub purpose: EmailActionPurpose,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// 발급된 액세스 + 리프레시 토큰 쌍
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 액세스 토큰 만료까지 남은 시간 (초)
    pub expires_in: i64,
}
