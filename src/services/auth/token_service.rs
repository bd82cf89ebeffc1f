//! JWT 토큰 발급/검증 서비스
//!
//! 세 종류의 토큰을 서로 다른 HS256 키로 서명합니다.
//!
//! | 토큰 | 키 | 기본 수명 |
//! |------|----|-----------|
//! | 액세스 | `JWT_SECRET` | 15분 |
//! | 리프레시 | `REFRESH_TOKEN_SECRET` | 7일 |
//! | 이메일 액션 (인증/재설정) | `EMAIL_VERIFICATION_SECRET` | 24시간 / 10분 |
//!
//! 리프레시 토큰과 비밀번호 재설정 토큰은 원문을 저장하지 않습니다.
//! 리프레시 토큰은 SHA-256 지문으로, 재설정 토큰은 HMAC-SHA256 keyed hash로 저장합니다.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use crate::config::JwtConfig;
use crate::domain::models::{EmailActionClaims, EmailActionPurpose, SessionClaims, TokenKind, TokenPair};
use crate::errors::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// 토큰 검증 실패 사유
///
/// 호출하는 쪽에서 토큰 종류에 맞는 `AppError`로 변환합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("유효하지 않은 토큰입니다")]
    Invalid,
    #[error("토큰 용도가 일치하지 않습니다")]
    PurposeMismatch,
}

/// 서명 키 묶음
#[derive(Clone)]
pub struct TokenKeys {
    pub access_secret: String,
    pub refresh_secret: String,
    pub email_action_secret: String,
}

impl TokenKeys {
    pub fn from_env() -> Self {
        Self {
            access_secret: JwtConfig::access_secret(),
            refresh_secret: JwtConfig::refresh_secret(),
            email_action_secret: JwtConfig::email_action_secret(),
        }
    }
}

/// 토큰 수명 묶음
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
    pub email_verification: Duration,
    pub password_reset: Duration,
}

impl TokenLifetimes {
    pub fn from_env() -> Self {
        Self {
            access: Duration::minutes(JwtConfig::access_ttl_minutes()),
            refresh: Duration::days(JwtConfig::refresh_ttl_days()),
            email_verification: Duration::hours(JwtConfig::email_verification_ttl_hours()),
            password_reset: Duration::minutes(JwtConfig::password_reset_ttl_minutes()),
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(7),
            email_verification: Duration::hours(24),
            password_reset: Duration::minutes(10),
        }
    }
}

pub struct TokenService {
    keys: TokenKeys,
    lifetimes: TokenLifetimes,
}

impl TokenService {
    pub fn new(keys: TokenKeys, lifetimes: TokenLifetimes) -> Self {
        Self { keys, lifetimes }
    }

    pub fn from_env() -> Self {
        Self::new(TokenKeys::from_env(), TokenLifetimes::from_env())
    }

    pub fn lifetimes(&self) -> &TokenLifetimes {
        &self.lifetimes
    }

    /// 액세스 + 리프레시 토큰 쌍 발급
    pub fn issue_session_pair(&self, account_id: &str) -> AppResult<TokenPair> {
        let access_token = self.issue_session_token(account_id, TokenKind::Access)?;
        let refresh_token = self.issue_session_token(account_id, TokenKind::Refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.lifetimes.access.num_seconds(),
        })
    }

    fn issue_session_token(&self, account_id: &str, kind: TokenKind) -> AppResult<String> {
        let (secret, lifetime) = match kind {
            TokenKind::Access => (&self.keys.access_secret, self.lifetimes.access),
            TokenKind::Refresh => (&self.keys.refresh_secret, self.lifetimes.refresh),
        };

        let now = Utc::now();
        let claims = SessionClaims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
        };

        sign(&claims, secret)
    }

    pub fn verify_access(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_session(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_session(token, TokenKind::Refresh)
    }

    fn verify_session(&self, token: &str, expected: TokenKind) -> Result<SessionClaims, TokenError> {
        let secret = match expected {
            TokenKind::Access => &self.keys.access_secret,
            TokenKind::Refresh => &self.keys.refresh_secret,
        };

        let claims: SessionClaims = verify(token, secret)?;
        if claims.kind != expected {
            return Err(TokenError::PurposeMismatch);
        }
        Ok(claims)
    }

    /// 이메일 액션 토큰 발급 (계정 ID + 발급 당시 이메일 + 용도)
    pub fn issue_email_action_token(
        &self,
        account_id: &str,
        email: &str,
        purpose: EmailActionPurpose,
        ttl: Duration,
    ) -> AppResult<String> {
        let now = Utc::now();
        let claims = EmailActionClaims {
            sub: account_id.to_string(),
            email: email.to_string(),
            purpose,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        sign(&claims, &self.keys.email_action_secret)
    }

    /// 서명은 유효해도 용도가 다르면 `PurposeMismatch`
    pub fn verify_email_action_token(
        &self,
        token: &str,
        expected: EmailActionPurpose,
    ) -> Result<EmailActionClaims, TokenError> {
        let claims: EmailActionClaims = verify(token, &self.keys.email_action_secret)?;
        if claims.purpose != expected {
            return Err(TokenError::PurposeMismatch);
        }
        Ok(claims)
    }

    /// 리프레시 토큰 지문 (SHA-256 hex)
    pub fn fingerprint(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// 비밀번호 재설정 토큰의 저장용 keyed hash (HMAC-SHA256 hex)
    pub fn hash_reset_token(&self, raw_token: &str) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.keys.email_action_secret.as_bytes())
            .map_err(|e| AppError::InternalError(format!("HMAC 키 생성 실패: {}", e)))?;
        mac.update(raw_token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// `Authorization: Bearer <token>` 헤더에서 토큰 추출
    pub fn extract_bearer_token(auth_header: &str) -> AppResult<&str> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(AppError::Unauthorized("유효하지 않은 인증 헤더 형식입니다".to_string())),
        }
    }
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> AppResult<String> {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
}

fn verify<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<T>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
}
