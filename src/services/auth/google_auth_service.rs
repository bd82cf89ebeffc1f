//! # Google OAuth 2.0 인증 서비스
//!
//! Authorization Code Flow의 서버 측 절반을 담당합니다. 핸드셰이크가 끝나면
//! 검증된 [`GoogleProfile`]만 계정 서비스에 넘기고, 계정 연동/생성은 하지 않습니다.
//!
//! ```text
//! GET /auth/google/login     → 서명된 state를 담은 Google 동의 화면 URL
//! Google                     → GET /auth/google/callback?code=..&state=..
//! callback                   → state 검증 → code 교환 → userinfo 조회 → GoogleProfile
//! ```
//!
//! ## State
//!
//! `nonce.issued_at.signature` 형식이며 `signature`는 `OAUTH_STATE_SECRET`으로 만든
//! HMAC-SHA256입니다. 서버에 저장하지 않고 서명과 발급 시각만으로 검증하며,
//! `OAUTH_SESSION_TIMEOUT_MINUTES`가 지나면 거부합니다.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use crate::config::{GoogleOAuthConfig, OAuthConfig};
use crate::domain::dto::OAuthLoginUrlResponse;
use crate::domain::models::{GoogleProfile, GoogleTokenResponse, GoogleUserInfo};
use crate::errors::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Google OAuth 클라이언트 설정
#[derive(Debug, Clone)]
pub struct GoogleOAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub userinfo_uri: String,
    pub state_secret: String,
    pub state_ttl: Duration,
}

impl GoogleOAuthSettings {
    pub fn from_env() -> Self {
        Self {
            client_id: GoogleOAuthConfig::client_id(),
            client_secret: GoogleOAuthConfig::client_secret(),
            redirect_uri: GoogleOAuthConfig::redirect_uri(),
            auth_uri: GoogleOAuthConfig::auth_uri(),
            token_uri: GoogleOAuthConfig::token_uri(),
            userinfo_uri: GoogleOAuthConfig::userinfo_uri(),
            state_secret: OAuthConfig::state_secret(),
            state_ttl: Duration::minutes(OAuthConfig::session_timeout_minutes()),
        }
    }
}

pub struct GoogleAuthService {
    settings: GoogleOAuthSettings,
    http: reqwest::Client,
}

impl GoogleAuthService {
    pub fn new(settings: GoogleOAuthSettings) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(GoogleOAuthSettings::from_env())
    }

    /// Google 동의 화면 URL 생성
    pub fn get_login_url(&self) -> AppResult<OAuthLoginUrlResponse> {
        if self.settings.client_id.is_empty() {
            return Err(AppError::ExternalServiceError("GOOGLE_CLIENT_ID가 설정되지 않았습니다".to_string()));
        }

        let state = self.generate_oauth_state()?;

        let params = [
            ("client_id", self.settings.client_id.as_str()),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("scope", "openid email profile"),
            ("response_type", "code"),
            ("access_type", "online"),
            ("prompt", "select_account"),
            ("state", state.as_str()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let login_url = format!("{}?{}", self.settings.auth_uri, query_string);

        Ok(OAuthLoginUrlResponse { login_url, state })
    }

    /// 콜백의 code와 state로 검증된 Google 프로필을 얻습니다.
    pub async fn fetch_profile(&self, auth_code: &str, state: &str) -> AppResult<GoogleProfile> {
        self.verify_oauth_state(state)?;

        let token_response = self.exchange_code_for_token(auth_code).await?;
        let user_info = self.get_user_info(&token_response.access_token).await?;

        profile_from_userinfo(user_info)
    }

    async fn exchange_code_for_token(&self, auth_code: &str) -> AppResult<GoogleTokenResponse> {
        let params = [
            ("code", auth_code),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.http
            .post(&self.settings.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 토큰 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("Google 토큰 교환 실패 ({}): {}", status, error_text);
            return Err(AppError::Unauthorized("Google 인증 코드가 유효하지 않습니다".to_string()));
        }

        response
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 토큰 응답 파싱 실패: {}", e)))
    }

    async fn get_user_info(&self, access_token: &str) -> AppResult<GoogleUserInfo> {
        let response = self.http
            .get(&self.settings.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 사용자 정보 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Google 사용자 정보 조회 실패: {}", error_text
            )));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 사용자 정보 파싱 실패: {}", e)))
    }

    fn generate_oauth_state(&self) -> AppResult<String> {
        let mut nonce = [0u8; 16];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let payload = format!("{}.{}", URL_SAFE_NO_PAD.encode(nonce), Utc::now().timestamp());
        let signature = self.sign_state(&payload)?;

        Ok(format!("{}.{}", payload, signature))
    }

    fn verify_oauth_state(&self, state: &str) -> AppResult<()> {
        let invalid = || AppError::Unauthorized("유효하지 않은 OAuth state".to_string());

        let (payload, signature) = state.rsplit_once('.').ok_or_else(invalid)?;
        let (_, issued_at) = payload.split_once('.').ok_or_else(invalid)?;
        let issued_at: i64 = issued_at.parse().map_err(|_| invalid())?;

        let signature = hex::decode(signature).map_err(|_| invalid())?;
        self.state_mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| invalid())?;

        let age = Utc::now().timestamp() - issued_at;
        if age < 0 || age > self.settings.state_ttl.num_seconds() {
            return Err(AppError::Unauthorized("OAuth 세션이 만료되었습니다. 다시 시도해주세요".to_string()));
        }

        Ok(())
    }

    fn sign_state(&self, payload: &str) -> AppResult<String> {
        Ok(hex::encode(self.state_mac(payload)?.finalize().into_bytes()))
    }

    fn state_mac(&self, payload: &str) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.settings.state_secret.as_bytes())
            .map_err(|e| AppError::InternalError(format!("HMAC 키 생성 실패: {}", e)))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}

/// Google이 이메일 소유를 확인하지 않은 프로필은 거부합니다.
///
/// 이메일로 기존 로컬 계정에 연동되므로, 확인되지 않은 이메일을 받으면
/// 남의 계정을 가로챌 수 있습니다.
fn profile_from_userinfo(info: GoogleUserInfo) -> AppResult<GoogleProfile> {
    if !info.verified_email {
        log::warn!("이메일이 확인되지 않은 Google 계정 로그인 거부: {}", info.id);
        return Err(AppError::Forbidden("Google에서 이메일 인증이 완료되지 않은 계정입니다".to_string()));
    }
    if info.email.trim().is_empty() {
        return Err(AppError::Forbidden("Google 계정에 이메일이 없습니다".to_string()));
    }
    Ok(GoogleProfile::from(info))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> GoogleAuthService {
        GoogleAuthService::new(GoogleOAuthSettings {
            client_id: "client-123".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://localhost:8080/api/v1/auth/google/callback".into(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".into(),
            token_uri: "https://oauth2.googleapis.com/token".into(),
            userinfo_uri: "https://www.googleapis.com/oauth2/v2/userinfo".into(),
            state_secret: "state-secret".into(),
            state_ttl: Duration::minutes(10),
        })
    }

    #[test]
    fn test_login_url_contains_client_and_state() {
        let service = service();
        let response = service.get_login_url().unwrap();

        assert!(response.login_url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(response.login_url.contains("client_id=client-123"));
        assert!(response.login_url.contains(&format!("state={}", urlencoding::encode(&response.state))));
        assert!(service.verify_oauth_state(&response.state).is_ok());
    }

    #[test]
    fn test_tampered_state_is_rejected() {
        let service = service();
        let state = service.generate_oauth_state().unwrap();

        let (payload, _) = state.rsplit_once('.').unwrap();
        let forged = format!("{}.{}", payload, "00".repeat(32));
        assert!(service.verify_oauth_state(&forged).is_err());
        assert!(service.verify_oauth_state("").is_err());
        assert!(service.verify_oauth_state("abc").is_err());
    }

    #[test]
    fn test_expired_state_is_rejected() {
        let service = service();
        let payload = format!("nonce.{}", Utc::now().timestamp() - 11 * 60);
        let state = format!("{}.{}", payload, service.sign_state(&payload).unwrap());

        assert!(matches!(service.verify_oauth_state(&state), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_state_from_other_secret_is_rejected() {
        let mut other_settings = service().settings.clone();
        other_settings.state_secret = "other".into();
        let other = GoogleAuthService::new(other_settings);

        let state = other.generate_oauth_state().unwrap();
        assert!(service().verify_oauth_state(&state).is_err());
    }

    #[test]
    fn test_unverified_google_email_is_rejected() {
        let info = GoogleUserInfo {
            id: "g-1".into(),
            email: "ann@x.com".into(),
            name: Some("Ann".into()),
            picture: None,
            verified_email: false,
        };
        assert!(matches!(profile_from_userinfo(info), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_verified_google_profile() {
        let info = GoogleUserInfo {
            id: "g-1".into(),
            email: "ann@x.com".into(),
            name: Some("Ann".into()),
            picture: Some("https://p/a.png".into()),
            verified_email: true,
        };
        let profile = profile_from_userinfo(info).unwrap();
        assert_eq!(profile.provider_id, "g-1");
        assert_eq!(profile.display_name, "Ann");
    }
}
