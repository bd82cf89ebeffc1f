//! Google OAuth 응답 모델과 계정 상태 머신이 소비하는 프로필
use serde::{Deserialize, Serialize};

/// Google userinfo 엔드포인트 응답
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    /// Google 고유 사용자 ID (subject)
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    /// Google이 이메일 소유를 확인했는지 여부
    #[serde(default)]
    pub verified_email: bool,
}

/// Google 토큰 엔드포인트 응답
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// OAuth 핸드셰이크가 끝난 뒤 검증된 외부 프로필
///
/// 계정 상태 머신은 OAuth 프로토콜을 알지 못하고 이 값만 받습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleProfile {
    pub provider_id: String,
    pub email: String,
    pub display_name: String,
    pub picture_url: Option<String>,
}

impl From<GoogleUserInfo> for GoogleProfile {
    fn from(info: GoogleUserInfo) -> Self {
        // 이름이 없으면 이메일의 로컬 파트를 표시 이름으로 사용
        let display_name = info
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| info.email.split('@').next().unwrap_or_default().to_string());

        Self {
            provider_id: info.id,
            email: info.email,
            display_name,
            picture_url: info.picture,
        }
    }
}
