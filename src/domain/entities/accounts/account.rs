//! Account Entity Implementation
//!
//! 계정 엔티티의 핵심 구현체입니다.
//! 로컬 인증(이메일/비밀번호)과 Google 연동을 하나의 모델로 표현하며,
//! 상태 전이는 모두 이 타입의 메서드를 통해 이루어집니다.
//!
//! ## 상태
//!
//! ```text
//! Unverified(local) ──verify──▶ Verified(local)
//!        │                            │
//!        └───────link google──────────┴──▶ Verified(google)
//!                                            ▲
//!                        google sign-up ─────┘
//! ```

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::config::AuthProvider;

/// 계정 엔티티
///
/// `refresh_tokens`에는 발급된 리프레시 토큰 원문이 아니라 SHA-256 지문이
/// 발급 순서대로 저장됩니다. 이 집합에 없는 리프레시 토큰은 서명이 유효해도 거부됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// 불변 식별자 (UUID v4)
    #[serde(rename = "_id")]
    pub id: String,
    /// 표시 이름
    pub name: String,
    /// 정규화된 이메일 (소문자, 공백 제거, unique)
    pub email: String,
    /// bcrypt 해시 (Google 가입 계정은 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub auth_provider: AuthProvider,
    /// Google subject id (sparse unique: 값이 없을 때는 필드 자체를 저장하지 않음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub email_verified: bool,
    #[serde(default)]
    pub email_verified_at: Option<DateTime>,
    /// 마지막 인증 메일 발급 시각 (재발송 제한에 사용)
    #[serde(default)]
    pub verification_sent_at: Option<DateTime>,
    /// 비밀번호 재설정 토큰의 keyed hash
    #[serde(default)]
    pub password_reset_token: Option<String>,
    #[serde(default)]
    pub password_reset_expires: Option<DateTime>,
    #[serde(default)]
    pub refresh_tokens: Vec<String>,
    #[serde(default)]
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    /// 낙관적 동시성 제어용 버전
    #[serde(default)]
    pub version: i64,
}

impl Account {
    /// 새 로컬 계정 생성 (미인증 상태)
    pub fn new_local(name: String, email: String, password_hash: String) -> Self {
        let now = DateTime::now();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash: Some(password_hash),
            auth_provider: AuthProvider::Local,
            google_id: None,
            profile_picture: None,
            email_verified: false,
            email_verified_at: None,
            verification_sent_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            refresh_tokens: Vec::new(),
            last_login_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// 새 Google 계정 생성
    ///
    /// Google이 이메일을 보증하므로 인증 완료 상태로 시작합니다.
    pub fn new_google(
        google_id: String,
        name: String,
        email: String,
        profile_picture: Option<String>,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash: None,
            auth_provider: AuthProvider::Google,
            google_id: Some(google_id),
            profile_picture,
            email_verified: true,
            email_verified_at: Some(now),
            verification_sent_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            refresh_tokens: Vec::new(),
            last_login_at: Some(now),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// 비밀번호 로그인이 가능한 계정인지 확인
    ///
    /// Google을 연동한 로컬 계정도 해시가 남아 있으면 비밀번호 로그인이 가능합니다.
    pub fn can_authenticate_with_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn is_google(&self) -> bool {
        self.auth_provider == AuthProvider::Google || self.google_id.is_some()
    }

    pub fn mark_email_verified(&mut self) {
        let now = DateTime::now();
        self.email_verified = true;
        self.email_verified_at = Some(now);
        self.updated_at = now;
    }

    pub fn record_verification_sent(&mut self) {
        let now = DateTime::now();
        self.verification_sent_at = Some(now);
        self.updated_at = now;
    }

    /// 발송에 실패한 인증 메일 기록 취소 (재발송 제한 해제)
    pub fn clear_verification_sent(&mut self) {
        self.verification_sent_at = None;
        self.updated_at = DateTime::now();
    }

    /// 재발송 제한이 풀리기까지 남은 초 (0이면 발송 가능)
    pub fn verification_cooldown_remaining(&self, cooldown_secs: i64) -> i64 {
        match self.verification_sent_at {
            Some(sent_at) => {
                let elapsed_ms = DateTime::now().timestamp_millis() - sent_at.timestamp_millis();
                let remaining_ms = cooldown_secs * 1000 - elapsed_ms;
                if remaining_ms > 0 {
                    (remaining_ms + 999) / 1000
                } else {
                    0
                }
            }
            None => 0,
        }
    }

    /// 로그인 성공 기록: 리프레시 토큰 지문 추가 + 마지막 로그인 시각 갱신
    pub fn record_login(&mut self, refresh_fingerprint: String) {
        let now = DateTime::now();
        self.refresh_tokens.push(refresh_fingerprint);
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn has_refresh_token(&self, fingerprint: &str) -> bool {
        self.refresh_tokens.iter().any(|t| t == fingerprint)
    }

    /// 리프레시 토큰 집합 전체를 새 토큰 하나로 교체
    pub fn replace_refresh_tokens(&mut self, fingerprint: String) {
        self.refresh_tokens = vec![fingerprint];
        self.updated_at = DateTime::now();
    }

    /// 일치하는 리프레시 토큰 하나를 제거. 제거되었으면 true
    pub fn revoke_refresh_token(&mut self, fingerprint: &str) -> bool {
        let before = self.refresh_tokens.len();
        self.refresh_tokens.retain(|t| t != fingerprint);
        let removed = self.refresh_tokens.len() != before;
        if removed {
            self.updated_at = DateTime::now();
        }
        removed
    }

    /// 비밀번호 재설정 토큰 저장 (기존 요청은 덮어씀)
    pub fn set_password_reset(&mut self, token_hash: String, expires_at: DateTime) {
        self.password_reset_token = Some(token_hash);
        self.password_reset_expires = Some(expires_at);
        self.updated_at = DateTime::now();
    }

    pub fn clear_password_reset(&mut self) {
        self.password_reset_token = None;
        self.password_reset_expires = None;
        self.updated_at = DateTime::now();
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = Some(password_hash);
        self.updated_at = DateTime::now();
    }

    /// 이메일 변경. 인증 상태가 초기화됩니다.
    pub fn change_email(&mut self, email: String) {
        self.email = email;
        self.email_verified = false;
        self.email_verified_at = None;
        self.updated_at = DateTime::now();
    }

    /// Google 계정 연동
    ///
    /// 인증된 계정의 비밀번호 해시는 유지합니다. 미인증 계정의 비밀번호는
    /// 메일함 소유가 확인되지 않은 사람이 정한 값이므로 제거합니다.
    /// (DESIGN.md "Open question decisions"의 Google 연동 항목)
    /// 프로필 사진은 비어 있을 때만 채웁니다.
    pub fn link_google(&mut self, google_id: String, picture: Option<String>) {
        let now = DateTime::now();
        self.google_id = Some(google_id);
        self.auth_provider = AuthProvider::Google;
        if self.profile_picture.is_none() {
            self.profile_picture = picture;
        }
        if !self.email_verified {
            self.email_verified = true;
            self.password_hash = None;
            self.verification_sent_at = None;
        }
        if self.email_verified_at.is_none() {
            self.email_verified_at = Some(now);
        }
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn touch_login(&mut self) {
        let now = DateTime::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }
}
