//! # 계정 상태 머신 서비스
//!
//! 가입부터 삭제까지 계정의 모든 상태 전이를 담당합니다.
//! 이 모듈에는 서비스 구조체와 공통 갱신 헬퍼, 프로필/이메일/삭제 작업이 있고
//! 나머지 작업은 같은 디렉터리의 파일에 나뉘어 있습니다.
//!
//! | 파일 | 작업 |
//! |------|------|
//! | `registration.rs` | 가입, 이메일 인증, 인증 메일 재발송 |
//! | `session.rs` | 로그인, Google 로그인, 토큰 갱신, 로그아웃 |
//! | `password.rs` | 비밀번호 찾기/재설정/변경 |
//!
//! ## 동시성
//!
//! 계정 문서는 `version` 필드로 낙관적 동시성 제어를 합니다.
//! 모든 상태 변경은 [`AccountService::mutate`]를 거치며, 읽은 뒤 다른 요청이
//! 먼저 저장했다면 최신 문서를 다시 읽어 같은 변경을 재적용합니다.
//! 그래서 동시에 들어온 로그인 두 건은 각자의 리프레시 토큰 지문을 모두 남기고,
//! 동시에 들어온 토큰 갱신 두 건 중 하나는 이미 교체된 집합을 보고 거부됩니다.
//!
//! ```text
//! find_by_id ──▶ apply(&mut account) ──▶ update(version 조건)
//!     ▲                                        │
//!     └──────── ConcurrentModification ◀───────┘ (최대 3회)
//! ```

use std::sync::Arc;
use crate::config::{AuthProvider, PasswordConfig};
use crate::domain::entities::Account;
use crate::errors::{AppError, AppResult};
use crate::repositories::accounts::AccountStore;
use crate::services::auth::{CredentialHasher, TokenService};
use crate::services::notifications::{NotificationKind, NotificationLinks, Notifier};
use crate::domain::models::EmailActionPurpose;
use crate::utils::string_utils::validate_email;

/// 인증 메일 재발송 최소 간격 (초)
pub const VERIFICATION_RESEND_COOLDOWN_SECS: i64 = 60;

/// 버전 충돌 시 재시도 횟수
const MAX_UPDATE_ATTEMPTS: usize = 3;

/// 계정 상태 머신
///
/// 저장소, 토큰 발급기, 알림 발송기는 모두 trait 객체로 주입되므로
/// 테스트에서는 메모리 저장소와 기록용 발송기로 교체할 수 있습니다.
pub struct AccountService {
    pub(super) store: Arc<dyn AccountStore>,
    pub(super) hasher: CredentialHasher,
    pub(super) tokens: Arc<TokenService>,
    pub(super) notifier: Arc<dyn Notifier>,
    pub(super) links: NotificationLinks,
    pub(super) password_min_length: usize,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: CredentialHasher,
        tokens: Arc<TokenService>,
        notifier: Arc<dyn Notifier>,
        links: NotificationLinks,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            notifier,
            links,
            password_min_length: PasswordConfig::min_length(),
        }
    }

    /// 계정을 읽고 `apply`로 변경한 뒤 버전 조건부로 저장합니다.
    ///
    /// `apply`가 에러를 반환하면 아무것도 저장하지 않고 그 에러를 돌려줍니다.
    /// 재시도 시 `apply`는 새로 읽은 문서로 다시 호출되므로 같은 검사를
    /// 최신 상태에 대해 다시 수행합니다.
    pub(super) async fn mutate<T, F, N>(
        &self,
        account_id: &str,
        not_found: N,
        mut apply: F,
    ) -> AppResult<(Account, T)>
    where
        F: FnMut(&mut Account) -> AppResult<T>,
        N: Fn() -> AppError,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut account = self.store.find_by_id(account_id).await?.ok_or_else(&not_found)?;
            let output = apply(&mut account)?;

            match self.store.update(&account).await {
                Ok(saved) => return Ok((saved, output)),
                Err(AppError::ConcurrentModification) if attempt < MAX_UPDATE_ATTEMPTS => {
                    log::debug!("계정 {} 버전 충돌, 재시도 {}/{}", account_id, attempt, MAX_UPDATE_ATTEMPTS);
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub(super) async fn load(&self, account_id: &str) -> AppResult<Account> {
        self.store
            .find_by_id(account_id)
            .await?
            .ok_or_else(account_not_found)
    }

    /// 인증 링크를 담은 메일 발송
    pub(super) async fn send_verification(&self, account: &Account) -> AppResult<()> {
        let token = self.tokens.issue_email_action_token(
            &account.id,
            &account.email,
            EmailActionPurpose::EmailVerification,
            self.tokens.lifetimes().email_verification,
        )?;

        self.notifier
            .send(NotificationKind::Verification, account, &self.links.verify_email(&token))
            .await
    }

    /// 현재 계정 조회
    pub async fn get_profile(&self, account_id: &str) -> AppResult<Account> {
        self.load(account_id).await
    }

    /// 이메일 변경
    ///
    /// 새 주소는 미인증 상태가 되고 인증 메일이 발송됩니다.
    /// 메일 발송 실패는 경고 로그만 남기며 변경은 유지됩니다.
    ///
    /// 검사 순서: Google 계정 → 형식 → 동일 주소 → 중복
    pub async fn update_email(&self, account_id: &str, new_email: &str) -> AppResult<Account> {
        let current = self.load(account_id).await?;
        if current.is_google() {
            return Err(AppError::GoogleManaged);
        }

        let email = validate_email(new_email)?;
        if email == current.email {
            return Err(AppError::EmailUnchanged);
        }
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailInUse);
        }

        let (updated, _) = self
            .mutate(account_id, account_not_found, |account| {
                if account.is_google() {
                    return Err(AppError::GoogleManaged);
                }
                account.change_email(email.clone());
                account.record_verification_sent();
                Ok(())
            })
            .await?;

        log::info!("이메일 변경: {} ({} -> {})", updated.id, current.email, updated.email);

        if let Err(e) = self.send_verification(&updated).await {
            log::warn!("변경된 이메일로 인증 메일 발송 실패 {}: {}", updated.email, e);
        }

        Ok(updated)
    }

    /// 계정 삭제 (hard delete)
    ///
    /// 비밀번호가 있는 로컬 계정은 비밀번호 확인이 필요합니다.
    /// Google 계정은 확인 없이 삭제됩니다.
    pub async fn delete_account(&self, account_id: &str, password: Option<&str>) -> AppResult<()> {
        let account = self.load(account_id).await?;

        if account.auth_provider == AuthProvider::Local && account.password_hash.is_some() {
            let password = password.filter(|p| !p.is_empty()).ok_or(AppError::InvalidCredentials)?;
            if !self.hasher.verify(password, account.password_hash.as_deref()).await? {
                log::warn!("계정 삭제 비밀번호 불일치: {}", account.id);
                return Err(AppError::InvalidCredentials);
            }
        }

        if !self.store.delete(&account.id).await? {
            return Err(account_not_found());
        }

        log::info!("계정 삭제: {} ({})", account.id, account.email);
        Ok(())
    }
}

pub(super) fn account_not_found() -> AppError {
    AppError::NotFound("계정을 찾을 수 없습니다".to_string())
}
