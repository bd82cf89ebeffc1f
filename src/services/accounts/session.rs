//! 로그인, Google 로그인, 토큰 갱신, 로그아웃
//!
//! 토큰을 발급하는 모든 경로는 리프레시 토큰 지문을 계정에 저장한 뒤에만
//! 토큰을 돌려줍니다. 저장되지 않은 리프레시 토큰은 갱신에 쓸 수 없습니다.

use crate::domain::entities::Account;
use crate::domain::models::{AuthSession, GoogleProfile, TokenPair};
use crate::errors::{AppError, AppResult};
use crate::services::auth::TokenService;
use crate::utils::string_utils::normalize_email;
use super::account_service::{account_not_found, AccountService};

impl AccountService {
    /// 이메일/비밀번호 로그인
    ///
    /// 검사 순서: 계정 없음 → Google 전용 계정 → 비밀번호 → 이메일 인증.
    /// 계정이 없을 때와 비밀번호가 틀릴 때는 같은 `InvalidCredentials`를 반환합니다.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let email = normalize_email(email);
        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !account.can_authenticate_with_password() {
            log::info!("Google 전용 계정의 비밀번호 로그인 시도: {}", account.id);
            return Err(AppError::UseGoogleAuth);
        }

        if !self.hasher.verify(password, account.password_hash.as_deref()).await? {
            log::warn!("로그인 실패 (비밀번호 불일치): {}", account.id);
            return Err(AppError::InvalidCredentials);
        }

        if !account.email_verified {
            return Err(AppError::EmailNotVerified { email: account.email });
        }

        let session = self.start_session(&account.id).await?;
        log::info!("로그인: {} ({})", session.account.id, session.account.email);
        Ok(session)
    }

    /// 새 토큰 쌍을 발급하고 리프레시 지문을 계정에 추가
    async fn start_session(&self, account_id: &str) -> AppResult<AuthSession> {
        let tokens = self.tokens.issue_session_pair(account_id)?;
        let fingerprint = TokenService::fingerprint(&tokens.refresh_token);

        let (account, _) = self
            .mutate(account_id, account_not_found, |account| {
                account.record_login(fingerprint.clone());
                Ok(())
            })
            .await?;

        Ok(AuthSession { account, tokens })
    }

    /// 검증된 Google 프로필을 계정으로 해석합니다.
    ///
    /// 1. Google ID로 연결된 계정이 있으면 로그인 시각만 갱신
    /// 2. 같은 이메일의 계정이 있으면 Google을 연동 (기존 비밀번호는 유지)
    /// 3. 없으면 인증 완료 상태의 Google 계정 생성
    ///
    /// 두 콜백이 동시에 같은 신규 계정을 만들려고 하면 늦은 쪽은 유일성 위반을
    /// 받고, 한 번 더 조회해서 먼저 만들어진 계정을 사용합니다.
    pub async fn link_or_create_google_account(&self, profile: &GoogleProfile) -> AppResult<Account> {
        let email = normalize_email(&profile.email);
        let mut retried = false;

        loop {
            if let Some(linked) = self.store.find_by_google_id(&profile.provider_id).await? {
                let (account, _) = self
                    .mutate(&linked.id, account_not_found, |account| {
                        account.touch_login();
                        Ok(())
                    })
                    .await?;
                return Ok(account);
            }

            if let Some(existing) = self.store.find_by_email(&email).await? {
                let (account, _) = self
                    .mutate(&existing.id, account_not_found, |account| {
                        if account.google_id.as_deref().is_some_and(|id| id != profile.provider_id) {
                            return Err(AppError::ConflictError(
                                "이미 다른 Google 계정과 연결된 계정입니다".to_string(),
                            ));
                        }
                        account.link_google(profile.provider_id.clone(), profile.picture_url.clone());
                        Ok(())
                    })
                    .await?;
                log::info!("기존 계정에 Google 연동: {} ({})", account.id, account.email);
                return Ok(account);
            }

            let account = Account::new_google(
                profile.provider_id.clone(),
                profile.display_name.clone(),
                email.clone(),
                profile.picture_url.clone(),
            );

            match self.store.insert(&account).await {
                Ok(()) => {
                    log::info!("Google 계정 생성: {} ({})", account.id, account.email);
                    return Ok(account);
                }
                Err(AppError::EmailInUse | AppError::ConflictError(_)) if !retried => {
                    log::debug!("Google 계정 동시 생성 감지, 재조회: {}", email);
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Google 로그인: 계정 해석 후 세션 발급
    pub async fn sign_in_with_google(&self, profile: &GoogleProfile) -> AppResult<AuthSession> {
        let account = self.link_or_create_google_account(profile).await?;
        let session = self.start_session(&account.id).await?;
        log::info!("Google 로그인: {} ({})", session.account.id, session.account.email);
        Ok(session)
    }

    /// 리프레시 토큰 교체
    ///
    /// 제시된 토큰이 계정의 저장된 집합에 있어야 하며, 성공하면 집합 전체가
    /// 새 리프레시 토큰 하나로 바뀝니다. 다른 기기의 세션도 함께 끝납니다.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.tokens.verify_refresh(refresh_token).map_err(|e| {
            log::debug!("리프레시 토큰 거부: {}", e);
            AppError::Forbidden("유효하지 않거나 만료된 리프레시 토큰입니다".to_string())
        })?;

        let presented = TokenService::fingerprint(refresh_token);
        let tokens = self.tokens.issue_session_pair(&claims.sub)?;
        let replacement = TokenService::fingerprint(&tokens.refresh_token);

        self.mutate(
            &claims.sub,
            || AppError::Forbidden("계정을 찾을 수 없습니다".to_string()),
            |account| {
                if !account.has_refresh_token(&presented) {
                    return Err(AppError::Forbidden("폐기된 리프레시 토큰입니다".to_string()));
                }
                account.replace_refresh_tokens(replacement.clone());
                Ok(())
            },
        )
        .await?;

        log::debug!("토큰 갱신: {}", claims.sub);
        Ok(tokens)
    }

    /// 로그아웃
    ///
    /// 제시된 리프레시 토큰의 지문만 제거합니다. 토큰이 없거나 이미 제거된
    /// 경우에도 성공합니다. 발급된 액세스 토큰은 만료될 때까지 유효합니다.
    pub async fn logout(&self, account_id: &str, refresh_token: Option<&str>) -> AppResult<()> {
        let Some(token) = refresh_token else {
            return Ok(());
        };

        let fingerprint = TokenService::fingerprint(token);
        let current = self.load(account_id).await?;
        if !current.has_refresh_token(&fingerprint) {
            return Ok(());
        }

        self.mutate(account_id, account_not_found, |account| {
            account.revoke_refresh_token(&fingerprint);
            Ok(())
        })
        .await?;

        log::info!("로그아웃: {}", account_id);
        Ok(())
    }
}
