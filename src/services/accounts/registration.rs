//! 가입, 이메일 인증, 인증 메일 재발송

use crate::domain::dto::RegisterRequest;
use crate::domain::entities::Account;
use crate::domain::models::{AuthSession, EmailActionPurpose};
use crate::errors::{AppError, AppResult};
use crate::services::auth::TokenService;
use crate::services::notifications::NotificationKind;
use crate::utils::string_utils::{
    normalize_email, validate_email, validate_password_policy, validate_required_string,
};
use super::account_service::{account_not_found, AccountService, VERIFICATION_RESEND_COOLDOWN_SECS};

impl AccountService {
    /// 로컬 계정 가입
    ///
    /// 같은 이메일의 **미인증** 계정이 있으면 새 이름/비밀번호로 덮어쓰고
    /// 인증 메일을 다시 보냅니다. 인증된 계정이 있으면 `EmailInUse`.
    ///
    /// 인증 메일 발송에 실패하면 계정을 삭제하고 발송 에러를 반환합니다.
    /// 링크를 받을 수 없는 미인증 계정은 남겨두지 않습니다.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<Account> {
        let name = validate_required_string(&request.name, "이름")?;
        let email = validate_email(&request.email)?;
        validate_password_policy(&request.password, self.password_min_length)?;

        let existing = self.store.find_by_email(&email).await?;
        if existing.as_ref().is_some_and(|a| a.email_verified) {
            return Err(AppError::EmailInUse);
        }

        let password_hash = self.hasher.hash(&request.password).await?;

        let account = match existing {
            Some(unverified) => self.recycle_unverified(&unverified.id, &name, &password_hash).await?,
            None => {
                let mut account = Account::new_local(name.clone(), email.clone(), password_hash.clone());
                account.record_verification_sent();
                match self.store.insert(&account).await {
                    Ok(()) => {
                        log::info!("계정 생성: {} ({})", account.id, account.email);
                        account
                    }
                    Err(AppError::EmailInUse) => {
                        // 같은 이메일의 동시 가입: 먼저 생성된 미인증 계정을 재사용
                        log::debug!("동시 가입 감지, 재조회: {}", email);
                        let winner = self
                            .store
                            .find_by_email(&email)
                            .await?
                            .ok_or(AppError::EmailInUse)?;
                        self.recycle_unverified(&winner.id, &name, &password_hash).await?
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        if let Err(e) = self.send_verification(&account).await {
            log::error!("인증 메일 발송 실패, 계정 롤백 {}: {}", account.email, e);
            if let Err(rollback) = self.store.delete(&account.id).await {
                log::error!("계정 롤백 실패 {}: {}", account.id, rollback);
            }
            return Err(e);
        }

        Ok(account)
    }

    /// 미인증 계정에 새 이름/비밀번호를 덮어씀. 그 사이 인증되었으면 `EmailInUse`
    async fn recycle_unverified(
        &self,
        account_id: &str,
        name: &str,
        password_hash: &str,
    ) -> AppResult<Account> {
        let (account, _) = self
            .mutate(account_id, account_not_found, |account| {
                if account.email_verified {
                    return Err(AppError::EmailInUse);
                }
                account.name = name.to_string();
                account.set_password_hash(password_hash.to_string());
                account.record_verification_sent();
                Ok(())
            })
            .await?;
        log::info!("미인증 계정 재가입: {} ({})", account.id, account.email);
        Ok(account)
    }

    /// 이메일 인증 토큰 처리
    ///
    /// 성공하면 계정을 인증 상태로 바꾸고 바로 로그인 세션을 발급합니다.
    /// 환영 메일은 실패해도 결과에 영향을 주지 않습니다.
    pub async fn verify_email(&self, token: &str) -> AppResult<AuthSession> {
        let claims = self
            .tokens
            .verify_email_action_token(token, EmailActionPurpose::EmailVerification)
            .map_err(|e| {
                log::debug!("이메일 인증 토큰 거부: {}", e);
                AppError::InvalidOrExpiredToken
            })?;

        let tokens = self.tokens.issue_session_pair(&claims.sub)?;
        let fingerprint = TokenService::fingerprint(&tokens.refresh_token);

        let (account, _) = self
            .mutate(&claims.sub, account_not_found, |account| {
                if account.email != claims.email {
                    return Err(AppError::TokenEmailMismatch);
                }
                if account.email_verified {
                    return Err(AppError::AlreadyVerified);
                }
                account.mark_email_verified();
                account.record_login(fingerprint.clone());
                Ok(())
            })
            .await?;

        log::info!("이메일 인증 완료: {} ({})", account.id, account.email);

        if let Err(e) = self
            .notifier
            .send(NotificationKind::Welcome, &account, &self.links.dashboard())
            .await
        {
            log::warn!("환영 메일 발송 실패 {}: {}", account.email, e);
        }

        Ok(AuthSession { account, tokens })
    }

    /// 인증 메일 재발송
    ///
    /// 마지막 발송 후 60초 안에는 `VerificationThrottled`를 반환합니다.
    /// 발송에 실패하면 발송 기록을 되돌려 바로 다시 요청할 수 있게 합니다.
    pub async fn resend_verification(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        let existing = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("해당 이메일의 계정을 찾을 수 없습니다".to_string()))?;

        let (account, _) = self
            .mutate(&existing.id, account_not_found, |account| {
                if account.email_verified {
                    return Err(AppError::AlreadyVerified);
                }
                let remaining = account.verification_cooldown_remaining(VERIFICATION_RESEND_COOLDOWN_SECS);
                if remaining > 0 {
                    return Err(AppError::VerificationThrottled { retry_after_secs: remaining });
                }
                account.record_verification_sent();
                Ok(())
            })
            .await?;

        if let Err(e) = self.send_verification(&account).await {
            log::error!("인증 메일 재발송 실패 {}: {}", account.email, e);
            let reverted = self
                .mutate(&account.id, account_not_found, |account| {
                    account.clear_verification_sent();
                    Ok(())
                })
                .await;
            if let Err(revert) = reverted {
                log::warn!("발송 기록 복구 실패 {}: {}", account.id, revert);
            }
            return Err(e);
        }

        log::info!("인증 메일 재발송: {}", account.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::DateTime;
    use crate::domain::models::EmailActionPurpose;
    use crate::errors::AppError;
    use crate::repositories::accounts::AccountStore;
    use crate::services::notifications::NotificationKind;
    use super::super::account_service::test_support::*;

    #[actix_web::test]
    async fn test_register_creates_unverified_account_and_sends_link() {
        let fx = fixture();

        let account = fx.service.register(register_request(" Ann ", " ANN@X.com ")).await.unwrap();

        assert_eq!(account.name, "Ann");
        assert_eq!(account.email, "ann@x.com");
        assert!(!account.email_verified);
        assert!(account.refresh_tokens.is_empty());
        assert_ne!(account.password_hash.as_deref(), Some(PASSWORD));

        let sent = fx.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, NotificationKind::Verification);
        assert!(sent[0].2.starts_with("http://localhost:3000/verify-email?token="));

        let token = fx.notifier.last_token(NotificationKind::Verification).unwrap();
        let claims = fx
            .tokens
            .verify_email_action_token(&token, EmailActionPurpose::EmailVerification)
            .unwrap();
        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.email, "ann@x.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[actix_web::test]
    async fn test_register_validation() {
        let fx = fixture();

        let mut short = register_request("Ann", "ann@x.com");
        short.password = "short".into();
        assert!(matches!(fx.service.register(short).await, Err(AppError::ValidationError(_))));
        assert!(matches!(
            fx.service.register(register_request("  ", "ann@x.com")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            fx.service.register(register_request("Ann", "ann.x.com")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(fx.store.is_empty());
    }

    #[actix_web::test]
    async fn test_register_verified_email_is_in_use() {
        let fx = fixture();
        fx.verified_account("ann@x.com").await;

        let result = fx.service.register(register_request("Other", "Ann@x.com")).await;

        assert!(matches!(result, Err(AppError::EmailInUse)));
        assert_eq!(fx.store.len(), 1);
    }

    #[actix_web::test]
    async fn test_register_recycles_unverified_account() {
        let fx = fixture();
        let first = fx.service.register(register_request("Ann", "ann@x.com")).await.unwrap();

        let mut again = register_request("Ann Lee", "ann@x.com");
        again.password = "another-pass-2".into();
        let second = fx.service.register(again).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Ann Lee");
        assert_ne!(second.password_hash, first.password_hash);
        assert_eq!(fx.store.len(), 1);
        assert_eq!(fx.notifier.sent().len(), 2);
    }

    #[actix_web::test]
    async fn test_concurrent_register_same_email_both_succeed() {
        let fx = fixture();

        let (a, b) = futures_util::join!(
            fx.service.register(register_request("Ann", "ann@x.com")),
            fx.service.register(register_request("Ann Lee", "ann@x.com")),
        );

        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.id, b.id);
        assert_eq!(fx.store.len(), 1);
        assert!(!fx.reload(&a.id).await.email_verified);
    }

    #[actix_web::test]
    async fn test_register_rolls_back_when_mail_fails() {
        let fx = fixture();
        fx.notifier.set_failing(true);

        let result = fx.service.register(register_request("Ann", "ann@x.com")).await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
        assert!(fx.store.find_by_email("ann@x.com").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_verify_email_issues_session() {
        let fx = fixture();
        fx.service.register(register_request("Ann", "ann@x.com")).await.unwrap();
        let token = fx.notifier.last_token(NotificationKind::Verification).unwrap();

        let session = fx.service.verify_email(&token).await.unwrap();

        assert!(session.account.email_verified);
        assert!(session.account.email_verified_at.is_some());
        assert!(session.account.last_login_at.is_some());
        assert_eq!(session.account.refresh_tokens.len(), 1);
        assert!(session.account.has_refresh_token(&crate::services::auth::TokenService::fingerprint(
            &session.tokens.refresh_token
        )));

        let (kind, _, link) = fx.notifier.sent().last().cloned().unwrap();
        assert_eq!(kind, NotificationKind::Welcome);
        assert_eq!(link, "http://localhost:3000/dashboard");
    }

    #[actix_web::test]
    async fn test_verify_email_twice_is_already_verified() {
        let fx = fixture();
        fx.service.register(register_request("Ann", "ann@x.com")).await.unwrap();
        let token = fx.notifier.last_token(NotificationKind::Verification).unwrap();

        fx.service.verify_email(&token).await.unwrap();

        assert!(matches!(fx.service.verify_email(&token).await, Err(AppError::AlreadyVerified)));
    }

    #[actix_web::test]
    async fn test_verify_email_after_email_change_is_mismatch() {
        let fx = fixture();
        let account = fx.service.register(register_request("Ann", "ann@x.com")).await.unwrap();
        let stale = fx.notifier.last_token(NotificationKind::Verification).unwrap();

        let mut changed = fx.reload(&account.id).await;
        changed.email = "moved@x.com".into();
        fx.store.update(&changed).await.unwrap();

        assert!(matches!(fx.service.verify_email(&stale).await, Err(AppError::TokenEmailMismatch)));
    }

    #[actix_web::test]
    async fn test_verify_email_rejects_bad_tokens() {
        let fx = fixture();
        let account = fx.service.register(register_request("Ann", "ann@x.com")).await.unwrap();

        assert!(matches!(
            fx.service.verify_email("not-a-token").await,
            Err(AppError::InvalidOrExpiredToken)
        ));

        let reset_purpose = fx
            .tokens
            .issue_email_action_token(
                &account.id,
                &account.email,
                EmailActionPurpose::PasswordReset,
                chrono::Duration::minutes(10),
            )
            .unwrap();
        assert!(matches!(
            fx.service.verify_email(&reset_purpose).await,
            Err(AppError::InvalidOrExpiredToken)
        ));

        let expired = fx
            .tokens
            .issue_email_action_token(
                &account.id,
                &account.email,
                EmailActionPurpose::EmailVerification,
                chrono::Duration::seconds(-5),
            )
            .unwrap();
        assert!(matches!(
            fx.service.verify_email(&expired).await,
            Err(AppError::InvalidOrExpiredToken)
        ));
    }

    #[actix_web::test]
    async fn test_verify_email_for_deleted_account() {
        let fx = fixture();
        let account = fx.service.register(register_request("Ann", "ann@x.com")).await.unwrap();
        let token = fx.notifier.last_token(NotificationKind::Verification).unwrap();
        fx.store.delete(&account.id).await.unwrap();

        assert!(matches!(fx.service.verify_email(&token).await, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_verify_email_survives_welcome_failure() {
        let fx = fixture();
        fx.service.register(register_request("Ann", "ann@x.com")).await.unwrap();
        let token = fx.notifier.last_token(NotificationKind::Verification).unwrap();
        fx.notifier.set_failing(true);

        let session = fx.service.verify_email(&token).await.unwrap();

        assert!(session.account.email_verified);
    }

    #[actix_web::test]
    async fn test_resend_verification_is_throttled() {
        let fx = fixture();
        fx.service.register(register_request("Ann", "ann@x.com")).await.unwrap();

        match fx.service.resend_verification("ann@x.com").await {
            Err(AppError::VerificationThrottled { retry_after_secs }) => {
                assert!(retry_after_secs > 0 && retry_after_secs <= 60);
            }
            other => panic!("expected throttle, got {:?}", other),
        }
        assert_eq!(fx.notifier.sent().len(), 1);
    }

    #[actix_web::test]
    async fn test_resend_verification_after_cooldown() {
        let fx = fixture();
        let account = fx.service.register(register_request("Ann", "ann@x.com")).await.unwrap();

        let mut stored = fx.reload(&account.id).await;
        stored.verification_sent_at =
            Some(DateTime::from_millis(DateTime::now().timestamp_millis() - 61_000));
        fx.store.update(&stored).await.unwrap();

        fx.service.resend_verification("ANN@x.com").await.unwrap();

        assert_eq!(fx.notifier.sent().len(), 2);
        let remaining = fx.reload(&account.id).await.verification_cooldown_remaining(60);
        assert!(remaining > 0);
    }

    #[actix_web::test]
    async fn test_resend_verification_failure_clears_throttle() {
        let fx = fixture();
        let account = fx.service.register(register_request("Ann", "ann@x.com")).await.unwrap();
        let mut stored = fx.reload(&account.id).await;
        stored.verification_sent_at = None;
        fx.store.update(&stored).await.unwrap();
        fx.notifier.set_failing(true);

        let result = fx.service.resend_verification("ann@x.com").await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
        assert!(fx.reload(&account.id).await.verification_sent_at.is_none());
    }

    #[actix_web::test]
    async fn test_resend_verification_outcomes() {
        let fx = fixture();
        fx.verified_account("ann@x.com").await;

        assert!(matches!(
            fx.service.resend_verification("nobody@x.com").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.resend_verification("ann@x.com").await,
            Err(AppError::AlreadyVerified)
        ));
    }
}
