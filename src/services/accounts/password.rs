//! 비밀번호 찾기, 재설정, 변경
//!
//! 재설정 링크의 토큰은 `password_reset` 용도의 이메일 액션 JWT입니다.
//! 계정에는 원문 대신 HMAC keyed hash와 만료 시각만 저장되며, 재설정이
//! 끝나거나 새 요청이 들어오면 이전 토큰은 더 이상 쓸 수 없습니다.

use mongodb::bson::DateTime;
use crate::domain::models::EmailActionPurpose;
use crate::errors::{AppError, AppResult};
use crate::services::notifications::NotificationKind;
use crate::utils::string_utils::{normalize_email, validate_password_policy};
use super::account_service::{account_not_found, AccountService};

impl AccountService {
    /// 비밀번호 재설정 메일 요청
    ///
    /// 해당 이메일의 계정이 없어도 성공으로 응답합니다.
    /// 비밀번호가 없는 Google 계정은 `PasswordResetUnavailable`.
    /// 메일 발송에 실패하면 저장한 재설정 정보를 지우고 에러를 반환합니다.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        let Some(account) = self.store.find_by_email(&email).await? else {
            log::debug!("비밀번호 재설정 요청: 등록되지 않은 이메일");
            return Ok(());
        };

        if !account.can_authenticate_with_password() {
            return Err(AppError::PasswordResetUnavailable);
        }

        let ttl = self.tokens.lifetimes().password_reset;
        let raw_token = self.tokens.issue_email_action_token(
            &account.id,
            &account.email,
            EmailActionPurpose::PasswordReset,
            ttl,
        )?;
        let token_hash = self.tokens.hash_reset_token(&raw_token)?;
        let expires_at = DateTime::from_millis(DateTime::now().timestamp_millis() + ttl.num_milliseconds());

        let (account, _) = self
            .mutate(&account.id, account_not_found, |account| {
                account.set_password_reset(token_hash.clone(), expires_at);
                Ok(())
            })
            .await?;

        let link = self.links.reset_password(&raw_token);
        if let Err(e) = self.notifier.send(NotificationKind::PasswordReset, &account, &link).await {
            log::error!("비밀번호 재설정 메일 발송 실패 {}: {}", account.email, e);
            let cleared = self
                .mutate(&account.id, account_not_found, |account| {
                    // 그 사이 들어온 새 요청의 토큰은 건드리지 않음
                    if account.password_reset_token.as_deref() == Some(token_hash.as_str()) {
                        account.clear_password_reset();
                    }
                    Ok(())
                })
                .await;
            if let Err(clear) = cleared {
                log::warn!("재설정 정보 정리 실패 {}: {}", account.id, clear);
            }
            return Err(e);
        }

        log::info!("비밀번호 재설정 메일 발송: {}", account.email);
        Ok(())
    }

    /// 재설정 토큰으로 새 비밀번호 설정
    ///
    /// 토큰은 서명/용도/만료, 저장된 hash, 저장된 만료 시각을 모두 통과해야 합니다.
    /// 하나라도 어긋나면 `InvalidOrExpiredToken`.
    pub async fn reset_password(&self, raw_token: &str, new_password: &str) -> AppResult<()> {
        let claims = self
            .tokens
            .verify_email_action_token(raw_token, EmailActionPurpose::PasswordReset)
            .map_err(|e| {
                log::debug!("비밀번호 재설정 토큰 거부: {}", e);
                AppError::InvalidOrExpiredToken
            })?;

        let token_hash = self.tokens.hash_reset_token(raw_token)?;
        let account = self
            .store
            .find_by_reset_token_hash(&token_hash, DateTime::now())
            .await?
            .filter(|account| account.id == claims.sub)
            .ok_or(AppError::InvalidOrExpiredToken)?;

        validate_password_policy(new_password, self.password_min_length)?;
        let password_hash = self.hasher.hash(new_password).await?;

        self.mutate(&account.id, || AppError::InvalidOrExpiredToken, |account| {
            // 동시에 들어온 다른 재설정이 먼저 토큰을 소비했으면 거부
            if account.password_reset_token.as_deref() != Some(token_hash.as_str()) {
                return Err(AppError::InvalidOrExpiredToken);
            }
            account.set_password_hash(password_hash.clone());
            account.clear_password_reset();
            Ok(())
        })
        .await?;

        log::info!("비밀번호 재설정 완료: {}", account.id);
        Ok(())
    }

    /// 로그인 상태에서 비밀번호 변경
    pub async fn change_password(
        &self,
        account_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let account = self.load(account_id).await?;
        let Some(current_hash) = account.password_hash.clone() else {
            return Err(AppError::GoogleAccountNoPassword);
        };

        if !self.hasher.verify(current_password, Some(&current_hash)).await? {
            log::warn!("비밀번호 변경 실패 (현재 비밀번호 불일치): {}", account.id);
            return Err(AppError::IncorrectPassword);
        }
        if self.hasher.verify(new_password, Some(&current_hash)).await? {
            return Err(AppError::SamePassword);
        }
        validate_password_policy(new_password, self.password_min_length)?;

        let password_hash = self.hasher.hash(new_password).await?;
        self.mutate(account_id, account_not_found, |account| {
            // 확인한 비밀번호가 그 사이 바뀌었으면 다시 확인 받아야 함
            if account.password_hash.as_deref() != Some(current_hash.as_str()) {
                return Err(AppError::ConcurrentModification);
            }
            account.set_password_hash(password_hash.clone());
            Ok(())
        })
        .await?;

        log::info!("비밀번호 변경: {}", account.id);
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

    const NEW_PASSWORD: &str = "battery-staple-2";

    #[actix_web::test]
    async fn test_forgot_password_unknown_email_is_silent() {
        let fx = fixture();

        fx.service.forgot_password("nobody@x.com").await.unwrap();

        assert!(fx.notifier.sent().is_empty());
    }

    #[actix_web::test]
    async fn test_forgot_password_stores_hash_not_token() {
        let fx = fixture();
        let account = fx.verified_account("ann@x.com").await;

        fx.service.forgot_password("ANN@x.com").await.unwrap();

        let token = fx.notifier.last_token(NotificationKind::PasswordReset).unwrap();
        let stored = fx.reload(&account.id).await;
        let stored_hash = stored.password_reset_token.clone().unwrap();
        assert_ne!(stored_hash, token);
        assert_eq!(stored_hash, fx.tokens.hash_reset_token(&token).unwrap());

        let expires = stored.password_reset_expires.unwrap().timestamp_millis();
        let remaining = expires - DateTime::now().timestamp_millis();
        assert!(remaining > 9 * 60 * 1000 && remaining <= 10 * 60 * 1000);

        let claims = fx
            .tokens
            .verify_email_action_token(&token, EmailActionPurpose::PasswordReset)
            .unwrap();
        assert_eq!(claims.sub, account.id);
    }

    #[actix_web::test]
    async fn test_forgot_password_google_account() {
        let fx = fixture();
        fx.google_account("g-1", "gia@x.com").await;

        assert!(matches!(
            fx.service.forgot_password("gia@x.com").await,
            Err(AppError::PasswordResetUnavailable)
        ));
    }

    #[actix_web::test]
    async fn test_forgot_password_mail_failure_clears_reset() {
        let fx = fixture();
        let account = fx.verified_account("ann@x.com").await;
        fx.notifier.set_failing(true);

        let result = fx.service.forgot_password("ann@x.com").await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
        let stored = fx.reload(&account.id).await;
        assert!(stored.password_reset_token.is_none());
        assert!(stored.password_reset_expires.is_none());
    }

    #[actix_web::test]
    async fn test_reset_password_flow() {
        let fx = fixture();
        let account = fx.verified_account("ann@x.com").await;
        fx.service.forgot_password("ann@x.com").await.unwrap();
        let token = fx.notifier.last_token(NotificationKind::PasswordReset).unwrap();

        fx.service.reset_password(&token, NEW_PASSWORD).await.unwrap();

        let stored = fx.reload(&account.id).await;
        assert!(stored.password_reset_token.is_none());
        assert!(stored.password_reset_expires.is_none());
        assert!(matches!(
            fx.service.login("ann@x.com", PASSWORD).await,
            Err(AppError::InvalidCredentials)
        ));
        fx.service.login("ann@x.com", NEW_PASSWORD).await.unwrap();

        // 한 번 쓴 토큰은 다시 쓸 수 없음
        assert!(matches!(
            fx.service.reset_password(&token, "third-password-3").await,
            Err(AppError::InvalidOrExpiredToken)
        ));
    }

    #[actix_web::test]
    async fn test_reset_password_newer_request_invalidates_older() {
        let fx = fixture();
        fx.verified_account("ann@x.com").await;
        fx.service.forgot_password("ann@x.com").await.unwrap();
        let older = fx.notifier.last_token(NotificationKind::PasswordReset).unwrap();
        fx.service.forgot_password("ann@x.com").await.unwrap();
        let newer = fx.notifier.last_token(NotificationKind::PasswordReset).unwrap();

        assert!(matches!(
            fx.service.reset_password(&older, NEW_PASSWORD).await,
            Err(AppError::InvalidOrExpiredToken)
        ));
        fx.service.reset_password(&newer, NEW_PASSWORD).await.unwrap();
    }

    #[actix_web::test]
    async fn test_reset_password_expired_in_store() {
        let fx = fixture();
        let account = fx.verified_account("ann@x.com").await;
        fx.service.forgot_password("ann@x.com").await.unwrap();
        let token = fx.notifier.last_token(NotificationKind::PasswordReset).unwrap();

        let mut stored = fx.reload(&account.id).await;
        stored.password_reset_expires = Some(DateTime::from_millis(DateTime::now().timestamp_millis() - 1));
        fx.store.update(&stored).await.unwrap();

        assert!(matches!(
            fx.service.reset_password(&token, NEW_PASSWORD).await,
            Err(AppError::InvalidOrExpiredToken)
        ));
    }

    #[actix_web::test]
    async fn test_reset_password_rejects_other_tokens() {
        let fx = fixture();
        let account = fx.verified_account("ann@x.com").await;
        fx.service.forgot_password("ann@x.com").await.unwrap();

        assert!(matches!(
            fx.service.reset_password("garbage", NEW_PASSWORD).await,
            Err(AppError::InvalidOrExpiredToken)
        ));

        // 서명은 유효하지만 발송되지 않은 토큰
        let forged = fx
            .tokens
            .issue_email_action_token(
                &account.id,
                &account.email,
                EmailActionPurpose::PasswordReset,
                chrono::Duration::minutes(10),
            )
            .unwrap();
        assert!(matches!(
            fx.service.reset_password(&forged, NEW_PASSWORD).await,
            Err(AppError::InvalidOrExpiredToken)
        ));
    }

    #[actix_web::test]
    async fn test_reset_password_checks_policy() {
        let fx = fixture();
        fx.verified_account("ann@x.com").await;
        fx.service.forgot_password("ann@x.com").await.unwrap();
        let token = fx.notifier.last_token(NotificationKind::PasswordReset).unwrap();

        assert!(matches!(
            fx.service.reset_password(&token, "short").await,
            Err(AppError::ValidationError(_))
        ));
        // 정책 위반은 토큰을 소비하지 않음
        fx.service.reset_password(&token, NEW_PASSWORD).await.unwrap();
    }

    #[actix_web::test]
    async fn test_change_password() {
        let fx = fixture();
        let account = fx.verified_account("ann@x.com").await;

        fx.service.change_password(&account.id, PASSWORD, NEW_PASSWORD).await.unwrap();

        fx.service.login("ann@x.com", NEW_PASSWORD).await.unwrap();
    }

    #[actix_web::test]
    async fn test_change_password_outcomes() {
        let fx = fixture();
        let account = fx.verified_account("ann@x.com").await;
        let google = fx.google_account("g-1", "gia@x.com").await;

        assert!(matches!(
            fx.service.change_password(&google.id, PASSWORD, NEW_PASSWORD).await,
            Err(AppError::GoogleAccountNoPassword)
        ));
        assert!(matches!(
            fx.service.change_password(&account.id, "wrong-password", NEW_PASSWORD).await,
            Err(AppError::IncorrectPassword)
        ));
        assert!(matches!(
            fx.service.change_password(&account.id, PASSWORD, PASSWORD).await,
            Err(AppError::SamePassword)
        ));
        assert!(matches!(
            fx.service.change_password(&account.id, PASSWORD, "short").await,
            Err(AppError::ValidationError(_))
        ));
    }
}
