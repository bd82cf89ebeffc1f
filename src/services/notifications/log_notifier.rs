//! 개발용 알림 구현
//!
//! 메일을 보내지 않고 링크를 로그로 남깁니다. 프로덕션에서는 사용하지 않습니다.

use async_trait::async_trait;
use crate::domain::entities::Account;
use crate::errors::AppResult;
use crate::services::notifications::{NotificationKind, Notifier};

#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, kind: NotificationKind, account: &Account, link: &str) -> AppResult<()> {
        log::info!("📧 [{}] to={} link={}", kind.as_str(), account.email, link);
        Ok(())
    }
}
