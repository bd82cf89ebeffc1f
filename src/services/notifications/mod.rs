//! 알림 발송 모듈
//!
//! - [`Notifier`] - 계정 서비스가 의존하는 발송 trait
//! - [`HttpNotifier`] - 메일 발송 API 구현
//! - [`LogNotifier`] - 개발용 (로그 출력)
//! - [`NotificationLinks`] - 메일에 넣을 프런트엔드 링크

pub mod notifier;
pub mod http_notifier;
pub mod log_notifier;

pub use notifier::{NotificationKind, NotificationLinks, Notifier};
pub use http_notifier::HttpNotifier;
pub use log_notifier::LogNotifier;

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use async_trait::async_trait;
    use crate::domain::entities::Account;
    use crate::errors::{AppError, AppResult};
    use super::{NotificationKind, Notifier};

    /// 보낸 알림을 기록하고, 필요하면 실패를 흉내내는 테스트용 구현
    #[derive(Default)]
    pub struct RecordingNotifier {
        sent: Mutex<Vec<(NotificationKind, String, String)>>,
        failing: AtomicBool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// (종류, 수신 이메일, 링크)
        pub fn sent(&self) -> Vec<(NotificationKind, String, String)> {
            self.sent.lock().unwrap().clone()
        }

        /// 마지막으로 보낸 해당 종류 링크의 `token` 쿼리 값
        pub fn last_token(&self, kind: NotificationKind) -> Option<String> {
            self.sent()
                .into_iter()
                .rev()
                .find(|(k, _, _)| *k == kind)
                .and_then(|(_, _, link)| link.split("token=").nth(1).map(|t| {
                    urlencoding::decode(t).map(|s| s.into_owned()).unwrap_or_default()
                }))
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, kind: NotificationKind, account: &Account, link: &str) -> AppResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::ExternalServiceError("mail service unavailable".to_string()));
            }
            self.sent.lock().unwrap().push((kind, account.email.clone(), link.to_string()));
            Ok(())
        }
    }
}
