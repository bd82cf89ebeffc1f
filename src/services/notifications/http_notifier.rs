//! 메일 발송 API로 알림을 보내는 구현
//!
//! `MAIL_API_URL`에 JSON을 POST 합니다. 템플릿은 메일 서비스가 `kind`로 고릅니다.
//!
//! ```json
//! { "kind": "verification", "from": "no-reply@example.com", "to": "ann@x.com", "name": "Ann", "link": "https://..." }
//! ```

use async_trait::async_trait;
use serde::Serialize;
use crate::config::MailConfig;
use crate::domain::entities::Account;
use crate::errors::{AppError, AppResult};
use crate::services::notifications::{NotificationKind, Notifier};

#[derive(Serialize)]
struct MailRequest<'a> {
    kind: NotificationKind,
    from: &'a str,
    to: &'a str,
    name: &'a str,
    link: &'a str,
}

pub struct HttpNotifier {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    from_address: String,
}

impl HttpNotifier {
    pub fn new(api_url: String, api_key: Option<String>, from_address: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
            from_address,
        }
    }

    /// `MAIL_API_URL`이 없으면 None
    pub fn from_env() -> Option<Self> {
        MailConfig::api_url()
            .map(|url| Self::new(url, MailConfig::api_key(), MailConfig::from_address()))
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, kind: NotificationKind, account: &Account, link: &str) -> AppResult<()> {
        let body = MailRequest {
            kind,
            from: &self.from_address,
            to: &account.email,
            name: &account.name,
            link,
        };

        let mut request = self.http.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("메일 발송 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "메일 발송 실패 ({}): {}", status, error_text
            )));
        }

        log::info!("{} 메일 발송 완료: 계정 {}", kind.as_str(), account.id);
        Ok(())
    }
}
