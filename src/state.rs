//! 요청 핸들러가 공유하는 애플리케이션 상태
//!
//! `main`에서 한 번 조립해 `web::Data<AppState>`로 등록합니다.
//! 핸들러와 인증 미들웨어는 여기서 서비스를 꺼내 쓰며, 전역 싱글톤은 없습니다.

use std::sync::Arc;
use crate::config::ServerConfig;
use crate::repositories::accounts::AccountStore;
use crate::services::accounts::AccountService;
use crate::services::auth::{CredentialHasher, GoogleAuthService, SessionGuard, TokenService};
use crate::services::notifications::{NotificationLinks, Notifier};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub session_guard: Arc<SessionGuard>,
    pub google: Arc<GoogleAuthService>,
    pub links: NotificationLinks,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        tokens: Arc<TokenService>,
        hasher: CredentialHasher,
        google: GoogleAuthService,
        links: NotificationLinks,
    ) -> Self {
        let accounts = AccountService::new(
            store.clone(),
            hasher,
            tokens.clone(),
            notifier,
            links.clone(),
        );

        Self {
            accounts: Arc::new(accounts),
            session_guard: Arc::new(SessionGuard::new(store, tokens)),
            google: Arc::new(google),
            links,
        }
    }

    /// 환경 변수 설정으로 조립 (저장소와 발송기는 호출하는 쪽에서 선택)
    pub fn from_env(store: Arc<dyn AccountStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(
            store,
            notifier,
            Arc::new(TokenService::from_env()),
            CredentialHasher::from_env(),
            GoogleAuthService::from_env(),
            NotificationLinks::new(ServerConfig::frontend_url()),
        )
    }
}
