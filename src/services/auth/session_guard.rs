//! 보호된 요청의 Bearer 토큰을 계정으로 해석하는 Session Guard

use std::sync::Arc;
use crate::domain::entities::Account;
use crate::errors::{AppError, AppResult};
use crate::repositories::accounts::AccountStore;
use crate::services::auth::{TokenError, TokenService};

pub struct SessionGuard {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn AccountStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    /// `Authorization` 헤더 값을 검증하고 계정을 조회합니다.
    ///
    /// 요청마다 저장소에서 다시 읽으며 결과를 캐시하지 않습니다.
    pub async fn authenticate(&self, auth_header: Option<&str>) -> AppResult<Account> {
        let header = auth_header
            .ok_or_else(|| AppError::Unauthorized("Authorization 헤더가 없습니다".to_string()))?;
        let token = TokenService::extract_bearer_token(header)?;

        let claims = self.tokens.verify_access(token).map_err(|e| match e {
            TokenError::Expired => AppError::Unauthorized("액세스 토큰이 만료되었습니다".to_string()),
            _ => AppError::Unauthorized("유효하지 않은 액세스 토큰입니다".to_string()),
        })?;

        self.store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                log::warn!("토큰의 계정이 존재하지 않음: {}", claims.sub);
                AppError::Unauthorized("계정을 찾을 수 없습니다".to_string())
            })
    }
}
