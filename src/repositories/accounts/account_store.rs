//! 계정 저장소 추상화
//!
//! 계정 상태 머신은 이 trait만 알고 있습니다. 운영 환경은 MongoDB 구현을,
//! 테스트는 메모리 구현을 사용합니다.

use async_trait::async_trait;
use mongodb::bson::DateTime;
use crate::domain::entities::Account;
use crate::errors::AppResult;

/// 계정 영속성 경계
///
/// 구현체는 다음을 보장해야 합니다.
///
/// - 정규화된 `email`은 전체 계정에서 유일하며, 위반 시 `AppError::EmailInUse`
/// - `google_id`는 값이 있을 때만 유일 (sparse), 위반 시 `AppError::ConflictError`
/// - `update`는 읽었던 `version`과 저장된 `version`이 같을 때만 반영되며,
///   다르거나 문서가 사라졌으면 `AppError::ConcurrentModification`
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>>;

    /// `email`은 이미 정규화된 값이어야 합니다.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<Account>>;

    /// 재설정 토큰 해시가 일치하고 만료 시각이 `now` 이후인 계정
    async fn find_by_reset_token_hash(
        &self,
        token_hash: &str,
        now: DateTime,
    ) -> AppResult<Option<Account>>;

    async fn insert(&self, account: &Account) -> AppResult<()>;

    /// 조건부 갱신. 성공하면 `version`이 1 증가한 계정을 반환합니다.
    async fn update(&self, account: &Account) -> AppResult<Account>;

    /// 하드 삭제. 삭제된 문서가 있으면 true
    async fn delete(&self, id: &str) -> AppResult<bool>;
}
