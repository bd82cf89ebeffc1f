use crate::domain::entities::Account;
use crate::domain::models::TokenPair;

/// 토큰을 발급한 계정 작업의 결과
///
/// `account`는 리프레시 토큰 지문이 저장된 이후의 상태입니다.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub account: Account,
    pub tokens: TokenPair,
}
