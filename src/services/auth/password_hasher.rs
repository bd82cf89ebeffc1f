//! 비밀번호 해싱
//!
//! bcrypt는 의도적으로 느리므로 actix 워커 스레드가 아닌 블로킹 스레드 풀에서 실행합니다.

use actix_web::web;
use crate::config::PasswordConfig;
use crate::errors::{AppError, AppResult};

/// bcrypt 기반 자격 증명 해셔
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// 환경별 bcrypt cost 사용 (`PasswordConfig::bcrypt_cost`)
    pub fn from_env() -> Self {
        Self::new(PasswordConfig::bcrypt_cost())
    }

    pub async fn hash(&self, plaintext: &str) -> AppResult<String> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        let hash_start = std::time::Instant::now();
        let hashed = web::block(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| AppError::InternalError(format!("해싱 작업 실행 실패: {}", e)))?
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;

        log::debug!("Password hashing took: {:?}", hash_start.elapsed());
        Ok(hashed)
    }

    /// 저장된 해시와 비교
    ///
    /// 해시가 없으면 (Google 가입 계정) 항상 false입니다.
    pub async fn verify(&self, plaintext: &str, hash: Option<&str>) -> AppResult<bool> {
        let Some(hash) = hash else {
            return Ok(false);
        };
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();

        let verify_start = std::time::Instant::now();
        let is_valid = web::block(move || bcrypt::verify(plaintext, &hash))
            .await
            .map_err(|e| AppError::InternalError(format!("검증 작업 실행 실패: {}", e)))?
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;

        log::debug!("Password verification took: {:?}", verify_start.elapsed());
        Ok(is_valid)
    }
}
