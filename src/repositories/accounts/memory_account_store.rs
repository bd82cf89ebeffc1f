//! 메모리 기반 계정 저장소
//!
//! 테스트와 로컬 실행용입니다. MongoDB 구현과 같은 유일성/버전 규칙을 지킵니다.

use std::collections::HashMap;
use std::sync::RwLock;
use async_trait::async_trait;
use mongodb::bson::DateTime;
use crate::domain::entities::Account;
use crate::errors::{AppError, AppResult};
use crate::repositories::accounts::AccountStore;

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>, // id -> account
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 계정 수
    pub fn len(&self) -> usize {
        self.read().map(|accounts| accounts.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, HashMap<String, Account>>> {
        self.accounts
            .read()
            .map_err(|_| AppError::InternalError("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, HashMap<String, Account>>> {
        self.accounts
            .write()
            .map_err(|_| AppError::InternalError("memory store lock poisoned".to_string()))
    }

    fn find_where<F>(&self, predicate: F) -> AppResult<Option<Account>>
    where
        F: Fn(&Account) -> bool,
    {
        Ok(self.read()?.values().find(|a| predicate(a)).cloned())
    }
}

/// 다른 계정과의 유일성 위반 검사
fn check_unique(accounts: &HashMap<String, Account>, candidate: &Account) -> AppResult<()> {
    for other in accounts.values().filter(|a| a.id != candidate.id) {
        if other.email == candidate.email {
            return Err(AppError::EmailInUse);
        }
        if candidate.google_id.is_some() && other.google_id == candidate.google_id {
            return Err(AppError::ConflictError(
                "이미 다른 계정에 연결된 Google 계정입니다".to_string(),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        self.find_where(|a| a.email == email)
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<Account>> {
        self.find_where(|a| a.google_id.as_deref() == Some(google_id))
    }

    async fn find_by_reset_token_hash(
        &self,
        token_hash: &str,
        now: DateTime,
    ) -> AppResult<Option<Account>> {
        self.find_where(|a| {
            a.password_reset_token.as_deref() == Some(token_hash)
                && a.password_reset_expires.is_some_and(|expires| expires > now)
        })
    }

    async fn insert(&self, account: &Account) -> AppResult<()> {
        let mut accounts = self.write()?;
        if accounts.contains_key(&account.id) {
            return Err(AppError::ConflictError(format!("duplicate account id {}", account.id)));
        }
        check_unique(&accounts, account)?;
        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> AppResult<Account> {
        let mut accounts = self.write()?;
        match accounts.get(&account.id) {
            Some(stored) if stored.version == account.version => {}
            _ => return Err(AppError::ConcurrentModification),
        }
        check_unique(&accounts, account)?;

        let mut next = account.clone();
        next.version = account.version + 1;
        accounts.insert(next.id.clone(), next.clone());
        Ok(next)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.write()?.remove(id).is_some())
    }
}
