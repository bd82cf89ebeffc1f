//! # 계정 리포지토리 MongoDB 구현
//!
//! `accounts` 컬렉션에 계정 문서를 저장합니다.
//!
//! ## 인덱스
//!
//! | 이름 | 키 | 옵션 |
//! |------|----|------|
//! | `email_unique` | `email` | unique |
//! | `google_id_unique` | `google_id` | unique, sparse |
//! | `password_reset_token` | `password_reset_token` | sparse |
//!
//! `google_id`가 없는 계정은 필드 자체를 저장하지 않으므로 sparse 인덱스에서 빠집니다.
//!
//! ## 동시성
//!
//! 갱신은 `{ _id, version }` 조건의 `replace_one`으로 수행합니다. 다른 요청이 먼저
//! 같은 계정을 갱신했다면 일치하는 문서가 없어 `ConcurrentModification`이 됩니다.

use async_trait::async_trait;
use mongodb::{
    bson::{doc, DateTime},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, IndexModel,
};
use crate::db::Database;
use crate::domain::entities::Account;
use crate::errors::{AppError, AppResult};
use crate::repositories::accounts::AccountStore;

const COLLECTION_NAME: &str = "accounts";
const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoAccountStore {
    collection: Collection<Account>,
}

impl MongoAccountStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.get_database().collection::<Account>(COLLECTION_NAME),
        }
    }

    /// 유일성 인덱스 생성
    ///
    /// 서버 시작 시 한 번 호출합니다. 이미 있는 인덱스는 그대로 둡니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let google_id_index = IndexModel::builder()
            .keys(doc! { "google_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .sparse(true)
                .name("google_id_unique".to_string())
                .build())
            .build();

        let reset_token_index = IndexModel::builder()
            .keys(doc! { "password_reset_token": 1 })
            .options(IndexOptions::builder()
                .sparse(true)
                .name("password_reset_token".to_string())
                .build())
            .build();

        self.collection
            .create_indexes([email_index, google_id_index, reset_token_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        log::info!("계정 컬렉션 인덱스 준비 완료");
        Ok(())
    }

    async fn find_one(&self, filter: mongodb::bson::Document) -> AppResult<Option<Account>> {
        self.collection
            .find_one(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}

/// 중복 키 에러를 계정 도메인 에러로 변환
fn map_write_error(error: mongodb::error::Error) -> AppError {
    let duplicate_message = match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE => {
            Some(e.message.clone())
        }
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY_CODE => Some(e.message.clone()),
        _ => None,
    };

    match duplicate_message {
        Some(message) if message.contains("google_id") => {
            AppError::ConflictError("이미 다른 계정에 연결된 Google 계정입니다".to_string())
        }
        Some(_) => AppError::EmailInUse,
        None => AppError::DatabaseError(error.to_string()),
    }
}

#[async_trait]
impl AccountStore for MongoAccountStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>> {
        self.find_one(doc! { "_id": id }).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        self.find_one(doc! { "email": email }).await
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<Account>> {
        self.find_one(doc! { "google_id": google_id }).await
    }

    async fn find_by_reset_token_hash(
        &self,
        token_hash: &str,
        now: DateTime,
    ) -> AppResult<Option<Account>> {
        self.find_one(doc! {
            "password_reset_token": token_hash,
            "password_reset_expires": { "$gt": now },
        })
        .await
    }

    async fn insert(&self, account: &Account) -> AppResult<()> {
        self.collection
            .insert_one(account)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn update(&self, account: &Account) -> AppResult<Account> {
        let mut next = account.clone();
        next.version = account.version + 1;

        let result = self.collection
            .replace_one(doc! { "_id": &account.id, "version": account.version }, &next)
            .await
            .map_err(map_write_error)?;

        if result.matched_count == 0 {
            return Err(AppError::ConcurrentModification);
        }

        Ok(next)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }
}
