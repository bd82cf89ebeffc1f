//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 서비스 계층은 `Arc<dyn AccountStore>`로 저장소를 주입받습니다.
//! 운영에서는 MongoDB, 테스트에서는 메모리 구현을 넣습니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crate::repositories::accounts::{AccountStore, MongoAccountStore};
//!
//! let store: Arc<dyn AccountStore> = Arc::new(MongoAccountStore::new(&database));
//! let account = store.find_by_email("ann@example.com").await?;
//! ```

pub mod accounts;
