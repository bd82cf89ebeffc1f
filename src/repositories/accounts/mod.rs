//! 계정 리포지토리
//!
//! - [`AccountStore`] - 계정 상태 머신이 의존하는 저장소 trait
//! - [`MongoAccountStore`] - 운영용 MongoDB 구현
//! - [`MemoryAccountStore`] - 테스트/로컬 실행용 메모리 구현

pub mod account_store;
pub mod mongo_account_store;
pub mod memory_account_store;

pub use account_store::AccountStore;
pub use mongo_account_store::MongoAccountStore;
pub use memory_account_store::MemoryAccountStore;
