//! 계정 엔티티 모듈

pub mod account;

pub use account::Account;
