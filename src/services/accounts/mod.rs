//! 계정 상태 머신
//!
//! [`AccountService`] 하나가 모든 계정 작업을 제공하며, 구현은 작업 묶음별로
//! 파일이 나뉘어 있습니다.

pub mod account_service;
mod registration;
mod session;
mod password;

pub use account_service::{AccountService, VERIFICATION_RESEND_COOLDOWN_SECS};
