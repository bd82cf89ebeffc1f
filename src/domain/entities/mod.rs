//! # Domain Entities Module
//!
//! MongoDB에 직접 저장되는 영속성 엔티티를 정의합니다.
//! 엔티티는 고유 식별자와 완전한 생명주기(생성, 수정, 삭제)를 가집니다.
//!
//! - [`accounts::Account`] - 사용자 계정 (자격 증명, 인증 상태, 리프레시 토큰 집합)

pub mod accounts;

pub use accounts::Account;
