//! # Domain Layer Module
//!
//! 계정 도메인의 타입을 모아 둔 계층입니다. 비즈니스 규칙은 `services`에,
//! 영속성은 `repositories`에 있고 이 모듈은 두 계층이 공유하는 타입만 가집니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - MongoDB에 저장되는 Account
//! ├── dto       - HTTP 요청/응답 계약
//! └── models    - 토큰 클레임, OAuth 프로필, 인증 컨텍스트
//!      │
//!      ▼
//! Application Layer (services)
//!      │
//!      ▼
//! Infrastructure Layer (repositories, db)
//! ```

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::Account;
pub use dto::*;
pub use models::*;
