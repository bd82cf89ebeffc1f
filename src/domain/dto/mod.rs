//! # Data Transfer Objects Module
//!
//! HTTP 경계에서 사용하는 요청/응답 타입입니다.
//!
//! ## 설계 원칙
//!
//! - **Request DTO**: `Deserialize` + `Validate`, 형식 검사만 담당
//! - **Response DTO**: `Serialize`, 엔티티에서 `From`으로 변환하며 민감한 필드는 제외
//! - **필드 이름**: snake_case
//! - **날짜/시간**: RFC 3339 문자열

pub mod accounts;

pub use accounts::*;
