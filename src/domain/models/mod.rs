//! # Domain Models Module
//!
//! 영속되지 않는 도메인 모델과 값 객체를 정의합니다.
//!
//! ## Entities vs Models 구분
//!
//! - `../entities/` - MongoDB에 저장되는 객체 (`Account`)
//! - `./` - 요청 처리 중에만 존재하는 값 (토큰 클레임, OAuth 프로필, 인증 컨텍스트)
//!
//! ## 모듈 구성
//!
//! - [`auth`] - Session Guard가 확인한 계정과 토큰 발급 결과
//! - [`oauth`] - Google 응답 타입과 [`GoogleProfile`]
//! - [`token`] - JWT 클레임과 발급된 토큰 쌍

pub mod auth;
pub mod oauth;
pub mod token;

pub use auth::{AuthSession, AuthenticatedAccount};
pub use oauth::{GoogleProfile, GoogleTokenResponse, GoogleUserInfo};
pub use token::{EmailActionClaims, EmailActionPurpose, SessionClaims, TokenKind, TokenPair};
