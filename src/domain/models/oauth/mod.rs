//! # OAuth Domain Models Module
//!
//! Google OAuth 2.0 응답 타입과, 핸드셰이크가 끝난 뒤 계정 상태 머신에
//! 전달되는 [`GoogleProfile`]을 정의합니다.

pub mod google_profile;

pub use google_profile::{GoogleProfile, GoogleTokenResponse, GoogleUserInfo};
