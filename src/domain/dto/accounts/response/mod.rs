//! # 계정 관련 응답 DTO 모듈
//!
//! 응답 본문은 아래의 닫힌 집합 중 하나입니다. 실패 응답은 `AppError`가 직접 만듭니다.
//!
//! | 타입 | 사용처 |
//! |------|--------|
//! | [`AuthSessionResponse`] | 로그인, 이메일 인증, Google 로그인 |
//! | [`TokenPairResponse`] | 리프레시 토큰 갱신 |
//! | [`RegisterResponse`] | 회원가입 |
//! | [`AccountResponse`] | 프로필 조회, 이메일 변경 |
//! | [`MessageResponse`] | 그 밖의 성공 응답 |

pub mod account_response;
pub mod auth_response;

pub use account_response::{AccountResponse, MessageResponse, RegisterResponse};
pub use auth_response::{AuthSessionResponse, OAuthLoginUrlResponse, TokenPairResponse};
