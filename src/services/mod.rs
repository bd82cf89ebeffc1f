//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! - [`accounts`] - 계정 상태 머신 (가입, 인증, 로그인, 토큰 갱신, 비밀번호, 이메일, 삭제)
//! - [`auth`] - 비밀번호 해싱, JWT 발급/검증, Session Guard, Google OAuth
//! - [`notifications`] - 인증/환영/재설정 메일 발송
//!
//! 모든 서비스는 생성자 주입으로 조립되며 `main`에서 한 번 만들어
//! `web::Data<AppState>`로 공유합니다.

pub mod accounts;
pub mod auth;
pub mod notifications;
