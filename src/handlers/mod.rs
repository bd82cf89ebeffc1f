//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 서비스 호출로 옮기는 얇은 계층입니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Handlers (이 모듈) - 검증, 응답 변환            ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   AccountService - 비즈니스 로직                 ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   AccountStore - 데이터 접근                    ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! 핸들러는 `web::Data<AppState>`로 서비스를 받고, 요청 DTO를 `validator`로 검증한 뒤
//! `AppResult<HttpResponse>`를 반환합니다. 에러 응답 변환은 `AppError`의
//! `ResponseError` 구현이 담당합니다.
//!
//! - [`auth`] 가입, 로그인, 토큰, 비밀번호 재설정, Google OAuth
//! - [`account`] 인증된 계정 관리

pub mod auth;
pub mod account;
