//! 미들웨어 모듈
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - `Authorization: Bearer <access token>` 검증
//! - 토큰의 계정을 저장소에서 다시 읽어 Request Extensions에 저장
//! - 실패 시 401 (`AppError` 응답 형식)
//!
//! ```rust,ignore
//! App::new()
//!     .service(
//!         web::scope("/api/v1/account")
//!             .wrap(AuthMiddleware)
//!             .service(handlers::account::get_me)
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
