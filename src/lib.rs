//! 계정/인증 서비스 백엔드
//!
//! 이메일 인증 기반 회원가입, 로컬 로그인, Google OAuth 2.0 로그인,
//! 폐기 가능한 JWT 세션을 제공하는 actix-web 서비스입니다.
//!
//! # Features
//!
//! - **회원가입**: 인증 메일 발송, 미인증 계정 재가입, 재발송 쿨다운
//! - **JWT 인증**: 15분 액세스 토큰, 7일 리프레시 토큰 (계정별 폐기 목록)
//! - **OAuth 2.0**: Google 계정 연결 또는 신규 생성
//! - **비밀번호**: 재설정 메일, 변경, 계정 삭제 시 재확인
//! - **MongoDB**: 버전 필드 기반 낙관적 동시성 제어
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 + AuthMiddleware
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증/응답 변환
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ AccountService  │ ← 계정 상태 머신 (AppState로 공유)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  AccountStore   │ ← MongoDB / 메모리
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use account_auth_backend::repositories::accounts::MemoryAccountStore;
//! use account_auth_backend::services::notifications::LogNotifier;
//! use account_auth_backend::state::AppState;
//!
//! let state = AppState::from_env(Arc::new(MemoryAccountStore::new()), Arc::new(LogNotifier));
//! let session = state.accounts.login("ann@example.com", "password123").await?;
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
