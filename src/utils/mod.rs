//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 이메일 정규화, 필수 입력 검사, 비밀번호 정책
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::utils::string_utils::{normalize_email, validate_required_string};
//!
//! let email = normalize_email("  Ann@Example.com ");
//! let name = validate_required_string("  Ann  ", "이름")?;
//! ```

pub mod string_utils;
