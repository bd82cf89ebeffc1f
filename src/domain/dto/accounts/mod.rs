//! # Account Data Transfer Objects Module
//!
//! 계정 API의 요청/응답 계약을 정의합니다.
//!
//! ```text
//! accounts/
//! ├── request/
//! │   ├── auth_request.rs     # 가입, 로그인, 토큰, 비밀번호 재설정
//! │   └── account_request.rs  # 비밀번호/이메일 변경, 계정 삭제
//! └── response/
//!     ├── account_response.rs # 공개 계정 정보, 메시지
//!     └── auth_response.rs    # 토큰 발급 응답
//! ```

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
