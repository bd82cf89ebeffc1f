pub mod token;

pub use token::{EmailActionClaims, EmailActionPurpose, SessionClaims, TokenKind, TokenPair};
