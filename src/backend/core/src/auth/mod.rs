//! Authentication: password hashing and session tokens.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN};
pub use token::{Claims, Session, TokenConfig, TokenService};
