//! Request middleware.

pub mod session;

pub use session::{authenticate, extract_token, RequestStage, SessionLayer, SessionService, TOKEN_HEADER};
