//! Domain Services
//!
//! Pure logic: no I/O, time is always passed in.

pub mod csrf;
pub mod login_guard;
pub mod token_codec;

pub use login_guard::{LoginAttemptGuard, LoginEvaluation, LoginOutcome};
pub use token_codec::{InvalidToken, IssuedToken, TokenClaims, TokenCodec};
