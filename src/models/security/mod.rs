//! Security models
//!
//! - `error`: Error types for secret resolution
//! - `secret`: RPC credentials held in zeroizing memory

mod error;
mod secret;

pub use error::{SecurityError, SecurityResult};
pub use secret::{SecretString, SecretValue};
