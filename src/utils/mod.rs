//! Utility modules for common functionality.
//!
//! - http: HTTP client construction for the node transport
//! - logging: Logging setup and the shared error context
//! - tests: Test utilities

pub mod http;
pub mod logging;

pub use http::*;
