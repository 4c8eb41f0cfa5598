//! Core domain models.
//!
//! - `adapter`: Node connection and adapter limits

mod adapter;

pub use adapter::{
	AdapterConfig, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_MINIMUM_FEE_RATE,
	DEFAULT_MINIMUM_HEIGHT, DEFAULT_REQUEST_TIMEOUT_MS,
};
