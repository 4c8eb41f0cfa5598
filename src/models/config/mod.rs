//! Configuration loading and validation.
//!
//! The adapter reads a single JSON document describing the node it talks to.
//! See `config/adapter.json` for an example.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use std::path::Path;

mod adapter_config;
mod error;

pub use error::ConfigError;

/// Default location of the adapter configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/adapter.json";

/// Common interface for loading configuration files
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Load configuration from a specific file path
	///
	/// Secrets are resolved and the result validated before it is returned.
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Validate the configuration
	///
	/// Returns Ok(()) if valid, or an error message if invalid.
	fn validate(&self) -> Result<(), ConfigError>;

	/// Validate safety of the protocol
	///
	/// Returns if safe, or logs a warning message if unsafe.
	fn validate_protocol(&self);

	/// Check if a file is a JSON file based on extension
	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}

	/// Resolve all secrets in the configuration
	async fn resolve_secrets(&self) -> Result<Self, ConfigError>;
}
