//! Adapter configuration loading and validation.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::{collections::HashMap, path::Path};

use crate::models::{
	config::error::ConfigError, AdapterConfig, ConfigLoader, SecretValue, BITCOIN_PRECISION,
};

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

#[async_trait]
impl ConfigLoader for AdapterConfig {
	/// Resolve the RPC password into a plain secret
	async fn resolve_secrets(&self) -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();
		let mut config = self.clone();

		let password = self.rpc_password.resolve().map_err(|e| {
			ConfigError::parse_error(
				format!("failed to resolve RPC password: {}", e),
				Some(e),
				None,
			)
		})?;
		config.rpc_password = SecretValue::Plain(password);

		Ok(config)
	}

	/// Load the adapter configuration from a JSON file
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				"adapter config must be a .json file",
				None,
				path_metadata(path),
			));
		}

		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open adapter config file: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;
		let mut config: AdapterConfig = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse adapter config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		// Resolve secrets before validating
		config = config.resolve_secrets().await?;

		config.validate()?;

		Ok(config)
	}

	/// Validate the adapter configuration
	///
	/// Ensures that:
	/// - The chain id and RPC credentials are set
	/// - The RPC URL is an absolute http(s) URL
	/// - Thresholds and limits are positive
	/// - The fee floor fits the asset's 8 decimal places
	fn validate(&self) -> Result<(), ConfigError> {
		if self.chain_id.trim().is_empty() {
			return Err(ConfigError::validation_error(
				"Chain id is required",
				None,
				None,
			));
		}

		let url = url::Url::parse(&self.rpc_url).map_err(|e| {
			ConfigError::validation_error(
				format!("Invalid RPC URL: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([("url".to_string(), self.rpc_url.clone())])),
			)
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::validation_error(
				"RPC URL must start with http:// or https://",
				None,
				Some(HashMap::from([("url".to_string(), self.rpc_url.clone())])),
			));
		}
		if !url.username().is_empty() || url.password().is_some() {
			return Err(ConfigError::validation_error(
				"RPC URL must not embed credentials, use rpc_username and rpc_password",
				None,
				None,
			));
		}

		if self.rpc_username.is_empty() {
			return Err(ConfigError::validation_error(
				"RPC username is required",
				None,
				None,
			));
		}

		if self.rpc_password.is_empty() {
			return Err(ConfigError::validation_error(
				"RPC password is required",
				None,
				None,
			));
		}

		if self.minimum_height == 0 {
			return Err(ConfigError::validation_error(
				"minimum_height must be greater than 0",
				None,
				None,
			));
		}

		if self.minimum_fee_rate <= Decimal::ZERO {
			return Err(ConfigError::validation_error(
				"minimum_fee_rate must be greater than 0",
				None,
				None,
			));
		}

		if self.minimum_fee_rate.normalize().scale() > BITCOIN_PRECISION {
			return Err(ConfigError::validation_error(
				format!(
					"minimum_fee_rate must have at most {} decimal places",
					BITCOIN_PRECISION
				),
				None,
				Some(HashMap::from([(
					"minimum_fee_rate".to_string(),
					self.minimum_fee_rate.to_string(),
				)])),
			));
		}

		if self.request_timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"request_timeout_ms must be greater than 0",
				None,
				None,
			));
		}

		if self.max_concurrent_requests == 0 {
			return Err(ConfigError::validation_error(
				"max_concurrent_requests must be at least 1",
				None,
				None,
			));
		}

		self.validate_protocol();

		Ok(())
	}

	/// Warns when credentials would travel in clear text
	fn validate_protocol(&self) {
		if self.rpc_url.starts_with("http://") {
			tracing::warn!(
				"Chain '{}' uses an insecure RPC URL, credentials are sent in clear text: {}",
				self.chain_id,
				self.rpc_url
			);
		}
	}
}
