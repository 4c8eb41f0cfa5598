//! Bootstrap module for loading configuration and creating a ready client.
//!
//! A client is only handed out after the node has answered `getblockchaininfo`
//! with a height at or above the configured minimum.

use std::{error::Error, path::Path, sync::Arc};

use crate::{
	models::{AdapterConfig, ConfigLoader, DEFAULT_CONFIG_PATH},
	services::blockchain::{
		BitcoinClient, BlockChainError, BlockchainTransport, EmbeddedAssetDecoder,
		HttpTransportClient,
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Loads and validates the adapter configuration
///
/// # Arguments
/// * `path` - Config file, `config/adapter.json` when `None`
pub async fn load_config(path: Option<&Path>) -> Result<AdapterConfig> {
	let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
	let config = AdapterConfig::load_from_path(path).await?;
	Ok(config)
}

/// Loads the configuration and connects to the node it describes
///
/// # Errors
/// Returns an error if the configuration is invalid or the node fails the bootstrap check
pub async fn initialize_adapter(
	path: Option<&Path>,
	decoder: Option<Arc<dyn EmbeddedAssetDecoder>>,
) -> Result<BitcoinClient<HttpTransportClient>> {
	let config = load_config(path).await?;

	let client = match decoder {
		Some(decoder) => BitcoinClient::new_with_decoder(&config, decoder).await?,
		None => BitcoinClient::new(&config).await?,
	};

	Ok(client)
}

/// Bootstraps a client over an already constructed transport
pub async fn initialize_adapter_with_transport<T>(
	transport: T,
	config: &AdapterConfig,
) -> std::result::Result<BitcoinClient<T>, BlockChainError>
where
	T: BlockchainTransport + Send + Sync + Clone,
{
	BitcoinClient::new_with_transport(transport, config)
		.bootstrap()
		.await
}
