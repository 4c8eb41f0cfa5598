//! Domain models and data structures for the node adapter.
//!
//! - `blockchain`: Canonical block/transaction model and the Bitcoin RPC wire types
//! - `config`: Configuration loading and validation
//! - `core`: Adapter configuration
//! - `security`: Secrets (RPC credentials)

mod blockchain;
mod config;
mod core;
mod security;

// Re-export canonical types
pub use blockchain::{
	Asset, Block, BlockIdentifier, Transaction, BITCOIN_NAME, BITCOIN_PRECISION, BITCOIN_SYMBOL,
};

// Re-export Bitcoin wire types
pub use blockchain::bitcoin::{
	BitcoinBlock, BitcoinInput, BitcoinOutput, BitcoinTransaction, BlockchainInfo, FeeEstimate,
	ScriptPubKey, ScriptType,
};

// Re-export core types
pub use core::{
	AdapterConfig, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_MINIMUM_FEE_RATE,
	DEFAULT_MINIMUM_HEIGHT, DEFAULT_REQUEST_TIMEOUT_MS,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader, DEFAULT_CONFIG_PATH};

// Re-export security types
pub use security::{SecretString, SecretValue, SecurityError, SecurityResult};
