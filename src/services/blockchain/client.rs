//! Core blockchain client interface.
//!
//! This is the contract the indexing pipeline depends on. Results are the
//! canonical block and transaction model; errors keep the node's numeric code
//! available through [`BlockChainError::rpc_code`].

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
	models::{Block, BlockIdentifier},
	services::blockchain::BlockChainError,
};

/// Defines the core interface for blockchain clients
///
/// Implementations hold no mutable state between calls and never retry; retry
/// policy belongs to the caller.
#[async_trait]
pub trait BlockChainClient: Send + Sync + Clone {
	/// Retrieves the latest block number from the blockchain
	///
	/// # Returns
	/// * `Result<u64, BlockChainError>` - The current height, or `ValidationError`
	///   while the node is below the configured minimum height
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError>;

	/// Retrieves a block with its payment records
	///
	/// # Arguments
	/// * `identifier` - Height or hash of the block
	///
	/// # Returns
	/// * `Result<Block, BlockChainError>` - The fully assembled block; no partial blocks
	async fn get_block(&self, identifier: &BlockIdentifier) -> Result<Block, BlockChainError>;

	/// Quotes a fee rate in native units per kilo-virtual-byte
	async fn estimate_fee(&self) -> Result<Decimal, BlockChainError>;

	/// Retrieves the number of confirmations for a transaction
	///
	/// # Returns
	/// * `Result<i64, BlockChainError>` - 0 for mempool and unknown transactions
	async fn get_confirmations(&self, transaction_hash: &str) -> Result<i64, BlockChainError>;

	/// Submits a signed, hex-encoded transaction
	///
	/// # Returns
	/// * `Result<String, BlockChainError>` - The transaction id assigned by the node
	async fn send_raw_transaction(&self, raw_transaction: &str) -> Result<String, BlockChainError>;
}
