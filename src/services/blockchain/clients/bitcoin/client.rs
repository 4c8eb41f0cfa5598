//! Bitcoin Core client implementation.
//!
//! Resolves blocks by hash or height, assembles canonical blocks from verbose
//! raw transactions, quotes fees, tracks confirmations and broadcasts signed
//! transactions. The client holds no cache: every call goes to the node.

use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Arc};
use tracing::instrument;

use crate::{
	models::{
		AdapterConfig, Asset, BitcoinBlock, BitcoinTransaction, Block, BlockIdentifier,
		BlockchainInfo, FeeEstimate,
	},
	services::blockchain::{
		client::BlockChainClient,
		clients::bitcoin::{
			embedded::{EmbeddedAssetDecoder, NoopEmbeddedAssetDecoder},
			extractor::extract_transactions,
			fee::{apply_fee_policy, FEE_CONFIRMATION_TARGET},
			rpc::{
				into_result, RPC_METHOD_ESTIMATE_SMART_FEE, RPC_METHOD_GET_BLOCK,
				RPC_METHOD_GET_BLOCKCHAIN_INFO, RPC_METHOD_GET_BLOCK_HASH,
				RPC_METHOD_GET_RAW_TRANSACTION, RPC_METHOD_SEND_RAW_TRANSACTION, VERBOSE,
			},
		},
		error::RPC_INVALID_ADDRESS_OR_KEY,
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
};

/// Client for a Bitcoin Core compatible node
///
/// Cheap to clone; clones share configuration and the embedded-asset decoder.
#[derive(Clone)]
pub struct BitcoinClient<T: Send + Sync + Clone> {
	/// The underlying transport for RPC communication
	http_client: T,
	config: Arc<AdapterConfig>,
	asset: Asset,
	decoder: Arc<dyn EmbeddedAssetDecoder>,
}

impl<T: Send + Sync + Clone> BitcoinClient<T> {
	/// Creates a client around `http_client` without contacting the node
	pub fn new_with_transport(http_client: T, config: &AdapterConfig) -> Self {
		Self {
			http_client,
			asset: config.asset(),
			config: Arc::new(config.clone()),
			decoder: Arc::new(NoopEmbeddedAssetDecoder),
		}
	}

	/// Replaces the decoder used for embedded-asset marker outputs
	pub fn with_embedded_asset_decoder(mut self, decoder: Arc<dyn EmbeddedAssetDecoder>) -> Self {
		self.decoder = decoder;
		self
	}

	pub fn config(&self) -> &AdapterConfig {
		&self.config
	}

	/// The native asset every payment record refers to
	pub fn asset(&self) -> &Asset {
		&self.asset
	}
}

impl<T: Send + Sync + Clone + BlockchainTransport> BitcoinClient<T> {
	/// Checks once that the node is reachable and past the minimum height
	///
	/// # Errors
	/// Any transport, decode or RPC error, or `ValidationError` when the node
	/// reports fewer blocks than `minimum_height`. Nothing is retried.
	pub async fn bootstrap(self) -> Result<Self, BlockChainError> {
		let height = self.get_latest_block_number().await?;
		tracing::info!(
			chain_id = %self.config.chain_id,
			height,
			"connected to bitcoin node"
		);
		Ok(self)
	}

	async fn call<R: DeserializeOwned>(
		&self,
		method: &'static str,
		params: Value,
	) -> Result<R, BlockChainError> {
		let envelope = self
			.http_client
			.send_raw_request(method, Some(params))
			.await?;
		into_result(method, envelope)
	}
}

impl BitcoinClient<HttpTransportClient> {
	/// Creates a client for the configured node and bootstraps it
	///
	/// # Arguments
	/// * `config` - Node connection details and limits
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - Ready client, or the bootstrap failure
	pub async fn new(config: &AdapterConfig) -> Result<Self, BlockChainError> {
		let transport = HttpTransportClient::new(config)?;
		Self::new_with_transport(transport, config).bootstrap().await
	}

	/// Same as [`BitcoinClient::new`] with a custom embedded-asset decoder
	pub async fn new_with_decoder(
		config: &AdapterConfig,
		decoder: Arc<dyn EmbeddedAssetDecoder>,
	) -> Result<Self, BlockChainError> {
		let transport = HttpTransportClient::new(config)?;
		Self::new_with_transport(transport, config)
			.with_embedded_asset_decoder(decoder)
			.bootstrap()
			.await
	}
}

/// Node queries below the canonical block model
#[async_trait]
pub trait BitcoinClientTrait {
	/// Raw `getblockchaininfo` result, without the height guard
	async fn get_blockchain_info(&self) -> Result<BlockchainInfo, BlockChainError>;

	/// Hash of the block at `height` on the active chain
	async fn get_block_hash(&self, height: u64) -> Result<String, BlockChainError>;

	/// Verbose transaction lookup
	///
	/// Fails with RPC code `-5` when the node does not know the transaction.
	async fn get_raw_transaction(
		&self,
		transaction_id: &str,
	) -> Result<BitcoinTransaction, BlockChainError>;

	/// Canonical block for `hash`
	async fn get_block_by_hash(&self, hash: &str) -> Result<Block, BlockChainError>;

	/// Canonical block at `height`, one extra round trip to resolve the hash
	async fn get_block_by_height(&self, height: u64) -> Result<Block, BlockChainError>;
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BitcoinClientTrait for BitcoinClient<T> {
	#[instrument(skip(self))]
	async fn get_blockchain_info(&self) -> Result<BlockchainInfo, BlockChainError> {
		self.call(RPC_METHOD_GET_BLOCKCHAIN_INFO, json!([])).await
	}

	#[instrument(skip(self))]
	async fn get_block_hash(&self, height: u64) -> Result<String, BlockChainError> {
		self.call(RPC_METHOD_GET_BLOCK_HASH, json!([height])).await
	}

	#[instrument(skip(self))]
	async fn get_raw_transaction(
		&self,
		transaction_id: &str,
	) -> Result<BitcoinTransaction, BlockChainError> {
		self.call(
			RPC_METHOD_GET_RAW_TRANSACTION,
			json!([transaction_id, VERBOSE]),
		)
		.await
	}

	/// Fetches the block header, then every transaction in it
	///
	/// Lookups run up to `max_concurrent_requests` at a time and are consumed in
	/// block order. The first failure aborts the whole fetch.
	#[instrument(skip(self))]
	async fn get_block_by_hash(&self, hash: &str) -> Result<Block, BlockChainError> {
		let header: BitcoinBlock = self.call(RPC_METHOD_GET_BLOCK, json!([hash])).await?;

		// Futures are lazy; `buffered` decides how many are in flight
		let lookups: Vec<_> = header
			.tx
			.iter()
			.map(|transaction_id| self.get_raw_transaction(transaction_id))
			.collect();

		let raw_transactions: Vec<BitcoinTransaction> = stream::iter(lookups)
			.buffered(self.config.max_concurrent_requests.max(1))
			.try_collect()
			.await?;

		let mut block = Block::new(header.hash, header.height);
		for transaction in &raw_transactions {
			extract_transactions(&mut block, transaction, &self.asset, self.decoder.as_ref())
				.await?;
		}

		tracing::debug!(
			height = block.height,
			raw_transactions = raw_transactions.len(),
			records = block.transactions.len(),
			"assembled block"
		);

		Ok(block)
	}

	#[instrument(skip(self))]
	async fn get_block_by_height(&self, height: u64) -> Result<Block, BlockChainError> {
		let hash = self.get_block_hash(height).await?;
		self.get_block_by_hash(&hash).await
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BlockChainClient for BitcoinClient<T> {
	/// Current chain height, rejected while below `minimum_height`
	#[instrument(skip(self))]
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError> {
		let info = self.get_blockchain_info().await?;

		if info.blocks < self.config.minimum_height {
			return Err(BlockChainError::validation_error(
				format!(
					"Node height {} is below the minimum height {}",
					info.blocks, self.config.minimum_height
				),
				None,
				Some(HashMap::from([
					("chain_id".to_string(), self.config.chain_id.clone()),
					("chain".to_string(), info.chain.clone()),
				])),
			));
		}

		Ok(info.blocks)
	}

	#[instrument(skip(self))]
	async fn get_block(&self, identifier: &BlockIdentifier) -> Result<Block, BlockChainError> {
		match identifier {
			BlockIdentifier::Height(height) => self.get_block_by_height(*height).await,
			BlockIdentifier::Hash(hash) => self.get_block_by_hash(hash).await,
		}
	}

	#[instrument(skip(self))]
	async fn estimate_fee(&self) -> Result<Decimal, BlockChainError> {
		let estimate: FeeEstimate = self
			.call(RPC_METHOD_ESTIMATE_SMART_FEE, json!([FEE_CONFIRMATION_TARGET]))
			.await?;

		let quoted_rate = estimate.rate().ok_or_else(|| {
			BlockChainError::validation_error(
				"Node returned no usable fee rate",
				None,
				Some(HashMap::from([(
					"errors".to_string(),
					estimate.errors.join("; "),
				)])),
			)
		})?;

		apply_fee_policy(quoted_rate, self.config.minimum_fee_rate)
	}

	/// Confirmations of `transaction_hash`; an unknown transaction has zero
	#[instrument(skip(self))]
	async fn get_confirmations(&self, transaction_hash: &str) -> Result<i64, BlockChainError> {
		match self.get_raw_transaction(transaction_hash).await {
			Ok(transaction) => Ok(transaction.confirmations),
			Err(error) if error.is_rpc_code(RPC_INVALID_ADDRESS_OR_KEY) => {
				tracing::debug!("transaction not known to the node, reporting 0 confirmations");
				Ok(0)
			}
			Err(error) => Err(error),
		}
	}

	#[instrument(skip(self, raw_transaction))]
	async fn send_raw_transaction(&self, raw_transaction: &str) -> Result<String, BlockChainError> {
		if raw_transaction.is_empty() || hex::decode(raw_transaction).is_err() {
			return Err(BlockChainError::validation_error(
				"Raw transaction must be a non-empty hex string",
				None,
				None,
			));
		}

		let transaction_id: String = self
			.call(RPC_METHOD_SEND_RAW_TRANSACTION, json!([raw_transaction]))
			.await?;
		tracing::info!(transaction_id = %transaction_id, "broadcast transaction");

		Ok(transaction_id)
	}
}
