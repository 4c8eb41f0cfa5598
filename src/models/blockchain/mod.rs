//! Block and transaction models.
//!
//! The canonical types here are what the indexing pipeline consumes for every
//! chain. The `bitcoin` submodule holds the node's wire shapes they are built from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod bitcoin;

/// Symbol of the native asset.
pub const BITCOIN_SYMBOL: &str = "BTC";

/// Display name of the native asset.
pub const BITCOIN_NAME: &str = "Bitcoin";

/// Fractional digits of one BTC (1 satoshi = 0.00000001 BTC).
pub const BITCOIN_PRECISION: u32 = 8;

/// Descriptor of the asset a canonical transaction moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Asset {
	pub chain_id: String,
	pub asset_id: String,
	pub chain_asset_key: String,
	pub symbol: String,
	pub name: String,
	pub precision: u32,
}

impl Asset {
	/// The native currency of a Bitcoin chain; chain id, asset id and key coincide.
	pub fn bitcoin(chain_id: &str) -> Self {
		Self {
			chain_id: chain_id.to_string(),
			asset_id: chain_id.to_string(),
			chain_asset_key: chain_id.to_string(),
			symbol: BITCOIN_SYMBOL.to_string(),
			name: BITCOIN_NAME.to_string(),
			precision: BITCOIN_PRECISION,
		}
	}
}

/// A single payment event.
///
/// For UTXO chains one transaction can yield several of these, one per
/// qualifying output. `output_hash` is stable across re-ingestion and is the
/// idempotency key downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
	pub asset: Asset,
	pub transaction_hash: String,
	/// Empty for UTXO outputs, the spender is not known at the output level
	pub sender: String,
	pub receiver: String,
	pub memo: Option<String>,
	pub block_hash: String,
	pub block_height: u64,
	pub output_index: u32,
	pub output_hash: String,
	pub confirmations: i64,
	pub amount: Decimal,
}

/// A block with the payment events extracted from it, in node order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
	pub hash: String,
	pub height: u64,
	pub transactions: Vec<Transaction>,
}

impl Block {
	/// An empty block ready to receive extracted transactions.
	pub fn new(hash: impl Into<String>, height: u64) -> Self {
		Self {
			hash: hash.into(),
			height,
			transactions: Vec::new(),
		}
	}
}

/// How a caller addresses a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockIdentifier {
	Height(u64),
	Hash(String),
}

impl BlockIdentifier {
	/// Interprets a free-form identifier the way string-only callers expect.
	///
	/// An integer strictly greater than `minimum_height` is a height, anything
	/// else is a hash.
	///
	/// # Known limitation
	/// A hash literal made only of digits whose value exceeds `minimum_height`
	/// is routed as a height. Callers that know what they hold should construct
	/// the variant directly.
	pub fn parse(identifier: &str, minimum_height: u64) -> Self {
		match identifier.parse::<u64>() {
			Ok(height) if height > minimum_height => Self::Height(height),
			_ => Self::Hash(identifier.to_string()),
		}
	}
}

impl std::fmt::Display for BlockIdentifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Height(height) => write!(f, "{}", height),
			Self::Hash(hash) => write!(f, "{}", hash),
		}
	}
}
