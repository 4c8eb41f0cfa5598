//! Bitcoin block and chain-level RPC results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::transaction::parse_amount;

/// Result of `getblock <hash> 1`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Block {
	pub hash: String,
	pub height: u64,
	/// Transaction ids in block order
	#[serde(default)]
	pub tx: Vec<String>,
}

/// Result of `getblockchaininfo`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BlockchainInfo {
	#[serde(default)]
	pub chain: String,
	/// Height of the most-work fully-validated chain
	pub blocks: u64,
	#[serde(default)]
	pub headers: Option<u64>,
	#[serde(rename = "bestblockhash", default)]
	pub best_block_hash: Option<String>,
	#[serde(rename = "initialblockdownload", default)]
	pub initial_block_download: Option<bool>,
}

/// Result of `estimatesmartfee <target>`.
///
/// `feerate` is absent when the node has too little data; `errors` then says why.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeeEstimate {
	#[serde(rename = "feerate", default)]
	pub fee_rate: Option<Number>,
	#[serde(default)]
	pub blocks: Option<u64>,
	#[serde(default)]
	pub errors: Vec<String>,
}

impl FeeEstimate {
	/// Quoted rate in BTC/kvB, `None` when missing or not representable
	pub fn rate(&self) -> Option<Decimal> {
		self.fee_rate.as_ref().and_then(parse_amount)
	}
}
