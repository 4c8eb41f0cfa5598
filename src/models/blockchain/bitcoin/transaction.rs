//! Verbose raw transaction as returned by `getrawtransaction <txid> true`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::str::FromStr;

/// Script classification reported by the node in `scriptPubKey.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ScriptType {
	#[serde(rename = "pubkeyhash")]
	PubKeyHash,
	#[serde(rename = "scripthash")]
	ScriptHash,
	#[serde(rename = "pubkey")]
	PubKey,
	#[serde(rename = "multisig")]
	MultiSig,
	#[serde(rename = "nulldata")]
	NullData,
	#[serde(rename = "witness_v0_keyhash")]
	WitnessV0KeyHash,
	#[serde(rename = "witness_v0_scripthash")]
	WitnessV0ScriptHash,
	#[serde(rename = "witness_v1_taproot")]
	WitnessV1Taproot,
	#[serde(rename = "nonstandard")]
	NonStandard,
	#[serde(other)]
	Unknown,
}

/// Locking script of an output.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScriptPubKey {
	#[serde(default)]
	pub hex: String,
	#[serde(rename = "type")]
	pub script_type: ScriptType,
	/// Reported by nodes before v22
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub addresses: Option<Vec<String>>,
	/// Reported by nodes from v22 on
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
}

impl ScriptPubKey {
	/// Addresses the script pays to, preferring the legacy list when both forms are present.
	pub fn resolved_addresses(&self) -> Vec<&str> {
		match (&self.addresses, &self.address) {
			(Some(addresses), _) => addresses.iter().map(String::as_str).collect(),
			(None, Some(address)) => vec![address.as_str()],
			(None, None) => Vec::new(),
		}
	}

	/// The only address the script pays to, if there is exactly one.
	pub fn single_address(&self) -> Option<&str> {
		match self.resolved_addresses().as_slice() {
			[address] => Some(*address),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Input {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub txid: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vout: Option<u32>,
	/// Present only on the coinbase input
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub coinbase: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sequence: Option<u64>,
}

impl Input {
	pub fn is_coinbase(&self) -> bool {
		self.coinbase.is_some()
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Output {
	/// Amount in BTC, kept as the exact digits the node sent
	pub value: Number,
	pub n: u32,
	#[serde(rename = "scriptPubKey")]
	pub script_pub_key: ScriptPubKey,
}

impl Output {
	/// Decodes `value` into an exact decimal.
	///
	/// Returns `None` when the wire text is not a representable decimal.
	pub fn amount(&self) -> Option<Decimal> {
		parse_amount(&self.value)
	}
}

/// Parses a JSON number without going through `f64`.
pub(crate) fn parse_amount(value: &Number) -> Option<Decimal> {
	let text = value.to_string();
	Decimal::from_str(&text)
		.or_else(|_| Decimal::from_scientific(&text))
		.ok()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transaction {
	pub txid: String,
	#[serde(default)]
	pub hash: Option<String>,
	#[serde(default)]
	pub vin: Vec<Input>,
	#[serde(default)]
	pub vout: Vec<Output>,
	#[serde(rename = "blockhash", default)]
	pub block_hash: Option<String>,
	#[serde(default)]
	pub locktime: u64,
	/// Absent for mempool transactions
	#[serde(default)]
	pub confirmations: i64,
}
