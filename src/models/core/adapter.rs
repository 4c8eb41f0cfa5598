use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{Asset, SecretValue};

/// Heights at or below this are treated as a syncing or reorg-prone node.
pub const DEFAULT_MINIMUM_HEIGHT: u64 = 100_000;

/// Floor applied to the doubled fee estimate, in BTC per kvB.
pub const DEFAULT_MINIMUM_FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Upper bound for a single RPC round trip.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Number of `getrawtransaction` lookups allowed in flight while assembling a block.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 4;

fn default_minimum_height() -> u64 {
	DEFAULT_MINIMUM_HEIGHT
}

fn default_minimum_fee_rate() -> Decimal {
	DEFAULT_MINIMUM_FEE_RATE
}

fn default_request_timeout_ms() -> u64 {
	DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_max_concurrent_requests() -> usize {
	DEFAULT_MAX_CONCURRENT_REQUESTS
}

/// Connection details and operational limits for a single Bitcoin node.
///
/// Immutable once the adapter is constructed; every client call reads from it
/// and nothing writes back.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
	/// Identifier of the chain in the canonical model, also used as the native asset id
	pub chain_id: String,

	/// JSON-RPC endpoint of the node, e.g. `http://bitcoin-full-node:8332`
	pub rpc_url: String,

	/// RPC basic-auth user
	pub rpc_username: String,

	/// RPC basic-auth password
	pub rpc_password: SecretValue,

	/// Bootstrap and `get_height` fail while the node reports fewer blocks than this
	#[serde(default = "default_minimum_height")]
	pub minimum_height: u64,

	/// Lower bound for `estimate_fee`
	#[serde(
		default = "default_minimum_fee_rate",
		with = "rust_decimal::serde::str"
	)]
	pub minimum_fee_rate: Decimal,

	/// Timeout applied to every RPC call
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,

	/// In-flight transaction lookups per block fetch
	#[serde(default = "default_max_concurrent_requests")]
	pub max_concurrent_requests: usize,
}

impl AdapterConfig {
	/// The native asset descriptor every payment record refers to.
	pub fn asset(&self) -> Asset {
		Asset::bitcoin(&self.chain_id)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}
}
