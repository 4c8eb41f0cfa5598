//! Blockchain client interfaces and implementations.
//!
//! - Generic blockchain client trait
//! - Bitcoin client, output extraction and fee policy
//! - JSON-RPC over HTTP transport
//! - Error handling for blockchain operations

mod client;
mod clients;
mod error;
mod transports;

pub use client::BlockChainClient;
pub use clients::{
	apply_fee_policy, classify_output, extract_transactions, into_result,
	is_embedded_asset_marker, output_hash, payment, BitcoinClient, BitcoinClientTrait,
	EmbeddedAssetDecoder, NoopEmbeddedAssetDecoder, OutputClass, FEE_CONFIRMATION_TARGET,
	FEE_SAFETY_MULTIPLIER, NULL_DATA_MARKER_HEX_LEN, NULL_DATA_MARKER_PREFIX,
};
pub use error::{BlockChainError, RPC_INVALID_ADDRESS_OR_KEY};
pub use transports::{BlockchainTransport, HttpTransportClient, TransportError};
