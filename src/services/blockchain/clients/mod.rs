//! Blockchain client implementations.
//!
//! - Bitcoin client for Bitcoin Core compatible nodes

mod bitcoin {
	pub mod client;
	pub mod embedded;
	pub mod extractor;
	pub mod fee;
	pub mod rpc;
}

pub use bitcoin::client::{BitcoinClient, BitcoinClientTrait};
pub use bitcoin::embedded::{EmbeddedAssetDecoder, NoopEmbeddedAssetDecoder};
pub use bitcoin::extractor::{
	classify_output, extract_transactions, is_embedded_asset_marker, output_hash, payment,
	OutputClass, NULL_DATA_MARKER_HEX_LEN, NULL_DATA_MARKER_PREFIX,
};
pub use bitcoin::fee::{apply_fee_policy, FEE_CONFIRMATION_TARGET, FEE_SAFETY_MULTIPLIER};
pub use bitcoin::rpc::into_result;
