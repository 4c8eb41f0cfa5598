//! Decoder seam for assets embedded in null-data outputs.
//!
//! Outputs carrying the embedded-asset marker are handed to an
//! [`EmbeddedAssetDecoder`]. The protocol itself is decoded elsewhere.

use async_trait::async_trait;

use crate::models::{Block, Transaction};

/// Decodes a second-layer asset transfer from a marker output
#[async_trait]
pub trait EmbeddedAssetDecoder: Send + Sync {
	/// Returns the canonical transfer carried by the output, `None` if there is none
	///
	/// # Arguments
	/// * `block` - The block being assembled; holds the transfers extracted so far
	/// * `transaction_id` - Id of the transaction containing the output
	/// * `output_index` - Index of the marker output within the transaction
	async fn decode(
		&self,
		block: &Block,
		transaction_id: &str,
		output_index: u32,
	) -> Result<Option<Transaction>, anyhow::Error>;
}

/// Decoder that recognises no embedded transfers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmbeddedAssetDecoder;

#[async_trait]
impl EmbeddedAssetDecoder for NoopEmbeddedAssetDecoder {
	async fn decode(
		&self,
		block: &Block,
		transaction_id: &str,
		output_index: u32,
	) -> Result<Option<Transaction>, anyhow::Error> {
		tracing::trace!(
			block_height = block.height,
			transaction_id,
			output_index,
			"skipping embedded asset output"
		);
		Ok(None)
	}
}
