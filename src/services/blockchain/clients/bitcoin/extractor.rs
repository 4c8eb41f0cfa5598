//! Output classification and payment extraction.
//!
//! Each output of a raw transaction is one of three things: a marker output
//! that belongs to the embedded-asset decoder, a single-address payment that
//! becomes a canonical [`Transaction`], or something the indexer ignores.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::{
	models::{Asset, BitcoinOutput, BitcoinTransaction, Block, ScriptType, Transaction},
	services::blockchain::{clients::bitcoin::embedded::EmbeddedAssetDecoder, BlockChainError},
};

/// Hex prefix of embedded-asset marker scripts: `OP_RETURN`, a 20-byte push, then ASCII "omni"
pub const NULL_DATA_MARKER_PREFIX: &str = "6a146f6d6e69";

/// Hex length of an embedded-asset marker script (22 bytes)
pub const NULL_DATA_MARKER_HEX_LEN: usize = 44;

/// How a single output is handled during extraction
#[derive(Debug, Clone, PartialEq)]
pub enum OutputClass<'a> {
	/// Marker output, routed to the embedded-asset decoder
	EmbeddedAsset,
	/// Payment to exactly one address with a positive amount
	Payment { receiver: &'a str, amount: Decimal },
	/// Not indexed
	Skip,
}

/// Stable identity of an output: hex SHA-256 of `"<txid>:<index>"`
pub fn output_hash(transaction_id: &str, output_index: u32) -> String {
	let digest = Sha256::digest(format!("{}:{}", transaction_id, output_index).as_bytes());
	hex::encode(digest)
}

pub fn is_embedded_asset_marker(script_hex: &str) -> bool {
	script_hex.len() == NULL_DATA_MARKER_HEX_LEN && script_hex.starts_with(NULL_DATA_MARKER_PREFIX)
}

pub fn classify_output(output: &BitcoinOutput) -> OutputClass<'_> {
	let script = &output.script_pub_key;

	match script.script_type {
		ScriptType::NullData if is_embedded_asset_marker(&script.hex) => OutputClass::EmbeddedAsset,
		ScriptType::PubKeyHash => match (script.single_address(), output.amount()) {
			(Some(receiver), Some(amount)) if amount > Decimal::ZERO => {
				OutputClass::Payment { receiver, amount }
			}
			_ => OutputClass::Skip,
		},
		_ => OutputClass::Skip,
	}
}

/// Builds the canonical record for a payment output of `transaction` in `block`
pub fn payment(
	block: &Block,
	transaction: &BitcoinTransaction,
	output_index: u32,
	receiver: &str,
	amount: Decimal,
	asset: &Asset,
) -> Transaction {
	Transaction {
		asset: asset.clone(),
		transaction_hash: transaction.txid.clone(),
		sender: String::new(),
		receiver: receiver.to_string(),
		memo: None,
		block_hash: block.hash.clone(),
		block_height: block.height,
		output_index,
		output_hash: output_hash(&transaction.txid, output_index),
		confirmations: transaction.confirmations,
		amount,
	}
}

/// Appends every record `transaction` contributes to `block`, in output order
///
/// # Errors
/// Returns `EmbeddedAssetError` when the decoder fails on a marker output; the
/// caller discards the partially assembled block.
pub async fn extract_transactions(
	block: &mut Block,
	transaction: &BitcoinTransaction,
	asset: &Asset,
	decoder: &dyn EmbeddedAssetDecoder,
) -> Result<(), BlockChainError> {
	for output in &transaction.vout {
		match classify_output(output) {
			OutputClass::EmbeddedAsset => {
				let decoded = decoder
					.decode(block, &transaction.txid, output.n)
					.await
					.map_err(|e| {
						BlockChainError::embedded_asset_error(
							format!(
								"Failed to decode embedded asset output {}:{}",
								transaction.txid, output.n
							),
							Some(e.into()),
							Some(HashMap::from([
								("transaction_id".to_string(), transaction.txid.clone()),
								("output_index".to_string(), output.n.to_string()),
							])),
						)
					})?;

				if let Some(decoded) = decoded {
					block.transactions.push(decoded);
				}
			}
			OutputClass::Payment { receiver, amount } => {
				let record = payment(block, transaction, output.n, receiver, amount, asset);
				block.transactions.push(record);
			}
			OutputClass::Skip => {}
		}
	}

	Ok(())
}
