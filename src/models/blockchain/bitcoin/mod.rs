//! Bitcoin Core JSON-RPC response shapes.
//!
//! Only the fields the adapter reads are modelled; everything else the node
//! sends is ignored.

mod block;
mod transaction;

pub use block::{BlockchainInfo, Block as BitcoinBlock, FeeEstimate};
pub use transaction::{
	Input as BitcoinInput, Output as BitcoinOutput, ScriptPubKey, ScriptType,
	Transaction as BitcoinTransaction,
};
