//! Bitcoin Core RPC method names and response envelope handling.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use crate::services::blockchain::BlockChainError;

pub const RPC_METHOD_GET_BLOCKCHAIN_INFO: &str = "getblockchaininfo";
pub const RPC_METHOD_GET_BLOCK_HASH: &str = "getblockhash";
pub const RPC_METHOD_GET_BLOCK: &str = "getblock";
pub const RPC_METHOD_GET_RAW_TRANSACTION: &str = "getrawtransaction";
pub const RPC_METHOD_ESTIMATE_SMART_FEE: &str = "estimatesmartfee";
pub const RPC_METHOD_SEND_RAW_TRANSACTION: &str = "sendrawtransaction";

/// `getrawtransaction` verbosity returning the decoded transaction
pub const VERBOSE: u8 = 1;

fn method_metadata(method: &str) -> Option<HashMap<String, String>> {
	Some(HashMap::from([("method".to_string(), method.to_string())]))
}

/// Returns the node-reported error carried by `envelope`, if any
pub fn rpc_error(method: &str, envelope: &Value) -> Option<BlockChainError> {
	let error = envelope.get("error").filter(|error| !error.is_null())?;

	let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
	let message = error
		.get("message")
		.and_then(Value::as_str)
		.unwrap_or("Unknown RPC error");

	Some(BlockChainError::rpc_error(
		code,
		message,
		method_metadata(method),
	))
}

/// Classifies a JSON-RPC response envelope and decodes its `result`
///
/// # Errors
/// - `RpcError` when the envelope carries a non-null `error` object
/// - `DecodeError` when `result` is missing or does not match `R`
pub fn into_result<R: DeserializeOwned>(method: &str, envelope: Value) -> Result<R, BlockChainError> {
	if let Some(error) = rpc_error(method, &envelope) {
		return Err(error);
	}

	let result = match envelope {
		Value::Object(mut fields) => fields.remove("result"),
		_ => None,
	}
	.ok_or_else(|| {
		BlockChainError::decode_error(
			format!("Missing 'result' field for method '{}'", method),
			None,
			method_metadata(method),
		)
	})?;

	serde_json::from_value(result).map_err(|e| {
		BlockChainError::decode_error(
			format!("Failed to decode result of '{}': {}", method, e),
			Some(Box::new(e)),
			method_metadata(method),
		)
	})
}
