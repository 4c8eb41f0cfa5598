//! Blockchain service error types and handling.
//!
//! Separates failures reported by the node itself (a JSON-RPC error object with
//! a numeric code) from transport and decoding failures, so callers can match on
//! the node's code without inspecting messages.

use crate::{
	services::blockchain::transports::TransportError,
	utils::logging::error::{ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Bitcoin Core `RPC_INVALID_ADDRESS_OR_KEY`, returned for unknown transactions and blocks
pub const RPC_INVALID_ADDRESS_OR_KEY: i64 = -5;

/// Represents possible errors that can occur during blockchain operations
#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// The request never produced a usable response
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The response envelope or its result did not have the expected shape
	#[error("Decode error: {0}")]
	DecodeError(ErrorContext),

	/// The node answered with a JSON-RPC error object
	#[error("RPC error {code}: {message}")]
	RpcError {
		code: i64,
		message: String,
		context: Box<ErrorContext>,
	},

	/// The node answered, but the answer is not acceptable
	#[error("Validation error: {0}")]
	ValidationError(ErrorContext),

	/// The embedded-asset decoder failed on a marker output
	#[error("Embedded asset error: {0}")]
	EmbeddedAssetError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockChainError {
	pub fn decode_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::DecodeError(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Node-reported error.
	///
	/// Not logged on construction since some codes are expected and recovered by
	/// the caller (an unknown transaction in a confirmation lookup).
	pub fn rpc_error(
		code: i64,
		message: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let message = message.into();
		let context = ErrorContext::new(
			format!("RPC error {}: {}", code, message),
			None,
			metadata,
		)
		.with_metadata("code", code.to_string());
		Self::RpcError {
			code,
			message,
			context: Box::new(context),
		}
	}

	pub fn validation_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn embedded_asset_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::EmbeddedAssetError(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// The node's error code, if this error came from the node
	pub fn rpc_code(&self) -> Option<i64> {
		match self {
			Self::RpcError { code, .. } => Some(*code),
			_ => None,
		}
	}

	pub fn is_rpc_code(&self, expected: i64) -> bool {
		self.rpc_code() == Some(expected)
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		match self {
			Self::Transport(err) => err.trace_id(),
			Self::DecodeError(ctx) => ctx.trace_id.clone(),
			Self::RpcError { context, .. } => context.trace_id.clone(),
			Self::ValidationError(ctx) => ctx.trace_id.clone(),
			Self::EmbeddedAssetError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
