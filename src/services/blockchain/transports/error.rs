//! Error types for blockchain transport services
//!
//! Covers everything that can go wrong between sending a JSON-RPC request and
//! holding a parsed response body. Errors reported by the node inside a
//! well-formed body are not transport errors.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
	/// Non-2xx response without a JSON-RPC error object
	#[error("HTTP error: status {status_code} for URL {url}")]
	Http {
		status_code: reqwest::StatusCode,
		url: String,
		body: String,
		context: ErrorContext,
	},

	/// Connection refused, reset or DNS failure
	#[error("Network error: {0}")]
	Network(ErrorContext),

	/// A 2xx body that is not JSON
	#[error("Failed to parse JSON response: {0}")]
	ResponseParse(ErrorContext),

	/// The node did not answer within the configured timeout
	#[error("Request timed out: {0}")]
	Timeout(ErrorContext),
}

type Source = Option<Box<dyn std::error::Error + Send + Sync + 'static>>;

impl TransportError {
	pub fn http(
		status_code: reqwest::StatusCode,
		url: String,
		body: String,
		source: Source,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = ErrorContext::new_with_log(
			format!("HTTP error: status {} for URL {}", status_code, url),
			source,
			metadata,
		);

		Self::Http {
			status_code,
			url,
			body,
			context,
		}
	}

	pub fn network(
		msg: impl Into<String>,
		source: Source,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Network(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn response_parse(
		msg: impl Into<String>,
		source: Source,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParse(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn timeout(
		msg: impl Into<String>,
		source: Source,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Timeout(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Maps a `reqwest` send failure to a timeout or network error
	pub fn from_request_error(err: reqwest::Error, url: &str) -> Self {
		let metadata = Some(HashMap::from([("url".to_string(), url.to_string())]));
		if err.is_timeout() {
			Self::timeout(
				format!("no response from {}", url),
				Some(Box::new(err)),
				metadata,
			)
		} else {
			Self::network(
				format!("failed to send request to {}", url),
				Some(Box::new(err)),
				metadata,
			)
		}
	}

	fn context(&self) -> &ErrorContext {
		match self {
			Self::Http { context, .. } => context,
			Self::Network(context) | Self::ResponseParse(context) | Self::Timeout(context) => {
				context
			}
		}
	}
}

impl TraceableError for TransportError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
