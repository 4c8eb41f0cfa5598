//! Error context shared by every error type in the adapter.
//!
//! [`ErrorContext`] carries a message, an optional source, optional key/value
//! metadata, an RFC 3339 timestamp and a trace id. Trace ids are inherited from
//! the source chain when one of the adapter's own errors is wrapped, so a single
//! failing RPC call can be followed from the transport up to the caller.

use chrono::Utc;
use std::{collections::HashMap, fmt};
use uuid::Uuid;

/// A context wrapper for errors with additional metadata.
#[derive(Debug)]
pub struct ErrorContext {
	/// The error message
	pub message: String,
	/// The source error that caused this error
	pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
	/// Additional metadata about the error
	pub metadata: Option<HashMap<String, String>>,
	/// The timestamp of the error in RFC 3339 format
	pub timestamp: String,
	/// The unique identifier for the error (UUID v4)
	pub trace_id: String,
}

impl ErrorContext {
	/// Creates a new error context without logging it.
	///
	/// The trace id is taken from `source` when the source (or something in its
	/// chain) already carries one, otherwise a fresh UUID is generated.
	pub fn new(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let trace_id = match source {
			Some(ref src) => TraceableError::trace_id(src.as_ref()),
			None => Uuid::new_v4().to_string(),
		};

		Self {
			message: message.into(),
			source,
			metadata,
			timestamp: Utc::now().to_rfc3339(),
			trace_id,
		}
	}

	/// Creates a new error context and emits it as a structured `error` event.
	pub fn new_with_log(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let error_context = Self::new(message, source, metadata);
		log_error(&error_context);
		error_context
	}

	/// Adds a single key-value metadata pair to the error context.
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		let metadata = self.metadata.get_or_insert_with(HashMap::new);
		metadata.insert(key.into(), value.into());
		self
	}

	/// Formats the message as `"message [key1=value1, key2=value2]"`, keys sorted.
	pub fn format_with_metadata(&self) -> String {
		let Some(metadata) = self.metadata.as_ref().filter(|metadata| !metadata.is_empty()) else {
			return self.message.clone();
		};

		let mut pairs: Vec<_> = metadata.iter().collect();
		pairs.sort_unstable_by(|(left, _), (right, _)| left.cmp(right));

		let pairs = pairs
			.into_iter()
			.map(|(key, value)| format!("{}={}", key, value))
			.collect::<Vec<_>>()
			.join(", ");

		format!("{} [{}]", self.message, pairs)
	}
}

impl fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_with_metadata())
	}
}

impl std::error::Error for ErrorContext {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_ref()
			.map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
	}
}

/// A trait for errors that can provide a trace ID
pub trait TraceableError: std::error::Error + Send + Sync {
	/// Returns the trace ID for this error
	fn trace_id(&self) -> String;
}

/// How far down a source chain to look for an inherited trace id
const MAX_SOURCE_DEPTH: usize = 3;

impl TraceableError for dyn std::error::Error + Send + Sync + 'static {
	fn trace_id(&self) -> String {
		let root: &(dyn std::error::Error + 'static) = self;

		std::iter::successors(Some(root), |err| err.source())
			.take(MAX_SOURCE_DEPTH + 1)
			.find_map(known_trace_id)
			.unwrap_or_else(|| Uuid::new_v4().to_string())
	}
}

/// Trace id of `err` if it is one of the adapter's own error types
fn known_trace_id(err: &(dyn std::error::Error + 'static)) -> Option<String> {
	use crate::{
		models::{ConfigError, SecurityError},
		services::blockchain::{BlockChainError, TransportError},
	};

	if let Some(context) = err.downcast_ref::<ErrorContext>() {
		return Some(context.trace_id.clone());
	}

	err.downcast_ref::<BlockChainError>()
		.map(TraceableError::trace_id)
		.or_else(|| err.downcast_ref::<TransportError>().map(TraceableError::trace_id))
		.or_else(|| err.downcast_ref::<ConfigError>().map(TraceableError::trace_id))
		.or_else(|| err.downcast_ref::<SecurityError>().map(TraceableError::trace_id))
}

/// Drops HTML bodies that reverse proxies in front of the node append to error messages.
fn sanitize_error_message(message: &str) -> String {
	let has_markup = ["<html>", "<head>", "<body>"]
		.iter()
		.any(|tag| message.contains(tag));

	match message.find('<') {
		Some(position) if has_markup => message[..position].trim().to_string(),
		_ => message.to_string(),
	}
}

fn format_error_chain(err: &(dyn std::error::Error + 'static)) -> String {
	std::iter::successors(Some(err), |err| err.source())
		.map(|err| sanitize_error_message(&err.to_string()))
		.collect::<Vec<_>>()
		.join("\n\tCaused by: ")
}

fn log_error(error: &ErrorContext) {
	match &error.source {
		Some(err) => tracing::error!(
			message = error.format_with_metadata(),
			trace_id = %error.trace_id,
			timestamp = %error.timestamp,
			error.chain = %format_error_chain(&**err),
			"Error occurred"
		),
		None => tracing::error!(
			message = error.format_with_metadata(),
			trace_id = %error.trace_id,
			timestamp = %error.timestamp,
			"Error occurred"
		),
	}
}
