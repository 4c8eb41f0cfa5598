//! Configuration error types.
//!
//! Errors raised while reading, resolving and validating the adapter
//! configuration. They are not logged on construction; the binary reports them
//! once at startup.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur during configuration operations
#[derive(ThisError, Debug)]
pub enum ConfigError {
	/// Errors related to validation failures
	#[error("Validation error: {0}")]
	ValidationError(ErrorContext),

	/// Errors related to parsing failures
	#[error("Parse error: {0}")]
	ParseError(ErrorContext),

	/// Errors related to file system errors
	#[error("File error: {0}")]
	FileError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ConfigError {
	/// A config value is present but not acceptable
	pub fn validation_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(ErrorContext::new(msg, source, metadata))
	}

	/// The file is not valid JSON or a secret could not be resolved
	pub fn parse_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(ErrorContext::new(msg, source, metadata))
	}

	pub fn file_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::FileError(ErrorContext::new(msg, source, metadata))
	}
}

impl ConfigError {
	fn context(&self) -> Option<&ErrorContext> {
		match self {
			Self::ValidationError(context) | Self::ParseError(context) | Self::FileError(context) => {
				Some(context)
			}
			Self::Other(_) => None,
		}
	}
}

impl TraceableError for ConfigError {
	fn trace_id(&self) -> String {
		self.context()
			.map(|context| context.trace_id.clone())
			.unwrap_or_else(|| Uuid::new_v4().to_string())
	}
}
