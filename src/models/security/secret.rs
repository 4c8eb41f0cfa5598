//! Secret handling for node credentials.
//!
//! The RPC password never needs to live outside a [`SecretString`], which is
//! zeroized on drop. Config files can either carry the value inline or point at
//! an environment variable.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, env, fmt};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::models::security::error::{SecurityError, SecurityResult};

/// A secret as written in a config file.
///
/// ```json
/// { "type": "environment", "value": "BITCOIN_RPC_PASSWORD" }
/// ```
#[derive(Clone, Serialize, Deserialize, ZeroizeOnDrop)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
#[serde(deny_unknown_fields)]
pub enum SecretValue {
	/// A plain text secret value
	#[serde(alias = "Plain")]
	Plain(SecretString),
	/// The name of an environment variable holding the secret
	#[serde(alias = "Environment")]
	Environment(String),
}

impl SecretValue {
	/// Resolves the secret from its source.
	///
	/// # Errors
	/// Returns a `SecurityError` when the environment variable is empty or not set.
	pub fn resolve(&self) -> SecurityResult<SecretString> {
		match self {
			SecretValue::Plain(secret) => Ok(secret.clone()),
			SecretValue::Environment(env_var) => {
				if env_var.trim().is_empty() {
					return Err(Box::new(SecurityError::validation_error(
						"Environment secret must name a variable",
						None,
						None,
					)));
				}
				env::var(env_var).map(SecretString::new).map_err(|e| {
					Box::new(SecurityError::parse_error(
						"Failed to get environment variable",
						Some(e.into()),
						Some(HashMap::from([("name".to_string(), env_var.clone())])),
					))
				})
			}
		}
	}

	/// Checks if the secret reference is empty
	pub fn is_empty(&self) -> bool {
		match self {
			SecretValue::Plain(secret) => secret.as_str().is_empty(),
			SecretValue::Environment(env_var) => env_var.is_empty(),
		}
	}
}

impl PartialEq for SecretValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Plain(l0), Self::Plain(r0)) => l0 == r0,
			(Self::Environment(l0), Self::Environment(r0)) => l0 == r0,
			_ => false,
		}
	}
}

impl Zeroize for SecretValue {
	fn zeroize(&mut self) {
		match self {
			SecretValue::Plain(secret) => secret.zeroize(),
			SecretValue::Environment(env_var) => env_var.zeroize(),
		}
	}
}

impl fmt::Debug for SecretValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SecretValue::Plain(_) => write!(f, "Plain(***)"),
			SecretValue::Environment(env_var) => write!(f, "Environment({})", env_var),
		}
	}
}

/// A string that is zeroized when dropped and redacted when debug-printed.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
	pub fn new(value: String) -> Self {
		Self(value)
	}

	/// Exposes the secret. Use the reference immediately, do not store it.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString(***)")
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}
