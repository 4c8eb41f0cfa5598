//! HTTP transport implementation for Bitcoin node interactions.
//!
//! Every call is a single JSON-RPC POST with basic auth. Connections are not
//! kept alive between calls, and each request is bounded by the configured
//! timeout. There are no retries at this layer.

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
	time::{SystemTime, UNIX_EPOCH},
};
use url::Url;

use crate::{
	models::{AdapterConfig, SecretString},
	services::blockchain::transports::{BlockchainTransport, TransportError},
	utils::http::create_http_client,
};

/// JSON-RPC over HTTP client for a single node
///
/// Cheap to clone; clones share the request id counter.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// HTTP client configured with the request timeout and without idle connections
	pub client: reqwest::Client,
	url: Url,
	username: String,
	password: SecretString,
	request_id: Arc<AtomicU64>,
}

impl HttpTransportClient {
	/// Creates a transport for the node described by `config`
	///
	/// No request is sent; reachability is checked by the client bootstrap.
	///
	/// # Arguments
	/// * `config` - Adapter configuration with the RPC URL, credentials and timeout
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - New transport or a configuration error
	pub fn new(config: &AdapterConfig) -> Result<Self, anyhow::Error> {
		let url = Url::parse(&config.rpc_url)
			.with_context(|| format!("Invalid RPC URL: {}", config.rpc_url))?;
		let password = config
			.rpc_password
			.resolve()
			.context("Failed to resolve RPC password")?;
		let client = create_http_client(config.request_timeout())
			.context("Failed to create HTTP client")?;

		Ok(Self::with_client(
			client,
			url,
			config.rpc_username.clone(),
			password,
		))
	}

	/// Creates a transport around an existing `reqwest` client
	pub fn with_client(
		client: reqwest::Client,
		url: Url,
		username: String,
		password: SecretString,
	) -> Self {
		// Seeding from the clock keeps ids distinct across restarts in node logs
		let seed = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|elapsed| elapsed.as_nanos() as u64)
			.unwrap_or(1);

		Self {
			client,
			url,
			username,
			password,
			request_id: Arc::new(AtomicU64::new(seed)),
		}
	}

	fn next_request_id(&self) -> u64 {
		self.request_id.fetch_add(1, Ordering::Relaxed)
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.url.to_string()
	}

	/// Sends a JSON-RPC request to the node
	///
	/// # Arguments
	/// * `method` - The JSON-RPC method name to call
	/// * `params` - Optional positional parameters
	///
	/// # Returns
	/// * `Result<Value, TransportError>` - The response envelope or a transport failure
	///
	/// Bitcoin Core answers RPC errors with a non-2xx status and a JSON body; such
	/// bodies are returned as `Ok`. Any other non-2xx response is an HTTP error.
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let id = self.next_request_id();
		let request_body = self.customize_request(id, method, params).await;
		let url = self.url.as_str();
		let metadata = || {
			Some(HashMap::from([
				("method".to_string(), method.to_string()),
				("url".to_string(), url.to_string()),
			]))
		};

		tracing::debug!(method, id, "sending RPC request");

		let response = self
			.client
			.post(self.url.clone())
			.basic_auth(&self.username, Some(self.password.as_str()))
			.json(&request_body)
			.send()
			.await
			.map_err(|e| TransportError::from_request_error(e, url))?;

		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| TransportError::from_request_error(e, url))?;

		if status.is_success() {
			return serde_json::from_str(&body).map_err(|e| {
				TransportError::response_parse(
					format!("Failed to parse JSON response for '{}'", method),
					Some(Box::new(e)),
					metadata(),
				)
			});
		}

		match serde_json::from_str::<Value>(&body) {
			Ok(envelope) if envelope.get("error").is_some_and(|error| !error.is_null()) => {
				tracing::debug!(
					method,
					status = status.as_u16(),
					"node returned an RPC error object"
				);
				Ok(envelope)
			}
			_ => {
				tracing::warn!(
					"Request '{}' to {} failed with status {}",
					method,
					url,
					status
				);
				Err(TransportError::http(
					status,
					url.to_string(),
					body,
					None,
					metadata(),
				))
			}
		}
	}
}
