//! Network transport implementations for blockchain clients.
//!
//! - Generic JSON-RPC over HTTP transport with basic auth

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransportClient;

use serde::Serialize;
use serde_json::{json, Value};

/// Base trait for all blockchain transport clients
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Get the URL requests are sent to
	async fn get_current_url(&self) -> String;

	/// Send a raw request to the blockchain
	///
	/// Returns the whole response envelope. A body carrying a JSON-RPC `error`
	/// object is returned as `Ok` so the client can classify it.
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Builds the JSON-RPC envelope for a request
	async fn customize_request<P>(&self, id: u64, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params.map(|p| p.into()).unwrap_or_else(|| json!([]))
		})
	}
}
