use std::time::Duration;

/// Upper bound for establishing the TCP/TLS connection, capped by the request timeout
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Creates the HTTP client used for node RPC calls
///
/// # Parameters:
/// - `timeout`: Total time allowed for one request, connect included
///
/// # Returns
/// A `reqwest::Client` that keeps no idle connections, so every call opens its own
pub fn create_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
	reqwest::ClientBuilder::new()
		.pool_max_idle_per_host(0)
		.timeout(timeout)
		.connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
		.build()
}
