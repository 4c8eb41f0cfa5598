use crate::properties::strategies::adapter_config_strategy;

use bitcoin_node_adapter::models::{AdapterConfig, ConfigLoader};
use proptest::{prelude::*, test_runner::Config};
use rust_decimal::Decimal;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_valid_configs_pass_validation(config in adapter_config_strategy()) {
		prop_assert!(config.validate().is_ok());
	}

	#[test]
	fn test_json_roundtrip(config in adapter_config_strategy()) {
		let json = serde_json::to_string(&config).unwrap();
		let reloaded: AdapterConfig = serde_json::from_str(&json).unwrap();

		prop_assert_eq!(config, reloaded);
	}

	#[test]
	fn test_zero_limits_fail_validation(config in adapter_config_strategy(), field in 0usize..4) {
		let mut invalid = config;
		match field {
			0 => invalid.minimum_height = 0,
			1 => invalid.minimum_fee_rate = Decimal::ZERO,
			2 => invalid.request_timeout_ms = 0,
			_ => invalid.max_concurrent_requests = 0,
		}

		prop_assert!(invalid.validate().is_err());
	}

	#[test]
	fn test_non_http_schemes_fail_validation(
		config in adapter_config_strategy(),
		scheme in prop_oneof![Just("ftp"), Just("ws"), Just("file")],
	) {
		let mut invalid = config;
		invalid.rpc_url = format!("{}://bitcoin-full-node:8332", scheme);

		prop_assert!(invalid.validate().is_err());
	}
}
