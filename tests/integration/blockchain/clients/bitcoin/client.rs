use crate::integration::mocks::{
	rpc_failure, rpc_result, MockBitcoinTransportClient, MockEmbeddedAssetDecoder,
};
use bitcoin_node_adapter::{
	models::{AdapterConfig, Asset, Block, BlockIdentifier, Transaction},
	services::blockchain::{
		output_hash, BitcoinClient, BitcoinClientTrait, BlockChainClient, BlockChainError,
		TransportError,
	},
	utils::tests::builders::{
		bitcoin::transaction::TransactionBuilder, config::AdapterConfigBuilder,
	},
};
use mockall::predicate;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::{str::FromStr, sync::Arc};

const BLOCK_HASH: &str = "00000000000000000002a7c4c1e48d76c5a37902165a270156b7a8d72728a054";
const HEIGHT: u64 = 800_000;
const RECEIVER: &str = "1BoatSLRHtKNngkdXEeobR76b53LETtpyT";

fn txid(index: usize) -> String {
	format!("{:064x}", index + 1)
}

fn expect_rpc(
	transport: &mut MockBitcoinTransportClient,
	method: &'static str,
	params: Value,
	response: Value,
) {
	transport
		.expect_send_raw_request()
		.with(predicate::eq(method), predicate::eq(Some(params)))
		.times(1)
		.returning(move |_, _| Ok(response.clone()));
}

fn expect_blockchain_info(transport: &mut MockBitcoinTransportClient, blocks: u64) {
	expect_rpc(
		transport,
		"getblockchaininfo",
		json!([]),
		rpc_result(json!({
			"chain": "main",
			"blocks": blocks,
			"headers": blocks,
			"bestblockhash": BLOCK_HASH,
			"initialblockdownload": false
		})),
	);
}

fn expect_block(transport: &mut MockBitcoinTransportClient, txids: &[String]) {
	expect_rpc(
		transport,
		"getblock",
		json!([BLOCK_HASH]),
		rpc_result(json!({
			"hash": BLOCK_HASH,
			"confirmations": 1,
			"height": HEIGHT,
			"tx": txids,
			"nTx": txids.len()
		})),
	);
}

fn expect_raw_transaction(
	transport: &mut MockBitcoinTransportClient,
	transaction: &bitcoin_node_adapter::models::BitcoinTransaction,
) {
	expect_rpc(
		transport,
		"getrawtransaction",
		json!([transaction.txid, 1]),
		rpc_result(serde_json::to_value(transaction).unwrap()),
	);
}

fn create_client(transport: MockBitcoinTransportClient) -> BitcoinClient<MockBitcoinTransportClient> {
	BitcoinClient::new_with_transport(transport, &AdapterConfigBuilder::new().build())
}

fn create_client_with_config(
	transport: MockBitcoinTransportClient,
	config: &AdapterConfig,
) -> BitcoinClient<MockBitcoinTransportClient> {
	BitcoinClient::new_with_transport(transport, config)
}

fn embedded_transfer(block: &Block, transaction_id: &str, output_index: u32) -> Transaction {
	Transaction {
		asset: Asset {
			chain_id: "bitcoin".to_string(),
			asset_id: "omni-31".to_string(),
			chain_asset_key: "31".to_string(),
			symbol: "USDT".to_string(),
			name: "TetherUS".to_string(),
			precision: 8,
		},
		transaction_hash: transaction_id.to_string(),
		sender: "1Po1oWkD2LmodfkBYiAktwh76vkF93LKnh".to_string(),
		receiver: RECEIVER.to_string(),
		memo: None,
		block_hash: block.hash.clone(),
		block_height: block.height,
		output_index,
		output_hash: output_hash(transaction_id, output_index),
		confirmations: 1,
		amount: Decimal::from(10),
	}
}

#[tokio::test]
async fn test_get_latest_block_number() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_blockchain_info(&mut transport, HEIGHT);

	let client = create_client(transport);
	let height = client.get_latest_block_number().await.unwrap();

	assert_eq!(height, HEIGHT);
}

#[tokio::test]
async fn test_get_latest_block_number_below_minimum_height() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_blockchain_info(&mut transport, 99_999);

	let client = create_client(transport);
	let result = client.get_latest_block_number().await;

	match result {
		Err(BlockChainError::ValidationError(context)) => {
			assert!(context.message.contains("below the minimum height"));
		}
		other => panic!("Expected ValidationError, got {:?}", other),
	}
}

#[tokio::test]
async fn test_get_latest_block_number_at_minimum_height() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_blockchain_info(&mut transport, 100_000);

	let client = create_client(transport);
	assert_eq!(client.get_latest_block_number().await.unwrap(), 100_000);
}

#[tokio::test]
async fn test_bootstrap_propagates_transport_errors() {
	let mut transport = MockBitcoinTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(predicate::eq("getblockchaininfo"), predicate::always())
		.times(1)
		.returning(|_, _| {
			Err(TransportError::network(
				"connection refused",
				None,
				None,
			))
		});

	let result = create_client(transport).bootstrap().await;

	assert!(matches!(
		result,
		Err(BlockChainError::Transport(TransportError::Network(_)))
	));
}

#[tokio::test]
async fn test_bootstrap_propagates_node_errors() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_rpc(
		&mut transport,
		"getblockchaininfo",
		json!([]),
		rpc_failure(-28, "Loading block index..."),
	);

	let result = create_client(transport).bootstrap().await;

	match result {
		Err(BlockChainError::RpcError { code, message, .. }) => {
			assert_eq!(code, -28);
			assert_eq!(message, "Loading block index...");
		}
		Err(other) => panic!("Expected RpcError, got {:?}", other),
		Ok(_) => panic!("Expected bootstrap to fail"),
	}
}

#[tokio::test]
async fn test_get_block_by_height_extracts_payment() {
	let coinbase = TransactionBuilder::new()
		.txid(&txid(0))
		.block_hash(BLOCK_HASH)
		.confirmations(3)
		.coinbase_input()
		.payment_output("0.5", RECEIVER)
		.null_data_output("6a24aa21a9ed0000000000000000000000000000000000000000000000000000000000000000")
		.build();

	let mut transport = MockBitcoinTransportClient::new();
	expect_rpc(
		&mut transport,
		"getblockhash",
		json!([HEIGHT]),
		rpc_result(json!(BLOCK_HASH)),
	);
	expect_block(&mut transport, &[coinbase.txid.clone()]);
	expect_raw_transaction(&mut transport, &coinbase);

	let client = create_client(transport);
	let block = client.get_block_by_height(HEIGHT).await.unwrap();

	assert_eq!(block.hash, BLOCK_HASH);
	assert_eq!(block.height, HEIGHT);
	assert_eq!(block.transactions.len(), 1);

	let record = &block.transactions[0];
	assert_eq!(record.transaction_hash, coinbase.txid);
	assert_eq!(record.receiver, RECEIVER);
	assert_eq!(record.sender, "");
	assert_eq!(record.memo, None);
	assert_eq!(record.amount, Decimal::from_str("0.5").unwrap());
	assert_eq!(record.output_index, 0);
	assert_eq!(record.output_hash, output_hash(&coinbase.txid, 0));
	assert_eq!(record.confirmations, 3);
	assert_eq!(record.asset, client.asset().clone());
	assert_eq!(record.asset.symbol, "BTC");
}

#[tokio::test]
async fn test_get_block_dispatches_on_identifier() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_block(&mut transport, &[]);

	let client = create_client(transport);
	let block = client
		.get_block(&BlockIdentifier::Hash(BLOCK_HASH.to_string()))
		.await
		.unwrap();

	assert_eq!(block.hash, BLOCK_HASH);
	assert!(block.transactions.is_empty());
}

#[tokio::test]
async fn test_get_block_preserves_node_order_with_concurrent_lookups() {
	let transactions: Vec<_> = (0..6)
		.map(|index| {
			TransactionBuilder::new()
				.txid(&txid(index))
				.payment_output("0.1", RECEIVER)
				.payment_output("0.2", "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy")
				.build()
		})
		.collect();
	let txids: Vec<String> = transactions.iter().map(|tx| tx.txid.clone()).collect();

	let mut transport = MockBitcoinTransportClient::new();
	expect_block(&mut transport, &txids);
	for transaction in &transactions {
		expect_raw_transaction(&mut transport, transaction);
	}

	let config = AdapterConfigBuilder::new().max_concurrent_requests(3).build();
	let client = create_client_with_config(transport, &config);
	let block = client.get_block_by_hash(BLOCK_HASH).await.unwrap();

	let order: Vec<(String, u32)> = block
		.transactions
		.iter()
		.map(|record| (record.transaction_hash.clone(), record.output_index))
		.collect();
	let expected: Vec<(String, u32)> = txids
		.iter()
		.flat_map(|txid| [(txid.clone(), 0), (txid.clone(), 1)])
		.collect();
	assert_eq!(order, expected);
}

#[tokio::test]
async fn test_get_block_records_reference_their_block() {
	let transactions: Vec<_> = (0..3)
		.map(|index| {
			TransactionBuilder::new()
				.txid(&txid(index))
				.payment_output("1.25", RECEIVER)
				.build()
		})
		.collect();
	let txids: Vec<String> = transactions.iter().map(|tx| tx.txid.clone()).collect();

	let mut transport = MockBitcoinTransportClient::new();
	expect_block(&mut transport, &txids);
	for transaction in &transactions {
		expect_raw_transaction(&mut transport, transaction);
	}

	let block = create_client(transport)
		.get_block_by_hash(BLOCK_HASH)
		.await
		.unwrap();

	assert_eq!(block.transactions.len(), 3);
	for record in &block.transactions {
		assert_eq!(record.block_hash, block.hash);
		assert_eq!(record.block_height, block.height);
		assert_eq!(
			record.output_hash,
			output_hash(&record.transaction_hash, record.output_index)
		);
	}
}

#[tokio::test]
async fn test_get_block_twice_yields_identical_blocks() {
	let transactions: Vec<_> = (0..4)
		.map(|index| {
			TransactionBuilder::new()
				.txid(&txid(index))
				.payment_output("0.3", RECEIVER)
				.null_data_output("6a0b68656c6c6f20776f726c64")
				.payment_output("0.7", "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy")
				.build()
		})
		.collect();
	let txids: Vec<String> = transactions.iter().map(|tx| tx.txid.clone()).collect();

	let header = rpc_result(json!({
		"hash": BLOCK_HASH,
		"confirmations": 1,
		"height": HEIGHT,
		"tx": txids,
		"nTx": txids.len()
	}));

	let mut transport = MockBitcoinTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(predicate::eq("getblock"), predicate::eq(Some(json!([BLOCK_HASH]))))
		.times(2)
		.returning(move |_, _| Ok(header.clone()));
	for transaction in &transactions {
		let response = rpc_result(serde_json::to_value(transaction).unwrap());
		transport
			.expect_send_raw_request()
			.with(
				predicate::eq("getrawtransaction"),
				predicate::eq(Some(json!([transaction.txid, 1]))),
			)
			.times(2)
			.returning(move |_, _| Ok(response.clone()));
	}

	let config = AdapterConfigBuilder::new().max_concurrent_requests(2).build();
	let client = create_client_with_config(transport, &config);
	let first = client.get_block_by_hash(BLOCK_HASH).await.unwrap();
	let second = client.get_block_by_hash(BLOCK_HASH).await.unwrap();

	assert_eq!(first, second);
	assert_eq!(first.transactions.len(), 8);
	let hashes: Vec<&str> = first
		.transactions
		.iter()
		.map(|record| record.output_hash.as_str())
		.collect();
	let expected: Vec<String> = txids
		.iter()
		.flat_map(|txid| [output_hash(txid, 0), output_hash(txid, 2)])
		.collect();
	assert_eq!(hashes, expected);
}

#[tokio::test]
async fn test_marker_output_is_routed_to_decoder_once() {
	let transaction = TransactionBuilder::new()
		.txid(&txid(7))
		.payment_output("0.00000546", RECEIVER)
		.marker_output()
		.build();
	let transaction_id = transaction.txid.clone();

	let mut transport = MockBitcoinTransportClient::new();
	expect_block(&mut transport, &[transaction_id.clone()]);
	expect_raw_transaction(&mut transport, &transaction);

	let mut decoder = MockEmbeddedAssetDecoder::new();
	let expected_id = transaction_id.clone();
	decoder
		.expect_decode()
		.withf(move |block, transaction_id, output_index| {
			// The payment extracted before the marker is already on the block
			block.transactions.len() == 1 && transaction_id == expected_id && *output_index == 1
		})
		.times(1)
		.returning(|block, transaction_id, output_index| {
			Ok(Some(embedded_transfer(block, transaction_id, output_index)))
		});

	let client = create_client(transport).with_embedded_asset_decoder(Arc::new(decoder));
	let block = client.get_block_by_hash(BLOCK_HASH).await.unwrap();

	assert_eq!(block.transactions.len(), 2);
	assert_eq!(block.transactions[0].asset.symbol, "BTC");
	assert_eq!(block.transactions[0].amount, Decimal::from_str("0.00000546").unwrap());
	assert_eq!(block.transactions[1].asset.symbol, "USDT");
	assert_eq!(block.transactions[1].output_index, 1);
}

#[tokio::test]
async fn test_near_miss_marker_is_not_routed_to_decoder() {
	let transaction = TransactionBuilder::new()
		.txid(&txid(8))
		.null_data_output("6a146f6d6e6900000000000000010000000000000a")
		.null_data_output("6a146f6d6e6a0000000000000001000000000000000a")
		.build();

	let mut transport = MockBitcoinTransportClient::new();
	expect_block(&mut transport, &[transaction.txid.clone()]);
	expect_raw_transaction(&mut transport, &transaction);

	let mut decoder = MockEmbeddedAssetDecoder::new();
	decoder.expect_decode().times(0);

	let client = create_client(transport).with_embedded_asset_decoder(Arc::new(decoder));
	let block = client.get_block_by_hash(BLOCK_HASH).await.unwrap();

	assert!(block.transactions.is_empty());
}

#[tokio::test]
async fn test_decoder_failure_aborts_block() {
	let transaction = TransactionBuilder::new()
		.txid(&txid(9))
		.marker_output()
		.build();

	let mut transport = MockBitcoinTransportClient::new();
	expect_block(&mut transport, &[transaction.txid.clone()]);
	expect_raw_transaction(&mut transport, &transaction);

	let mut decoder = MockEmbeddedAssetDecoder::new();
	decoder
		.expect_decode()
		.times(1)
		.returning(|_, _, _| Err(anyhow::anyhow!("malformed payload")));

	let client = create_client(transport).with_embedded_asset_decoder(Arc::new(decoder));
	let result = client.get_block_by_hash(BLOCK_HASH).await;

	assert!(matches!(result, Err(BlockChainError::EmbeddedAssetError(_))));
}

#[tokio::test]
async fn test_failed_transaction_lookup_aborts_block() {
	let first = TransactionBuilder::new()
		.txid(&txid(0))
		.payment_output("0.5", RECEIVER)
		.build();

	let mut transport = MockBitcoinTransportClient::new();
	expect_block(&mut transport, &[first.txid.clone(), txid(1)]);
	expect_raw_transaction(&mut transport, &first);
	expect_rpc(
		&mut transport,
		"getrawtransaction",
		json!([txid(1), 1]),
		rpc_failure(-5, "No such mempool or blockchain transaction"),
	);

	let config = AdapterConfigBuilder::new().max_concurrent_requests(1).build();
	let result = create_client_with_config(transport, &config)
		.get_block_by_hash(BLOCK_HASH)
		.await;

	match result {
		Err(error) => assert_eq!(error.rpc_code(), Some(-5)),
		Ok(block) => panic!("Expected an error, got {:?}", block),
	}
}

#[tokio::test]
async fn test_estimate_fee_applies_floor() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_rpc(
		&mut transport,
		"estimatesmartfee",
		json!([2]),
		rpc_result(json!({"feerate": 0.00002, "blocks": 2})),
	);

	let fee = create_client(transport).estimate_fee().await.unwrap();

	assert_eq!(fee, Decimal::from_str("0.0001").unwrap());
}

#[tokio::test]
async fn test_estimate_fee_doubles_quote() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_rpc(
		&mut transport,
		"estimatesmartfee",
		json!([2]),
		rpc_result(json!({"feerate": 0.00009, "blocks": 2})),
	);

	let fee = create_client(transport).estimate_fee().await.unwrap();

	assert_eq!(fee, Decimal::from_str("0.00018").unwrap());
}

#[tokio::test]
async fn test_estimate_fee_without_rate() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_rpc(
		&mut transport,
		"estimatesmartfee",
		json!([2]),
		rpc_result(json!({"errors": ["Insufficient data or no feerate found"], "blocks": 0})),
	);

	let result = create_client(transport).estimate_fee().await;

	assert!(matches!(result, Err(BlockChainError::ValidationError(_))));
}

#[tokio::test]
async fn test_get_confirmations() {
	let transaction = TransactionBuilder::new()
		.txid(&txid(0))
		.confirmations(6)
		.build();

	let mut transport = MockBitcoinTransportClient::new();
	expect_raw_transaction(&mut transport, &transaction);

	let confirmations = create_client(transport)
		.get_confirmations(&transaction.txid)
		.await
		.unwrap();

	assert_eq!(confirmations, 6);
}

#[tokio::test]
async fn test_get_confirmations_of_mempool_transaction() {
	let mut transport = MockBitcoinTransportClient::new();
	// Mempool entries carry no confirmations field
	expect_rpc(
		&mut transport,
		"getrawtransaction",
		json!([txid(0), 1]),
		rpc_result(json!({"txid": txid(0), "vin": [], "vout": []})),
	);

	let confirmations = create_client(transport)
		.get_confirmations(&txid(0))
		.await
		.unwrap();

	assert_eq!(confirmations, 0);
}

#[tokio::test]
async fn test_get_confirmations_of_unknown_transaction() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_rpc(
		&mut transport,
		"getrawtransaction",
		json!([txid(0), 1]),
		rpc_failure(-5, "No such mempool or blockchain transaction"),
	);

	let confirmations = create_client(transport)
		.get_confirmations(&txid(0))
		.await
		.unwrap();

	assert_eq!(confirmations, 0);
}

#[tokio::test]
async fn test_get_confirmations_propagates_other_rpc_errors() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_rpc(
		&mut transport,
		"getrawtransaction",
		json!(["zz", 1]),
		rpc_failure(-8, "parameter 1 must be hexadecimal string"),
	);

	let result = create_client(transport).get_confirmations("zz").await;

	match result {
		Err(BlockChainError::RpcError { code, message, .. }) => {
			assert_eq!(code, -8);
			assert!(message.contains("hexadecimal"));
		}
		other => panic!("Expected RpcError, got {:?}", other),
	}
}

#[tokio::test]
async fn test_send_raw_transaction() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_rpc(
		&mut transport,
		"sendrawtransaction",
		json!(["0200000001abcdef"]),
		rpc_result(json!(txid(4))),
	);

	let transaction_id = create_client(transport)
		.send_raw_transaction("0200000001abcdef")
		.await
		.unwrap();

	assert_eq!(transaction_id, txid(4));
}

#[tokio::test]
async fn test_send_raw_transaction_rejects_non_hex_input() {
	let transport = MockBitcoinTransportClient::new();
	let client = create_client(transport);

	for raw in ["", "not-hex", "abc"] {
		let result = client.send_raw_transaction(raw).await;
		assert!(
			matches!(result, Err(BlockChainError::ValidationError(_))),
			"{:?} should be rejected",
			raw
		);
	}
}

#[tokio::test]
async fn test_send_raw_transaction_propagates_node_rejection() {
	let mut transport = MockBitcoinTransportClient::new();
	expect_rpc(
		&mut transport,
		"sendrawtransaction",
		json!(["0200000001abcdef"]),
		rpc_failure(-27, "Transaction already in block chain"),
	);

	let result = create_client(transport)
		.send_raw_transaction("0200000001abcdef")
		.await;

	assert!(matches!(result, Err(ref error) if error.is_rpc_code(-27)));
}
