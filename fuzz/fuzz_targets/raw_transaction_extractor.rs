#![no_main]

use bitcoin_node_adapter::{
    models::{Asset, BitcoinTransaction, Block},
    services::blockchain::{extract_transactions, NoopEmbeddedAssetDecoder},
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(transaction) = serde_json::from_slice::<BitcoinTransaction>(data) else {
        return;
    };

    let asset = Asset::bitcoin("bitcoin");
    let mut block = Block::new("00", 800_000);
    let _ = futures::executor::block_on(extract_transactions(
        &mut block,
        &transaction,
        &asset,
        &NoopEmbeddedAssetDecoder,
    ));
});
