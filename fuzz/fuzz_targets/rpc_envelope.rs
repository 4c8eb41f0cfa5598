#![no_main]

use bitcoin_node_adapter::{
    models::{BitcoinBlock, BlockchainInfo, FeeEstimate},
    services::blockchain::into_result,
};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(envelope) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let _ = into_result::<BlockchainInfo>("getblockchaininfo", envelope.clone());
    let _ = into_result::<BitcoinBlock>("getblock", envelope.clone());
    if let Ok(estimate) = into_result::<FeeEstimate>("estimatesmartfee", envelope) {
        let _ = estimate.rate();
    }
});
