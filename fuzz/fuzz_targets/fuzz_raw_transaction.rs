#![no_main]

use libfuzzer_sys::fuzz_target;
use nastip_transactions::wire::pb;
use nastip_transactions::{RawTransaction, Transaction};
use prost::Message;

fuzz_target!(|data: &[u8]| {
    // Protobuf bytes straight into the validating decoder.
    if let Ok(msg) = pb::Transaction::decode(data) {
        if let Ok(tx) = Transaction::from_proto(msg) {
            let _ = tx.verify_integrity(tx.chain_id());
            let _ = Transaction::from_raw(&tx.to_raw());
        }
    }

    // The same bytes as a base64 envelope body.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Transaction::from_raw(&RawTransaction {
            data: text.to_string(),
        });
    }
});
