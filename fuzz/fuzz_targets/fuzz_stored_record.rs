#![no_main]

use libfuzzer_sys::fuzz_target;
use nastip_crypto::KeyCipher;
use nastip_vault::contract::decode_stored_record;

fuzz_target!(|text: &str| {
    let cipher = KeyCipher::new(b"0123456789abcdef").expect("16-byte secret");
    if let Ok(Some(record)) = decode_stored_record(text) {
        let _ = record.open(&cipher);
    }
    let _ = cipher.decrypt(text);
});
