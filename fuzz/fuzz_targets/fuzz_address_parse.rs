#![no_main]

use libfuzzer_sys::fuzz_target;
use nastip_crypto::{address_from_bytes, parse_address};

fuzz_target!(|data: &[u8]| {
    if let Ok(address) = address_from_bytes(data) {
        assert_eq!(parse_address(&address.to_string()), Ok(address));
    }
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(address) = parse_address(text) {
            assert_eq!(address.to_string(), text);
        }
    }
});
