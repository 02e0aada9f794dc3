#![no_main]

use libfuzzer_sys::fuzz_target;
use nastip_bot::commands::{parse_command, parse_confirmation};
use nastip_bot::mention::parse_mention;

fuzz_target!(|text: &str| {
    if let Ok(amount) = parse_mention(text, "NebBot") {
        assert!(!amount.is_zero());
    }
    let _ = parse_confirmation(text);
    let _ = parse_command(text);
});
