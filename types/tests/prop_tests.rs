use proptest::prelude::*;

use nastip_types::{ChainId, NasAmount, Timestamp, TxHash, UserId};

proptest! {
    /// TxHash roundtrip: new -> as_bytes -> new produces identical hash.
    #[test]
    fn tx_hash_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        prop_assert_eq!(hash.as_bytes(), &bytes);
        prop_assert_eq!(TxHash::from_slice(&bytes), Some(hash));
    }

    /// TxHash::is_zero is true only for all-zero bytes.
    #[test]
    fn tx_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Display of a NAS amount parses back to the same number of wei.
    #[test]
    fn nas_amount_display_parses_back(wei in 0u128..u128::MAX / 2) {
        let amount = NasAmount::from_wei(wei);
        let parsed = NasAmount::parse_nas(&amount.to_string()).unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// Whole-number amounts are exact multiples of 10^18 wei.
    #[test]
    fn whole_nas_is_exact(n in 0u64..1_000_000_000) {
        let parsed = NasAmount::parse_nas(&n.to_string()).unwrap();
        prop_assert_eq!(parsed.wei(), n as u128 * 1_000_000_000_000_000_000);
    }

    /// Non-zero user IDs parse from their decimal form.
    #[test]
    fn user_id_parses(id in 1u64..u64::MAX) {
        let parsed: UserId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, UserId(id));
    }

    /// Numeric chain IDs parse to themselves.
    #[test]
    fn chain_id_parses_numbers(id in 0u32..u32::MAX) {
        let parsed: ChainId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, ChainId(id));
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in i64::MIN..i64::MAX, b in i64::MIN..i64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }
}

#[test]
fn zero_user_id_is_rejected() {
    assert!("0".parse::<UserId>().is_err());
}
