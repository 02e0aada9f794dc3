//! NAS amounts.
//!
//! Amounts are fixed-point integers in wei (1 NAS = 10^18 wei), stored as
//! `u128` like every value field of a Nebulas transaction. Decimal text is
//! converted exactly; floating point is never involved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Number of decimal places between NAS and wei.
pub const NAS_DECIMALS: u32 = 18;

/// Wei per NAS.
pub const WEI_PER_NAS: u128 = 1_000_000_000_000_000_000;

/// An amount of NAS, stored in wei.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NasAmount(u128);

impl NasAmount {
    pub const ZERO: Self = Self(0);

    pub fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    pub fn from_nas(nas: u64) -> Self {
        Self(nas as u128 * WEI_PER_NAS)
    }

    pub fn wei(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal NAS quantity such as `"2.5"`, `"10"` or `".01"`.
    pub fn parse_nas(text: &str) -> Result<Self, TypesError> {
        let s = text.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(TypesError::InvalidAmount(text.to_string()));
        }
        if frac.len() > NAS_DECIMALS as usize {
            return Err(TypesError::AmountPrecision(text.to_string()));
        }

        let overflow = || TypesError::AmountOverflow(text.to_string());

        let whole_wei = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .map_err(|_| overflow())?
                .checked_mul(WEI_PER_NAS)
                .ok_or_else(overflow)?
        };

        let frac_wei = if frac.is_empty() {
            0
        } else {
            let scale = 10u128.pow(NAS_DECIMALS - frac.len() as u32);
            frac.parse::<u128>().map_err(|_| overflow())? * scale
        };

        whole_wei
            .checked_add(frac_wei)
            .map(Self)
            .ok_or_else(overflow)
    }
}

impl FromStr for NasAmount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_nas(s)
    }
}

impl fmt::Display for NasAmount {
    /// Shortest exact decimal form in NAS, e.g. `2.5`, `10`, `0.000001`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WEI_PER_NAS;
        let frac = self.0 % WEI_PER_NAS;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{:018}", frac);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}
