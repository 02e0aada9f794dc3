//! Tip phrase parsing for public mentions.
//!
//! A tip looks like `@<bot> <verb> <amount> NAS`, for example
//! `@NebBot send 2.5 NAS`. Handle, verb and unit match case-insensitively;
//! the unit may carry trailing punctuation (`NAS!`). Anything after the unit
//! is ignored.

use nastip_types::{NasAmount, TypesError};
use thiserror::Error;

/// Words that introduce a tip.
pub const TRIGGER_VERBS: &[&str] = &[
    "send", "gift", "give", "wire", "grant", "drop", "donate", "tip",
];

/// The only accepted unit.
pub const UNIT: &str = "nas";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MentionError {
    #[error("the bot is not mentioned")]
    NotMentioned,

    #[error("no tip phrase after the mention")]
    NoTipPhrase,

    #[error("invalid amount: {0}")]
    Amount(TypesError),

    #[error("amount must be greater than zero")]
    ZeroAmount,
}

/// Extract the tipped amount from a mention of `bot_handle`.
///
/// `bot_handle` is given without the leading `@`.
pub fn parse_mention(text: &str, bot_handle: &str) -> Result<NasAmount, MentionError> {
    let tag = format!("@{}", bot_handle.to_lowercase());
    let lowered = text.to_lowercase();

    // Only the first tip phrase after any occurrence of the handle counts.
    let mut last_error = MentionError::NotMentioned;
    for (start, _) in lowered.match_indices(&tag) {
        let rest = &lowered[start + tag.len()..];
        // `@NebBotFan` is not `@NebBot`.
        if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
            continue;
        }
        match parse_phrase(rest) {
            Ok(amount) => return Ok(amount),
            Err(e) => last_error = e,
        }
    }
    Err(last_error)
}

fn parse_phrase(rest: &str) -> Result<NasAmount, MentionError> {
    let mut words = rest.split_whitespace();
    let verb = words.next().ok_or(MentionError::NoTipPhrase)?;
    if !TRIGGER_VERBS.contains(&verb) {
        return Err(MentionError::NoTipPhrase);
    }
    let amount = words.next().ok_or(MentionError::NoTipPhrase)?;
    let unit = words.next().ok_or(MentionError::NoTipPhrase)?;
    if unit.trim_end_matches(|c: char| c.is_ascii_punctuation()) != UNIT {
        return Err(MentionError::NoTipPhrase);
    }

    let amount = NasAmount::parse_nas(amount).map_err(MentionError::Amount)?;
    if amount.is_zero() {
        return Err(MentionError::ZeroAmount);
    }
    Ok(amount)
}
