//! Direct-message parsing: confirmation replies and commands.

use nastip_crypto::parse_address;
use nastip_types::{Address, NasAmount};

use crate::error::BotError;

/// A reply to a pending confirmation prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    Yes,
    No,
}

/// Interpret a DM as a confirmation reply.
///
/// Only very short messages qualify: the raw text must be 2 to 4 bytes long
/// before trimming, so "yes", "no" and "YES\n" match but "yes please" does
/// not.
pub fn parse_confirmation(text: &str) -> Option<Response> {
    if !(2..=4).contains(&text.len()) {
        return None;
    }
    match text.trim().to_lowercase().as_str() {
        "yes" => Some(Response::Yes),
        "no" => Some(Response::No),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Show the sender's deposit address, creating it if needed.
    Address,
    /// Show the sender's address and balance.
    Balance,
    /// `transfer` without arguments.
    TransferUsage,
    /// Withdraw to an arbitrary address, no confirmation step.
    Transfer { to: Address, amount: NasAmount },
    Unknown,
}

/// Parse a DM that is not a confirmation reply.
///
/// A `transfer` with a malformed address or amount is an error, reported to
/// the sender before anything touches the network.
pub fn parse_command(text: &str) -> Result<Command, BotError> {
    let mut words = text.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Unknown);
    };
    let args: Vec<&str> = words.collect();

    let command = match (head.to_lowercase().as_str(), args.as_slice()) {
        ("help", []) => Command::Help,
        ("address", []) => Command::Address,
        ("balance", []) => Command::Balance,
        ("transfer", [to, amount]) => parse_transfer(to, amount)?,
        ("transfer", _) => Command::TransferUsage,
        _ => Command::Unknown,
    };
    Ok(command)
}

fn parse_transfer(to: &str, amount: &str) -> Result<Command, BotError> {
    // Base58 is case-sensitive; the address keeps the sender's casing.
    let to = parse_address(to).map_err(BotError::InvalidAddress)?;
    let amount = NasAmount::parse_nas(amount).map_err(BotError::InvalidAmount)?;
    if amount.is_zero() {
        return Err(BotError::ZeroAmount);
    }
    Ok(Command::Transfer { to, amount })
}
