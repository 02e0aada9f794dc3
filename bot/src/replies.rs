//! User-facing message texts.

use nastip_types::{Address, NasAmount, TxHash};
use rand::seq::SliceRandom;

use crate::error::BotError;

pub const HELP: &str = "Available commands: help, address, balance, transfer";

pub const TRANSFER_USAGE: &str =
    r#"To transfer NAS to another address, type "transfer your_address_here amount""#;

pub const STARTING: &str = "Starting transaction...";

pub const CANCELED: &str = "Transaction not sent.";

pub const TIMED_OUT: &str = "TIMEOUT: Defaulted to NO. Transaction not sent.";

pub const NO_ACCOUNT: &str =
    "You don't have a NAS address yet. Send me \"address\" to create one.";

pub const ALREADY_PENDING: &str =
    "You already have a tip waiting for confirmation. Reply yes or no to it first.";

/// Opening phrases for public acknowledgments.
pub const REACTIONS: &[&str] = &[
    "How wonderful!",
    "Awesome,",
    "Now that's generous,",
    "Rock on!",
    "Marvelous,",
    "The one and only",
    "Really? Really.",
    "Wow,",
];

pub fn reaction() -> &'static str {
    REACTIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Wow,")
}

pub fn confirmation_prompt(amount: NasAmount, recipient_handle: &str) -> String {
    format!("CONFIRMATION: Send {amount} NAS to @{recipient_handle}? (yes/NO)")
}

pub fn your_address(address: &Address) -> String {
    format!("Your NAS address is: {address}")
}

pub fn your_balance(address: &Address, balance: NasAmount) -> String {
    format!("Your NAS address is: {address}\nBalance: {balance} NAS")
}

pub fn transaction_sent(hash: &TxHash, explorer: &str) -> String {
    format!("Transaction sent. TX: {hash}\nView your pending transactions at {explorer}")
}

pub fn transaction_failed(error: &BotError) -> String {
    if error.is_retryable() {
        format!("Transaction failed.\nReason: {error}\nPlease try again in a moment.")
    } else {
        format!("Transaction failed.\nReason: {error}")
    }
}

pub fn command_failed(error: &BotError) -> String {
    format!("Sorry, something went wrong. Error: {error}")
}

pub fn tip_received(sender_handle: &str, amount: NasAmount, hash: &TxHash) -> String {
    format!(
        "@{sender_handle} sent you {amount} NAS! TX: {hash}\nDM me \"balance\" to see your account."
    )
}

pub fn public_ack(
    sender_handle: &str,
    amount: NasAmount,
    recipient_handle: &str,
    hash: &TxHash,
) -> String {
    format!(
        "{} @{sender_handle} sent {amount} NAS to @{recipient_handle}. TX: {hash}",
        reaction()
    )
}
