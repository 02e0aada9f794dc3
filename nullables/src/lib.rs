//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! External dependencies are abstracted behind traits; this crate provides
//! test-friendly implementations that:
//! - Keep all state in memory and never touch the network
//! - Behave like the real collaborator on the paths the bot exercises
//! - Can be inspected and steered programmatically
//!
//! Usage: pass a `NullNode` wherever an `Arc<dyn NodeRpc>` is expected.

pub mod node;

pub use node::NullNode;
