//! RPC error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("node returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("node error: {0}")]
    Remote(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl RpcError {
    /// Whether the node rejected a transaction because its nonce was stale,
    /// which happens when two operations for one account race.
    pub fn is_nonce_conflict(&self) -> bool {
        match self {
            Self::Remote(msg) | Self::Execution(msg) | Self::Http { body: msg, .. } => {
                msg.to_ascii_lowercase().contains("nonce")
            }
            _ => false,
        }
    }

    /// Whether repeating the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => self.is_nonce_conflict(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_conflicts_are_detected() {
        let err = RpcError::Remote("transaction's nonce is invalid, should bigger than the from's nonce".into());
        assert!(err.is_nonce_conflict());
        assert!(err.is_transient());
        assert!(!RpcError::Remote("insufficient balance".into()).is_nonce_conflict());
    }

    #[test]
    fn transient_classification() {
        assert!(RpcError::Transport("connection reset".into()).is_transient());
        assert!(RpcError::Http { status: 502, body: String::new() }.is_transient());
        assert!(!RpcError::Http { status: 400, body: String::new() }.is_transient());
        assert!(!RpcError::Decode("missing field".into()).is_transient());
    }
}
