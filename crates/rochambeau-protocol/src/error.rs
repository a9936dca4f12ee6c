//! Error types for the protocol layer.
//!
//! Each crate in Rochambeau defines its own error enum. A `ProtocolError`
//! always means the problem is in (de)serialization, not in networking or
//! room management.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing required field,
    /// or an unknown `action` tag.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A value parsed but is not meaningful, e.g. a move code other than
    /// `R`, `P` or `S`.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
