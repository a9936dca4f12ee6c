//! Unified error type for the Rochambeau server.

use rochambeau_protocol::ProtocolError;
use rochambeau_room::RoomError;
use rochambeau_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RochambeauError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (server full, no such room, invalid move).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// Malformed configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "gone",
        ));
        let err: RochambeauError = err.into();
        assert!(matches!(err, RochambeauError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let err: RochambeauError = err.into();
        assert!(matches!(err, RochambeauError::Protocol(_)));
    }

    #[test]
    fn test_from_room_error_keeps_wire_text() {
        let err: RochambeauError = RoomError::RoomFull.into();
        assert!(matches!(err, RochambeauError::Room(_)));
        assert_eq!(err.to_string(), "Room is full");
    }

    #[test]
    fn test_from_config_error() {
        let err = ConfigError {
            var: "ROCHAMBEAU_ROUNDS",
            value: "x".into(),
        };
        let err: RochambeauError = err.into();
        assert!(matches!(err, RochambeauError::Config(_)));
    }
}
