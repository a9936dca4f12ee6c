//! Error types for the room layer.

/// Errors that can occur during room operations.
///
/// The `Display` text of each variant is exactly what the session layer
/// sends to the client in `error.message`, so keep the strings stable.
/// The text client matches on "disconnected" and "Server is full".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The concurrent-room cap has been reached.
    #[error("Server is full")]
    ServerFull,

    /// No room is registered under the given token.
    #[error("Room does not exist or invalid token")]
    NoSuchRoom,

    /// Both seats are taken.
    #[error("Room is full")]
    RoomFull,

    /// Unknown move code, game not started, or the seat already played
    /// this round.
    #[error("Invalid choice or already submitted")]
    InvalidMove,

    /// The other player's connection went away mid-game.
    #[error("Opponent disconnected. Game over.")]
    OpponentDisconnected,

    /// The connection is already seated in a room.
    #[error("Already in a room")]
    AlreadyInRoom,

    /// The room actor stopped between lookup and command delivery, or its
    /// command channel is full.
    #[error("Room is no longer available")]
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_match_wire_text() {
        assert_eq!(RoomError::ServerFull.to_string(), "Server is full");
        assert_eq!(
            RoomError::NoSuchRoom.to_string(),
            "Room does not exist or invalid token"
        );
        assert_eq!(RoomError::RoomFull.to_string(), "Room is full");
        assert_eq!(
            RoomError::InvalidMove.to_string(),
            "Invalid choice or already submitted"
        );
        assert_eq!(
            RoomError::OpponentDisconnected.to_string(),
            "Opponent disconnected. Game over."
        );
    }

    #[test]
    fn test_terminal_errors_carry_client_keywords() {
        let disconnected = RoomError::OpponentDisconnected.to_string();
        assert!(disconnected.contains("disconnected"));
        assert!(RoomError::ServerFull.to_string().contains("Server is full"));
        assert!(!RoomError::RoomFull.to_string().contains("disconnected"));
    }
}
