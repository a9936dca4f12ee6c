//! Room configuration and state machine.

use serde::{Deserialize, Serialize};

/// Number of seats in every room.
pub const SEATS: usize = 2;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by the registry and every room it spawns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Rounds per match.
    pub rounds: u32,

    /// Maximum number of rooms alive at once. `create_room` fails with
    /// `ServerFull` at this count.
    pub max_rooms: usize,

    /// Capacity of each room actor's command channel.
    pub command_buffer: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            max_rooms: 50,
            command_buffer: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Transitions are strictly ordered:
///
/// ```text
/// WaitingForOpponent → RoundInProgress(1) → … → RoundInProgress(N)
///                    → Finalizing → Done
/// ```
///
/// A disconnect jumps straight to `Done` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    /// Creator seated, second seat empty.
    WaitingForOpponent,
    /// Collecting moves for the given round (1-based).
    RoundInProgress(u32),
    /// All rounds resolved; computing and announcing the overall winner.
    Finalizing,
    /// Room removed from the registry. The actor is stopping.
    Done,
}

impl RoomPhase {
    /// Returns `true` if the room still has a free seat.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::WaitingForOpponent)
    }

    /// Returns `true` while moves are being accepted.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::RoundInProgress(_))
    }

    /// Returns the phase that follows this one in a match of `rounds`
    /// rounds, or `None` once the room is done.
    pub fn next(self, rounds: u32) -> Option<Self> {
        match self {
            Self::WaitingForOpponent if rounds == 0 => Some(Self::Finalizing),
            Self::WaitingForOpponent => Some(Self::RoundInProgress(1)),
            Self::RoundInProgress(n) if n < rounds => {
                Some(Self::RoundInProgress(n + 1))
            }
            Self::RoundInProgress(_) => Some(Self::Finalizing),
            Self::Finalizing => Some(Self::Done),
            Self::Done => None,
        }
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForOpponent => write!(f, "WaitingForOpponent"),
            Self::RoundInProgress(n) => write!(f, "RoundInProgress({n})"),
            Self::Finalizing => write!(f, "Finalizing"),
            Self::Done => write!(f, "Done"),
        }
    }
}
