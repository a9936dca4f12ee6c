//! Core protocol types for Rochambeau's wire format.
//!
//! Every type here is serialized to one JSON document per frame. Client
//! records are tagged by an `action` field, server records by a `status`
//! field, so each side can dispatch on a single key.

use std::fmt;
use std::str::FromStr;

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Winner label used in `round_result` and `game_over` when nobody won.
pub const TIE: &str = "Tie";

// ---------------------------------------------------------------------------
// RoomToken
// ---------------------------------------------------------------------------

/// Opaque token identifying a room.
///
/// Handed to the creator in `room_created` and typed in by the joining
/// player. The protocol layer treats it as an arbitrary string; the room
/// layer decides how tokens are generated.
///
/// `#[serde(transparent)]` keeps it a plain JSON string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomToken(String);

impl RoomToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RoomToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for RoomToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// One of the three hand shapes.
///
/// On the wire a move is its single-letter code: `"R"`, `"P"` or `"S"`.
/// The declaration order is the cyclic dominance order used to resolve a
/// round, so [`Move::index`] must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    #[serde(rename = "R")]
    Rock,
    #[serde(rename = "P")]
    Paper,
    #[serde(rename = "S")]
    Scissors,
}

impl Move {
    /// All moves in dominance order.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Position of this move in [`Move::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Rock => 0,
            Self::Paper => 1,
            Self::Scissors => 2,
        }
    }

    /// The single-letter wire code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Rock => "R",
            Self::Paper => "P",
            Self::Scissors => "S",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parses a client's `choice` field. Case-insensitive, surrounding
/// whitespace ignored.
impl FromStr for Move {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "R" | "r" => Ok(Self::Rock),
            "P" | "p" => Ok(Self::Paper),
            "S" | "s" => Ok(Self::Scissors),
            other => Err(ProtocolError::InvalidMessage(format!(
                "unknown move {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientMessage
// ---------------------------------------------------------------------------

/// Client → Server actions.
///
/// ```text
/// { "action": "create_room", "username": "alice" }
/// { "action": "join_room",   "username": "bob", "token": "9f0c…" }
/// { "action": "play",        "choice": "R" }
/// ```
///
/// `choice` stays a raw string here: an unknown code is a game-level
/// rejection (`InvalidMove`), not a malformed message. Likewise a
/// `token` that is missing or not a string decodes as `None` and is
/// rejected as an unknown room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Open a new room and take seat 0.
    CreateRoom { username: String },

    /// Take seat 1 in the room identified by `token`.
    JoinRoom {
        username: String,
        #[serde(
            default,
            deserialize_with = "lenient_token",
            skip_serializing_if = "Option::is_none"
        )]
        token: Option<RoomToken>,
    },

    /// Submit this round's move.
    Play { choice: String },
}

/// Accepts any JSON value for `token`; only a string yields a token.
fn lenient_token<'de, D>(deserializer: D) -> Result<Option<RoomToken>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Token(RoomToken),
        Other(#[allow(dead_code)] IgnoredAny),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Token(token) => Some(token),
        Lenient::Other(_) => None,
    })
}

// ---------------------------------------------------------------------------
// ServerMessage
// ---------------------------------------------------------------------------

/// Server → Client notifications.
///
/// Arrays are indexed by seat: element 0 is the room creator, element 1
/// the player who joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent to the creator right after `create_room` succeeds.
    RoomCreated { token: RoomToken, message: String },

    /// Sent to the creator right after `room_created`.
    WaitingForOpponent { message: String },

    /// Broadcast when the second player is seated.
    GameStart {
        opponents: [String; 2],
        message: String,
    },

    /// Broadcast at the start of every round.
    RoundStart { round: u32, message: String },

    /// Broadcast once both moves of a round are in.
    /// `winner` is a username or [`TIE`].
    RoundResult {
        round: u32,
        winner: String,
        scores: [u32; 2],
        choices: [Move; 2],
    },

    /// Broadcast after the last round. `winner` is a username or [`TIE`].
    GameOver {
        winner: String,
        final_scores: [u32; 2],
    },

    /// A rejected action or a terminal condition.
    Error { message: String },
}

impl ServerMessage {
    pub fn room_created(token: RoomToken) -> Self {
        let message = format!("Room created. Share this token: {token}");
        Self::RoomCreated { token, message }
    }

    pub fn waiting_for_opponent() -> Self {
        Self::WaitingForOpponent {
            message: "Waiting for another player to join...".into(),
        }
    }

    pub fn game_start(opponents: [String; 2]) -> Self {
        let message =
            format!("Game starting! {} vs {}", opponents[0], opponents[1]);
        Self::GameStart { opponents, message }
    }

    pub fn round_start(round: u32) -> Self {
        Self::RoundStart {
            round,
            message: format!(
                "Round {round}: Enter your choice \
                 (R for Stone, P for Paper, S for Scissors)"
            ),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(all(test, feature = "json"))]
mod tests {
    //! The text client reads these exact JSON shapes, so the tests check
    //! field names and tags rather than just round-tripping.

    use super::*;

    // =====================================================================
    // RoomToken
    // =====================================================================

    #[test]
    fn test_room_token_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomToken::new("abc123")).unwrap();
        assert_eq!(json, "\"abc123\"");
    }

    #[test]
    fn test_room_token_display_is_raw_token() {
        assert_eq!(RoomToken::from("abc").to_string(), "abc");
    }

    // =====================================================================
    // Move
    // =====================================================================

    #[test]
    fn test_move_serializes_as_letter_code() {
        let json = serde_json::to_string(&[Move::Rock, Move::Scissors]).unwrap();
        assert_eq!(json, r#"["R","S"]"#);
    }

    #[test]
    fn test_move_from_str_is_case_insensitive() {
        assert_eq!("R".parse::<Move>().unwrap(), Move::Rock);
        assert_eq!("p".parse::<Move>().unwrap(), Move::Paper);
        assert_eq!(" s ".parse::<Move>().unwrap(), Move::Scissors);
    }

    #[test]
    fn test_move_from_str_rejects_unknown_codes() {
        for bad in ["", "X", "Rock", "RP"] {
            assert!(bad.parse::<Move>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_move_index_matches_all_order() {
        for (i, m) in Move::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }

    // =====================================================================
    // ClientMessage
    // =====================================================================

    #[test]
    fn test_client_message_create_room_from_json() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"action":"create_room","username":"alice"}"#)
                .unwrap();
        assert_eq!(
            msg,
            ClientMessage::CreateRoom {
                username: "alice".into()
            }
        );
    }

    #[test]
    fn test_client_message_join_room_from_json() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"action":"join_room","username":"bob","token":"t-1"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinRoom {
                username: "bob".into(),
                token: Some(RoomToken::new("t-1")),
            }
        );
    }

    #[test]
    fn test_client_message_join_room_non_string_token_is_none() {
        for body in [
            r#"{"action":"join_room","username":"bob","token":12345}"#,
            r#"{"action":"join_room","username":"bob","token":null}"#,
            r#"{"action":"join_room","username":"bob","token":["t"]}"#,
            r#"{"action":"join_room","username":"bob"}"#,
        ] {
            let msg: ClientMessage = serde_json::from_str(body).unwrap();
            assert_eq!(
                msg,
                ClientMessage::JoinRoom {
                    username: "bob".into(),
                    token: None,
                },
                "{body}"
            );
        }
    }

    #[test]
    fn test_client_message_play_keeps_raw_choice() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"action":"play","choice":"x"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Play { choice: "x".into() });
    }

    #[test]
    fn test_client_message_missing_field_is_rejected() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"action":"play"}"#);
        assert!(result.is_err());
    }

    // =====================================================================
    // ServerMessage — JSON shape per variant
    // =====================================================================

    #[test]
    fn test_server_message_room_created_json_format() {
        let json =
            serde_json::to_value(ServerMessage::room_created(RoomToken::new("t")))
                .unwrap();
        assert_eq!(json["status"], "room_created");
        assert_eq!(json["token"], "t");
        assert_eq!(json["message"], "Room created. Share this token: t");
    }

    #[test]
    fn test_server_message_waiting_json_format() {
        let json = serde_json::to_value(ServerMessage::waiting_for_opponent())
            .unwrap();
        assert_eq!(json["status"], "waiting_for_opponent");
        assert_eq!(json["message"], "Waiting for another player to join...");
    }

    #[test]
    fn test_server_message_game_start_json_format() {
        let msg = ServerMessage::game_start(["alice".into(), "bob".into()]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["status"], "game_start");
        assert_eq!(json["opponents"], serde_json::json!(["alice", "bob"]));
        assert_eq!(json["message"], "Game starting! alice vs bob");
    }

    #[test]
    fn test_server_message_round_start_json_format() {
        let json = serde_json::to_value(ServerMessage::round_start(2)).unwrap();
        assert_eq!(json["status"], "round_start");
        assert_eq!(json["round"], 2);
        assert_eq!(
            json["message"],
            "Round 2: Enter your choice (R for Stone, P for Paper, S for Scissors)"
        );
    }

    #[test]
    fn test_server_message_round_result_json_format() {
        let msg = ServerMessage::RoundResult {
            round: 1,
            winner: "alice".into(),
            scores: [1, 0],
            choices: [Move::Rock, Move::Scissors],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "round_result",
                "round": 1,
                "winner": "alice",
                "scores": [1, 0],
                "choices": ["R", "S"],
            })
        );
    }

    #[test]
    fn test_server_message_game_over_json_format() {
        let msg = ServerMessage::GameOver {
            winner: TIE.into(),
            final_scores: [1, 1],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["status"], "game_over");
        assert_eq!(json["winner"], "Tie");
        assert_eq!(json["final_scores"], serde_json::json!([1, 1]));
    }

    #[test]
    fn test_server_message_error_json_format() {
        let json =
            serde_json::to_value(ServerMessage::error("Server is full")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "Server is full"})
        );
    }

    #[test]
    fn test_server_message_decodes_from_wire() {
        let msg: ServerMessage = serde_json::from_str(
            r#"{"status":"game_over","winner":"bob","final_scores":[0,2]}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ServerMessage::GameOver {
                winner: "bob".into(),
                final_scores: [0, 2],
            }
        );
    }
}
