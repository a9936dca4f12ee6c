//! Room lifecycle management for Rochambeau.
//!
//! Each room runs as an isolated Tokio task (actor model). The actor owns
//! the match state and is also the round driver: it seats the opponent,
//! collects one move per seat per round, resolves, broadcasts and finally
//! removes itself from the registry.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates/removes rooms, maps connections to rooms
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomPhase`] — lifecycle state machine
//! - [`RoomConfig`] — round count, room cap, channel sizing
//! - [`resolve`] — the move resolver

mod config;
mod error;
mod registry;
mod room;
mod rules;

pub use config::{RoomConfig, RoomPhase, SEATS};
pub use error::RoomError;
pub use registry::{Membership, RoomRegistry};
pub use room::{PlayerSender, RoomHandle, RoomInfo};
pub use rules::{Outcome, resolve};
