//! # Rochambeau
//!
//! Two-player rock-paper-scissors matchmaking server.
//!
//! One player creates a room and shares its token, a second player joins
//! with that token, and the room plays a fixed number of rounds before
//! announcing the winner. Clients speak JSON over WebSocket.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rochambeau::prelude::*;
//!
//! # async fn run() -> Result<(), RochambeauError> {
//! let server = RochambeauServer::builder()
//!     .bind("0.0.0.0:8765")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{
    ConfigError, DEFAULT_BIND, ENV_BIND, ENV_MAX_ROOMS, ENV_ROUNDS, ServerConfig,
};
pub use error::RochambeauError;
pub use server::{RochambeauServer, RochambeauServerBuilder};

pub use rochambeau_protocol as protocol;
pub use rochambeau_room as room;
pub use rochambeau_transport as transport;

/// Everything needed to build, run and talk to a server.
pub mod prelude {
    pub use crate::{
        ConfigError, RochambeauError, RochambeauServer,
        RochambeauServerBuilder, ServerConfig,
    };
    pub use rochambeau_protocol::{
        ClientMessage, Move, RoomToken, ServerMessage, TIE,
    };
    pub use rochambeau_room::{RoomConfig, RoomError, RoomRegistry};
}
