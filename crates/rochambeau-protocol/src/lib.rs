//! Wire protocol for Rochambeau.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`Move`],
//!   [`RoomToken`]) — the records that travel on the wire, one JSON
//!   document per frame.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those records are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer doesn't know about connections or rooms. It only
//! knows the shape of each message.
//!
//! ```text
//! Transport (frames) → Protocol (ClientMessage / ServerMessage) → Rooms
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientMessage, Move, RoomToken, ServerMessage, TIE};
