//! Room registry: creates, tracks, and removes rooms, and knows which
//! connection sits in which room.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use rochambeau_protocol::RoomToken;
use rochambeau_transport::ConnectionId;
use tokio::sync::Mutex;

use crate::room::spawn_room;
use crate::{PlayerSender, RoomConfig, RoomError, RoomHandle, RoomInfo, SEATS};

/// Where a connection sits: its room, its seat index and a handle to the
/// room actor.
#[derive(Clone)]
pub struct Membership {
    pub token: RoomToken,
    pub seat: usize,
    pub handle: RoomHandle,
}

/// Process-wide table of active rooms.
///
/// Cheap to clone: every clone shares the same table. The server holds
/// one clone, and each room actor holds another so it can remove itself
/// when its match ends.
///
/// # Concurrency note
///
/// All state lives behind one `tokio::sync::Mutex`. The lock is never
/// held across an await on a room actor, only across plain map updates
/// and the non-blocking `try_send` that seats an opponent, so a room actor
/// can always take the lock to remove itself.
#[derive(Clone)]
pub struct RoomRegistry {
    state: Arc<Mutex<RegistryState>>,
    config: RoomConfig,
}

#[derive(Default)]
struct RegistryState {
    /// Active rooms, keyed by token.
    rooms: HashMap<RoomToken, RoomEntry>,

    /// Maps each connection to the room it is seated in.
    /// A connection is in at most ONE room at a time.
    connections: HashMap<ConnectionId, RoomToken>,
}

struct RoomEntry {
    handle: RoomHandle,
    /// Seated connections in seat order.
    players: Vec<ConnectionId>,
}

impl RegistryState {
    /// Removes a room and every association pointing at it.
    fn detach(&mut self, token: &RoomToken) -> Option<RoomEntry> {
        let entry = self.rooms.remove(token)?;
        self.connections.retain(|_, t| t != token);
        Some(entry)
    }

    fn fresh_token(&self) -> RoomToken {
        loop {
            let token = RoomToken::new(generate_token());
            if !self.rooms.contains_key(&token) {
                return token;
            }
        }
    }
}

impl RoomRegistry {
    /// Creates a new, empty registry.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState::default())),
            config,
        }
    }

    /// The configuration every room is spawned with.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Creates a room with `conn` in seat 0 and returns its token.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyInRoom`] — `conn` is already seated somewhere
    /// - [`RoomError::ServerFull`] — `max_rooms` rooms are already alive
    pub async fn create_room(
        &self,
        conn: ConnectionId,
        username: String,
        sender: PlayerSender,
    ) -> Result<RoomToken, RoomError> {
        let mut state = self.state.lock().await;

        if state.connections.contains_key(&conn) {
            return Err(RoomError::AlreadyInRoom);
        }
        if state.rooms.len() >= self.config.max_rooms {
            tracing::debug!(
                %conn,
                rooms = state.rooms.len(),
                "room cap reached"
            );
            return Err(RoomError::ServerFull);
        }

        let token = state.fresh_token();
        let handle = spawn_room(
            token.clone(),
            self.config.clone(),
            self.clone(),
            username.clone(),
            sender,
        );
        state.rooms.insert(
            token.clone(),
            RoomEntry {
                handle,
                players: vec![conn],
            },
        );
        state.connections.insert(conn, token.clone());

        tracing::info!(
            %token,
            %conn,
            %username,
            rooms = state.rooms.len(),
            "room created"
        );
        Ok(token)
    }

    /// Seats `conn` as the second player of `token`.
    ///
    /// On success the room actor starts the match on its own. A rejected
    /// join leaves the room untouched.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyInRoom`] — `conn` is already seated somewhere
    /// - [`RoomError::NoSuchRoom`] — unknown token
    /// - [`RoomError::RoomFull`] — both seats taken
    /// - [`RoomError::Unavailable`] — the room actor cannot take commands
    pub async fn join_room(
        &self,
        conn: ConnectionId,
        token: &RoomToken,
        username: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let mut state = self.state.lock().await;

        if state.connections.contains_key(&conn) {
            return Err(RoomError::AlreadyInRoom);
        }
        let entry = state.rooms.get_mut(token).ok_or(RoomError::NoSuchRoom)?;
        if entry.players.len() >= SEATS {
            return Err(RoomError::RoomFull);
        }

        entry.handle.seat_opponent(username.clone(), sender)?;
        entry.players.push(conn);
        state.connections.insert(conn, token.clone());

        tracing::info!(%token, %conn, %username, "player joined room");
        Ok(())
    }

    /// Removes a room and clears every connection association pointing at
    /// it. Returns `false` if the room was already gone.
    pub async fn remove_room(&self, token: &RoomToken) -> bool {
        let removed = self.state.lock().await.detach(token).is_some();
        if removed {
            tracing::info!(%token, "room removed");
        }
        removed
    }

    /// Removes the room `conn` is seated in, if any, and reports which
    /// seat left so the caller can notify the room actor.
    ///
    /// The returned handle outlives the registry entry, so the caller can
    /// still reach the actor after the room is gone from the table.
    pub async fn leave(&self, conn: ConnectionId) -> Option<Membership> {
        let mut state = self.state.lock().await;
        let token = state.connections.get(&conn).cloned()?;
        let entry = state.detach(&token)?;
        let seat = entry.players.iter().position(|c| *c == conn)?;

        tracing::info!(%token, %conn, seat, "room removed after disconnect");
        Some(Membership {
            token,
            seat,
            handle: entry.handle,
        })
    }

    /// Returns the token of the room `conn` is seated in, if any.
    pub async fn room_for_connection(
        &self,
        conn: ConnectionId,
    ) -> Option<RoomToken> {
        self.state.lock().await.connections.get(&conn).cloned()
    }

    /// Returns the room, seat and actor handle for `conn`, if seated.
    pub async fn membership(&self, conn: ConnectionId) -> Option<Membership> {
        let state = self.state.lock().await;
        let token = state.connections.get(&conn)?;
        let entry = state.rooms.get(token)?;
        let seat = entry.players.iter().position(|c| *c == conn)?;
        Some(Membership {
            token: token.clone(),
            seat,
            handle: entry.handle.clone(),
        })
    }

    /// Returns a snapshot of a room's match state.
    ///
    /// The registry lock is released before the room actor is queried.
    pub async fn room_info(
        &self,
        token: &RoomToken,
    ) -> Result<RoomInfo, RoomError> {
        let handle = {
            let state = self.state.lock().await;
            state
                .rooms
                .get(token)
                .map(|e| e.handle.clone())
                .ok_or(RoomError::NoSuchRoom)?
        };
        handle.get_info().await
    }

    /// Returns the seated connections of a room in seat order.
    pub async fn players(&self, token: &RoomToken) -> Option<Vec<ConnectionId>> {
        let state = self.state.lock().await;
        state.rooms.get(token).map(|e| e.players.clone())
    }

    /// Returns `true` if a room is registered under `token`.
    pub async fn contains(&self, token: &RoomToken) -> bool {
        self.state.lock().await.rooms.contains_key(token)
    }

    /// Returns the number of active rooms.
    pub async fn room_count(&self) -> usize {
        self.state.lock().await.rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_is_32_lowercase_hex() {
        let token = generate_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token, token.to_lowercase());
    }

    #[test]
    fn test_generate_token_differs_between_calls() {
        assert_ne!(generate_token(), generate_token());
    }
}
