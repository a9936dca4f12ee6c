//! Per-connection handler: action dispatch and outbound relay.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The task waits on two things at once:
//!   1. Frames from the client → decode → create / join / play
//!   2. Messages the room actor queued for this connection → send
//!
//! When the loop ends, for whatever reason, the drop guard takes the
//! connection out of its room and tells the room the seat is gone.

use std::sync::Arc;

use rochambeau_protocol::{ClientMessage, Codec, ServerMessage};
use rochambeau_room::{PlayerSender, RoomError, RoomRegistry};
use rochambeau_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::RochambeauError;
use crate::server::ServerState;

/// Reply to any frame that is not a known action.
const UNRECOGNIZED_MESSAGE: &str = "Unrecognized message";

/// Drop guard that releases a connection's seat when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async work.
struct SessionGuard {
    conn_id: ConnectionId,
    registry: RoomRegistry,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let registry = self.registry.clone();
        tokio::spawn(async move {
            // Detach first, then notify the actor.
            let Some(departed) = registry.leave(conn_id).await else {
                return;
            };
            if let Err(e) = departed.handle.abandon(departed.seat).await {
                tracing::debug!(
                    %conn_id,
                    token = %departed.token,
                    error = %e,
                    "room already stopped"
                );
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), RochambeauError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (outbox, mut inbox) = mpsc::unbounded_channel();
    let _guard = SessionGuard {
        conn_id,
        registry: state.registry.clone(),
    };

    loop {
        tokio::select! {
            incoming = conn.recv() => {
                let data = match incoming {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%conn_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "recv error");
                        break;
                    }
                };
                dispatch(&conn, &state, conn_id, &outbox, &data).await?;
            }
            Some(msg) = inbox.recv() => {
                send_message(&conn, &state.codec, &msg).await?;
            }
        }
    }

    // _guard drops here → room cleanup fires.
    Ok(())
}

/// Decodes one inbound frame and runs the action it names.
async fn dispatch<C: Codec>(
    conn: &WebSocketConnection,
    state: &ServerState<C>,
    conn_id: ConnectionId,
    outbox: &PlayerSender,
    data: &[u8],
) -> Result<(), RochambeauError> {
    let action: ClientMessage = match state.codec.decode(data) {
        Ok(action) => action,
        Err(e) => {
            tracing::debug!(%conn_id, error = %e, "failed to decode action");
            return send_error(conn, &state.codec, UNRECOGNIZED_MESSAGE).await;
        }
    };

    match action {
        ClientMessage::CreateRoom { username } => {
            let result = state
                .registry
                .create_room(conn_id, username, outbox.clone())
                .await;
            match result {
                Ok(token) => {
                    send_message(
                        conn,
                        &state.codec,
                        &ServerMessage::room_created(token),
                    )
                    .await?;
                    send_message(
                        conn,
                        &state.codec,
                        &ServerMessage::waiting_for_opponent(),
                    )
                    .await?;
                }
                Err(e) => reject(conn, &state.codec, conn_id, e).await?,
            }
        }

        ClientMessage::JoinRoom { username, token } => {
            // On success the room actor announces the game to both seats.
            let result = match token {
                Some(token) => {
                    state
                        .registry
                        .join_room(conn_id, &token, username, outbox.clone())
                        .await
                }
                None => Err(RoomError::NoSuchRoom),
            };
            if let Err(e) = result {
                reject(conn, &state.codec, conn_id, e).await?;
            }
        }

        ClientMessage::Play { choice } => {
            let result = match state.registry.membership(conn_id).await {
                Some(seat) => seat.handle.play(seat.seat, choice).await,
                None => Err(RoomError::InvalidMove),
            };
            if let Err(e) = result {
                // A room that vanished mid-request is just "no active room".
                let e = match e {
                    RoomError::Unavailable => RoomError::InvalidMove,
                    other => other,
                };
                reject(conn, &state.codec, conn_id, e).await?;
            }
        }
    }

    Ok(())
}

/// Reports a rejected action to the client. The session continues.
async fn reject(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    conn_id: ConnectionId,
    err: RoomError,
) -> Result<(), RochambeauError> {
    tracing::debug!(%conn_id, error = %err, "action rejected");
    send_error(conn, codec, &err.to_string()).await
}

/// Sends a `ServerMessage::Error` to the client.
async fn send_error(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    message: &str,
) -> Result<(), RochambeauError> {
    send_message(conn, codec, &ServerMessage::error(message)).await
}

async fn send_message(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    msg: &ServerMessage,
) -> Result<(), RochambeauError> {
    let bytes = codec.encode(msg)?;
    conn.send(&bytes).await?;
    Ok(())
}
