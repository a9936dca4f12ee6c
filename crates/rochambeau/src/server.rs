//! `RochambeauServer` builder and server loop.
//!
//! This is the entry point for running a Rochambeau server. It ties
//! together all the layers: transport → protocol → session → room.

use std::sync::Arc;

use rochambeau_protocol::{Codec, JsonCodec};
use rochambeau_room::{RoomConfig, RoomRegistry};
use rochambeau_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{RochambeauError, ServerConfig};

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry carries its own lock.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: RoomRegistry,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Rochambeau server.
///
/// # Example
///
/// ```rust,ignore
/// use rochambeau::prelude::*;
///
/// let server = RochambeauServer::builder()
///     .bind("0.0.0.0:8765")
///     .room_config(RoomConfig { rounds: 5, ..RoomConfig::default() })
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct RochambeauServerBuilder {
    config: ServerConfig,
}

impl RochambeauServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config.room = config;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(
        self,
    ) -> Result<RochambeauServer<JsonCodec>, RochambeauError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: RoomRegistry::new(self.config.room),
            codec: JsonCodec,
        });

        Ok(RochambeauServer { transport, state })
    }
}

impl Default for RochambeauServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Rochambeau server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RochambeauServer<C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl RochambeauServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> RochambeauServerBuilder {
        RochambeauServerBuilder::new()
    }
}

impl<C: Codec> RochambeauServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns a handle to the room registry shared by every connection.
    pub fn registry(&self) -> RoomRegistry {
        self.state.registry.clone()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), RochambeauError> {
        tracing::info!(
            rounds = self.state.registry.config().rounds,
            max_rooms = self.state.registry.config().max_rooms,
            "Rochambeau server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
