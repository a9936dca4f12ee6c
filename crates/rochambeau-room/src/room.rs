//! Room actor: an isolated Tokio task that owns one match.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. The actor is the only code that touches the
//! match state (seats, move slots, scores), so move slots are written at
//! most once per round without any locking.
//!
//! The actor doubles as the round driver. Once both seats are filled it
//! steps through the rounds, waiting on its command channel until both
//! move slots of the current round are filled, then resolves and
//! broadcasts. After the last round it removes itself from the registry
//! and announces the overall winner.

use std::cmp::Ordering;

use rochambeau_protocol::{Move, RoomToken, ServerMessage, TIE};
use tokio::sync::{mpsc, oneshot};

use crate::{RoomConfig, RoomError, RoomPhase, RoomRegistry, SEATS, resolve};

/// Channel sender for delivering outbound messages to one connection.
///
/// Unbounded so a broadcast never waits on a slow reader; a send to a
/// connection that has already gone away just fails and is ignored.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the caller
/// sends a command and waits for the response on it.
pub(crate) enum RoomCommand {
    /// Fill the second seat. Only ever sent by the registry, inside its
    /// critical section, after it has checked capacity.
    Seat {
        username: String,
        sender: PlayerSender,
    },

    /// Write `choice` into `seat`'s move slot for the current round.
    Play {
        seat: usize,
        choice: String,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// The player in `seat` disconnected. The room has already been
    /// removed from the registry.
    Abandon { seat: usize },

    /// Request a snapshot of the room.
    GetInfo { reply: oneshot::Sender<RoomInfo> },
}

/// A snapshot of a room's match state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub token: RoomToken,
    pub phase: RoomPhase,
    /// 0 before the game starts, then the current (or last) round.
    pub round: u32,
    /// Seated usernames in seat order.
    pub usernames: Vec<String>,
    pub scores: [u32; SEATS],
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone. The registry holds one per room; once the registry
/// drops it and no session holds a clone, the actor's channel closes
/// and the actor stops.
#[derive(Clone)]
pub struct RoomHandle {
    token: RoomToken,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's token.
    pub fn token(&self) -> &RoomToken {
        &self.token
    }

    /// Enqueues the second player without waiting.
    ///
    /// Synchronous so the registry can call it while holding its lock.
    pub(crate) fn seat_opponent(
        &self,
        username: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        self.sender
            .try_send(RoomCommand::Seat { username, sender })
            .map_err(|_| RoomError::Unavailable)
    }

    /// Submits a move for `seat` and waits for the room's verdict.
    pub async fn play(
        &self,
        seat: usize,
        choice: String,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Play {
                seat,
                choice,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Tells the room that the player in `seat` is gone.
    pub async fn abandon(&self, seat: usize) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Abandon { seat })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Requests the current room info.
    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }
}

/// One filled seat.
struct Seat {
    username: String,
    sender: PlayerSender,
}

/// The room stopped before the match was played out.
struct Stopped;

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    token: RoomToken,
    config: RoomConfig,
    phase: RoomPhase,
    round: u32,
    seats: Vec<Seat>,
    moves: [Option<Move>; SEATS],
    scores: [u32; SEATS],
    registry: RoomRegistry,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(token = %self.token, "room actor started");

        match self.drive().await {
            Ok(()) => tracing::info!(token = %self.token, "room actor stopped"),
            Err(Stopped) => tracing::info!(
                token = %self.token,
                round = self.round,
                "room actor stopped before the match finished"
            ),
        }
    }

    /// Waits for the opponent, then walks the phase machine to `Done`.
    async fn drive(&mut self) -> Result<(), Stopped> {
        while self.seats.len() < SEATS {
            self.step().await?;
        }

        let opponents =
            [self.seats[0].username.clone(), self.seats[1].username.clone()];
        tracing::info!(
            token = %self.token,
            first = %opponents[0],
            second = %opponents[1],
            "game started"
        );
        self.broadcast(ServerMessage::game_start(opponents));

        while let Some(phase) = self.phase.next(self.config.rounds) {
            self.phase = phase;
            match phase {
                RoomPhase::RoundInProgress(round) => {
                    self.play_round(round).await?
                }
                RoomPhase::Finalizing => self.finalize().await?,
                RoomPhase::WaitingForOpponent | RoomPhase::Done => {}
            }
        }
        Ok(())
    }

    async fn play_round(&mut self, round: u32) -> Result<(), Stopped> {
        self.round = round;
        self.moves = [None; SEATS];
        self.broadcast(ServerMessage::round_start(round));

        let choices = loop {
            if let [Some(first), Some(second)] = self.moves {
                break [first, second];
            }
            self.step().await?;
        };

        let outcome = resolve(choices[0], choices[1]);
        if let Some(seat) = outcome.winner_seat() {
            self.scores[seat] += 1;
        }
        let winner = self.winner_label(outcome.winner_seat());

        tracing::debug!(
            token = %self.token,
            round,
            ?outcome,
            scores = ?self.scores,
            "round resolved"
        );
        self.broadcast(ServerMessage::RoundResult {
            round,
            winner,
            scores: self.scores,
            choices,
        });
        Ok(())
    }

    /// Announces the overall winner and leaves the registry.
    ///
    /// The registry entry goes first so that anyone who has seen
    /// `game_over` can no longer find the room. If the entry is already
    /// gone, a player left while the last round was resolving: their
    /// `Abandon` is on its way and replaces `game_over`.
    async fn finalize(&mut self) -> Result<(), Stopped> {
        if !self.registry.remove_room(&self.token).await {
            tracing::debug!(
                token = %self.token,
                "room detached before game over, awaiting abandon"
            );
            loop {
                self.step().await?;
            }
        }

        let winner = match self.scores[0].cmp(&self.scores[1]) {
            Ordering::Greater => Some(0),
            Ordering::Less => Some(1),
            Ordering::Equal => None,
        };
        let winner = self.winner_label(winner);

        tracing::info!(
            token = %self.token,
            %winner,
            scores = ?self.scores,
            "game finished"
        );
        self.broadcast(ServerMessage::GameOver {
            winner,
            final_scores: self.scores,
        });
        Ok(())
    }

    /// Waits for and applies one command.
    ///
    /// Every suspension of the actor goes through here, so a removed room
    /// is noticed at the next await: either as an explicit `Abandon` or as
    /// a closed channel.
    async fn step(&mut self) -> Result<(), Stopped> {
        let Some(cmd) = self.receiver.recv().await else {
            tracing::debug!(token = %self.token, "all room handles dropped");
            self.phase = RoomPhase::Done;
            return Err(Stopped);
        };

        match cmd {
            RoomCommand::Seat { username, sender } => {
                self.handle_seat(username, sender);
            }
            RoomCommand::Play {
                seat,
                choice,
                reply,
            } => {
                let result = self.handle_play(seat, &choice);
                let _ = reply.send(result);
            }
            RoomCommand::Abandon { seat } => {
                self.handle_abandon(seat);
                return Err(Stopped);
            }
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
        }
        Ok(())
    }

    fn handle_seat(&mut self, username: String, sender: PlayerSender) {
        if !self.phase.is_joinable() || self.seats.len() >= SEATS {
            tracing::warn!(
                token = %self.token,
                %username,
                phase = %self.phase,
                "seat request for a full room, ignoring"
            );
            return;
        }
        tracing::info!(token = %self.token, %username, "player seated");
        self.seats.push(Seat { username, sender });
    }

    fn handle_play(
        &mut self,
        seat: usize,
        choice: &str,
    ) -> Result<(), RoomError> {
        if !self.phase.is_active() {
            return Err(RoomError::InvalidMove);
        }
        let mv: Move = choice.parse().map_err(|_| RoomError::InvalidMove)?;
        let slot = self.moves.get_mut(seat).ok_or(RoomError::InvalidMove)?;
        if slot.is_some() {
            return Err(RoomError::InvalidMove);
        }
        *slot = Some(mv);
        tracing::debug!(
            token = %self.token,
            seat,
            round = self.round,
            "move recorded"
        );
        Ok(())
    }

    fn handle_abandon(&mut self, departed: usize) {
        self.phase = RoomPhase::Done;
        let notice = ServerMessage::error(
            RoomError::OpponentDisconnected.to_string(),
        );
        for (index, seat) in self.seats.iter().enumerate() {
            if index != departed {
                let _ = seat.sender.send(notice.clone());
            }
        }
        tracing::info!(
            token = %self.token,
            seat = departed,
            round = self.round,
            "player disconnected, room abandoned"
        );
    }

    /// Sends to every seat. A seat whose connection is gone is skipped.
    fn broadcast(&self, msg: ServerMessage) {
        for seat in &self.seats {
            if seat.sender.send(msg.clone()).is_err() {
                tracing::debug!(
                    token = %self.token,
                    username = %seat.username,
                    "broadcast to closed connection dropped"
                );
            }
        }
    }

    fn winner_label(&self, seat: Option<usize>) -> String {
        seat.and_then(|s| self.seats.get(s))
            .map(|s| s.username.clone())
            .unwrap_or_else(|| TIE.to_string())
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            token: self.token.clone(),
            phase: self.phase,
            round: self.round,
            usernames: self.seats.iter().map(|s| s.username.clone()).collect(),
            scores: self.scores,
        }
    }
}

/// Spawns a room actor with the creator in seat 0 and returns a handle.
pub(crate) fn spawn_room(
    token: RoomToken,
    config: RoomConfig,
    registry: RoomRegistry,
    creator: String,
    sender: PlayerSender,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.command_buffer.max(1));

    let actor = RoomActor {
        token: token.clone(),
        config,
        phase: RoomPhase::WaitingForOpponent,
        round: 0,
        seats: vec![Seat {
            username: creator,
            sender,
        }],
        moves: [None; SEATS],
        scores: [0; SEATS],
        registry,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { token, sender: tx }
}
