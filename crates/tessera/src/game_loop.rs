//! # Game Loop
//!
//! Cooperative, single-threaded ticking of one [`World`].
//!
//! ```text
//! Tick N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. DRAIN COMMANDS                                                   │
//! │    └─ Everything queued before the tick started, in arrival order   │
//! │                                                                     │
//! │ 2. APPLY                                                            │
//! │    ├─ Join  -> spawn a player on a free tile                        │
//! │    ├─ Move  -> pursuit, collision, relink                           │
//! │    └─ Leave -> unlink and forget the player                         │
//! │                                                                     │
//! │ 3. REPORT                                                           │
//! │    ├─ Per-command outcomes                                          │
//! │    ├─ World events, in the order they happened                      │
//! │    └─ A fresh view for every player touched this tick               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sessions on any thread hold a cloneable [`CommandSender`]. The world
//! itself is only touched from the thread calling [`GameLoop::tick`], so
//! commands never interleave: whoever is first in the queue wins a
//! contested kill or pickup.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tessera_procedural::ZoneCoord;

use crate::entity::EntityId;
use crate::events::WorldEvent;
use crate::movement::MoveOutcome;
use crate::world::World;

/// Caller-chosen identifier of a connected session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// A request from a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Spawn a player for the session.
    Join {
        /// Requesting session.
        session: SessionId,
        /// Player name.
        name: String,
        /// Zone to spawn in.
        zone: ZoneCoord,
    },
    /// Move the session's player.
    Move {
        /// Requesting session.
        session: SessionId,
        /// Horizontal step.
        dx: i32,
        /// Vertical step.
        dy: i32,
    },
    /// Remove the session's player.
    Leave {
        /// Requesting session.
        session: SessionId,
    },
}

impl PlayerCommand {
    /// The session that sent this command.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        match self {
            Self::Join { session, .. } | Self::Move { session, .. } | Self::Leave { session } => *session,
        }
    }
}

/// What became of one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The session now controls a player.
    Joined {
        /// The session.
        session: SessionId,
        /// Its player.
        player: EntityId,
    },
    /// The session already has a player, or the zone is full.
    JoinRefused {
        /// The session.
        session: SessionId,
    },
    /// A move was resolved.
    Moved {
        /// The session.
        session: SessionId,
        /// How it went.
        outcome: MoveOutcome,
    },
    /// The session's player was removed.
    Left {
        /// The session.
        session: SessionId,
    },
    /// The session has no player.
    UnknownSession {
        /// The session.
        session: SessionId,
    },
}

/// Everything one tick produced.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    /// Tick number, starting at 0.
    pub tick: u64,
    /// One outcome per command, in processing order.
    pub outcomes: Vec<CommandOutcome>,
    /// World events raised during the tick.
    pub events: Vec<WorldEvent>,
    /// Rendered zone for every player touched this tick that is still in
    /// the world, in first-touched order.
    pub views: Vec<(SessionId, String)>,
    /// Wall time spent in the tick.
    pub elapsed: Duration,
}

/// Handle for submitting commands.
#[derive(Clone, Debug)]
pub struct CommandSender {
    sender: Sender<PlayerCommand>,
}

impl CommandSender {
    /// Queues a command (non-blocking).
    ///
    /// Returns `false` if the queue is full or the loop is gone; the
    /// command is dropped.
    #[inline]
    pub fn send(&self, command: PlayerCommand) -> bool {
        match self.sender.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(command)) => {
                tracing::warn!(session = command.session().0, "command queue full, command dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Queues a command, waiting for room.
    #[inline]
    pub fn send_blocking(&self, command: PlayerCommand) -> bool {
        self.sender.send(command).is_ok()
    }
}

/// Owns the world and applies queued commands once per tick.
pub struct GameLoop {
    world: World,
    sender: Sender<PlayerCommand>,
    receiver: Receiver<PlayerCommand>,
    sessions: HashMap<SessionId, EntityId>,
    tick_count: u64,
}

impl GameLoop {
    /// Wraps a world. Queue capacity comes from its config.
    #[must_use]
    pub fn new(world: World) -> Self {
        let (sender, receiver) = bounded(world.config().command_capacity);
        Self {
            world,
            sender,
            receiver,
            sessions: HashMap::new(),
            tick_count: 0,
        }
    }

    /// A new handle for submitting commands.
    #[must_use]
    pub fn sender(&self) -> CommandSender {
        CommandSender {
            sender: self.sender.clone(),
        }
    }

    /// Commands waiting for the next tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The simulated world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The player controlled by a session.
    #[must_use]
    pub fn player_of(&self, session: SessionId) -> Option<EntityId> {
        self.sessions.get(&session).copied()
    }

    /// Runs one tick over every command queued before it started.
    pub fn tick(&mut self) -> TickReport {
        let started = Instant::now();
        let queued = self.receiver.len();
        let mut outcomes = Vec::with_capacity(queued);
        let mut touched: Vec<SessionId> = Vec::new();

        let commands: Vec<PlayerCommand> = self.receiver.try_iter().take(queued).collect();
        for command in commands {
            let session = command.session();
            if !touched.contains(&session) {
                touched.push(session);
            }
            outcomes.push(self.apply(command));
        }

        let views = touched
            .into_iter()
            .filter_map(|session| {
                let player = self.sessions.get(&session)?;
                Some((session, self.world.render_world(*player)?))
            })
            .collect();

        let report = TickReport {
            tick: self.tick_count,
            outcomes,
            events: self.world.drain_events(),
            views,
            elapsed: started.elapsed(),
        };
        tracing::trace!(
            tick = report.tick,
            commands = report.outcomes.len(),
            events = report.events.len(),
            elapsed_us = report.elapsed.as_micros() as u64,
            "tick complete"
        );
        self.tick_count += 1;
        report
    }

    fn apply(&mut self, command: PlayerCommand) -> CommandOutcome {
        match command {
            PlayerCommand::Join { session, name, zone } => {
                if self.sessions.contains_key(&session) {
                    return CommandOutcome::JoinRefused { session };
                }
                match self.world.spawn_player(name, zone) {
                    Some(player) => {
                        self.sessions.insert(session, player);
                        CommandOutcome::Joined { session, player }
                    }
                    None => CommandOutcome::JoinRefused { session },
                }
            }
            PlayerCommand::Move { session, dx, dy } => match self.sessions.get(&session) {
                Some(&player) => CommandOutcome::Moved {
                    session,
                    outcome: self.world.move_entity(player, dx, dy),
                },
                None => CommandOutcome::UnknownSession { session },
            },
            PlayerCommand::Leave { session } => match self.sessions.remove(&session) {
                Some(player) => {
                    if let Some(entity) = self.world.remove_entity(player) {
                        let name = entity.as_player().map_or("", |p| p.name.as_str());
                        tracing::info!(%player, %name, "player left");
                    }
                    CommandOutcome::Left { session }
                }
                None => CommandOutcome::UnknownSession { session },
            },
        }
    }
}
