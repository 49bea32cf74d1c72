#![cfg(feature = "std")]
//! Single-owner matchmaking task.
//!
//! Free players and live rooms are only ever touched by the task spawned in
//! [`MatchRegistry::spawn`]; everything else talks to it through a
//! [`RegistryHandle`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::anyhow;
use log::{debug, info, warn};
use rand::Rng;
use tokio::sync::{mpsc, oneshot};

use crate::common::MatchError;
use crate::ids::{PlayerId, RoomId};
use crate::protocol::Response;
use crate::room::task::{run_room, SeatReader, Seated};
use crate::sink::ResponseSink;
use crate::tasks::TaskControl;

/// Outcome of a create or join request.
pub enum Seating {
    /// The reader now belongs to the room.
    Seated(RoomId),
    /// Nothing changed; the reader is handed back to the lobby.
    Rejected(MatchError, SeatReader),
}

impl std::fmt::Debug for Seating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seating::Seated(id) => f.debug_tuple("Seated").field(id).finish(),
            Seating::Rejected(e, _) => f.debug_tuple("Rejected").field(e).finish(),
        }
    }
}

enum Command {
    Register {
        sink: Arc<dyn ResponseSink>,
        reply: oneshot::Sender<PlayerId>,
    },
    ListRooms {
        reply: oneshot::Sender<BTreeMap<RoomId, usize>>,
    },
    CreateRoom {
        player: PlayerId,
        reader: SeatReader,
        reply: oneshot::Sender<Seating>,
    },
    JoinRoom {
        room: RoomId,
        player: PlayerId,
        reader: SeatReader,
        reply: oneshot::Sender<Seating>,
    },
    JoinRandom {
        player: PlayerId,
        reader: SeatReader,
        reply: oneshot::Sender<Seating>,
    },
    Leave {
        player: PlayerId,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable access to the registry task.
#[derive(Clone, Debug)]
pub struct RegistryHandle {
    tx: mpsc::UnboundedSender<Command>,
}

fn gone<T>(_: T) -> anyhow::Error {
    anyhow!("Registry is shut down")
}

impl RegistryHandle {
    async fn call<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> anyhow::Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(build(reply)).map_err(gone)?;
        rx.await.map_err(gone)
    }

    /// Assign an identity to a new connection and greet it.
    pub async fn register(&self, sink: Arc<dyn ResponseSink>) -> anyhow::Result<PlayerId> {
        self.call(|reply| Command::Register { sink, reply }).await
    }

    /// Room id to number of seated players.
    pub async fn list_rooms(&self) -> anyhow::Result<BTreeMap<RoomId, usize>> {
        self.call(|reply| Command::ListRooms { reply }).await
    }

    pub async fn create_room(&self, player: PlayerId, reader: SeatReader) -> anyhow::Result<Seating> {
        self.call(|reply| Command::CreateRoom { player, reader, reply }).await
    }

    pub async fn join_room(
        &self,
        room: RoomId,
        player: PlayerId,
        reader: SeatReader,
    ) -> anyhow::Result<Seating> {
        self.call(|reply| Command::JoinRoom {
            room,
            player,
            reader,
            reply,
        })
        .await
    }

    pub async fn join_random(&self, player: PlayerId, reader: SeatReader) -> anyhow::Result<Seating> {
        self.call(|reply| Command::JoinRandom { player, reader, reply }).await
    }

    /// Forget a free player and close their connection.
    pub fn leave(&self, player: PlayerId) -> anyhow::Result<()> {
        self.tx.send(Command::Leave { player }).map_err(gone)
    }

    /// Stop every room, close every free connection and end the task.
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        self.call(|reply| Command::Shutdown { reply }).await
    }
}

struct RoomEntry {
    seats: usize,
    joins: mpsc::Sender<Seated>,
    task: TaskControl,
}

pub struct MatchRegistry {
    clients: HashMap<PlayerId, Arc<dyn ResponseSink>>,
    rooms: HashMap<RoomId, RoomEntry>,
    closed_tx: mpsc::UnboundedSender<RoomId>,
}

impl MatchRegistry {
    /// Spawn the registry task and return a handle to it.
    pub fn spawn() -> RegistryHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();
        let registry = MatchRegistry {
            clients: HashMap::new(),
            rooms: HashMap::new(),
            closed_tx,
        };
        tokio::spawn(registry.run(rx, closed_rx));
        RegistryHandle { tx }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut closed: mpsc::UnboundedReceiver<RoomId>,
    ) {
        loop {
            tokio::select! {
                Some(id) = closed.recv() => {
                    if self.rooms.remove(&id).is_some() {
                        debug!("room {} removed", id);
                    }
                }
                command = commands.recv() => match command {
                    Some(Command::Shutdown { reply }) => {
                        self.shutdown().await;
                        let _ = reply.send(());
                        return;
                    }
                    Some(command) => self.handle(command),
                    None => {
                        self.shutdown().await;
                        return;
                    }
                },
            }
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Register { sink, reply } => {
                let id = self.register(sink);
                let _ = reply.send(id);
            }
            Command::ListRooms { reply } => {
                let _ = reply.send(self.list_rooms());
            }
            Command::CreateRoom { player, reader, reply } => {
                let _ = reply.send(self.create_room(player, reader));
            }
            Command::JoinRoom {
                room,
                player,
                reader,
                reply,
            } => {
                let _ = reply.send(self.join_room(room, player, reader));
            }
            Command::JoinRandom { player, reader, reply } => {
                let _ = reply.send(self.join_random(player, reader));
            }
            Command::Leave { player } => self.leave(&player),
            Command::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    fn register(&mut self, sink: Arc<dyn ResponseSink>) -> PlayerId {
        let id = PlayerId::random();
        sink.send(Response::register(&id));
        info!("player {} registered", id);
        self.clients.insert(id.clone(), sink);
        id
    }

    fn list_rooms(&self) -> BTreeMap<RoomId, usize> {
        self.rooms
            .iter()
            .map(|(id, entry)| (id.clone(), entry.seats))
            .collect()
    }

    fn create_room(&mut self, player: PlayerId, reader: SeatReader) -> Seating {
        let Some(sink) = self.clients.remove(&player) else {
            return Seating::Rejected(MatchError::UnknownPlayer(player), reader);
        };
        let id = RoomId::random();
        let (joins, joins_rx) = mpsc::channel(1);
        let creator = Seated {
            id: player,
            sink,
            reader,
        };
        let closed = self.closed_tx.clone();
        let room = id.clone();
        let task = TaskControl::spawn(move |stop| async move {
            run_room(room.clone(), creator, joins_rx, stop).await;
            let _ = closed.send(room);
        });
        self.rooms.insert(
            id.clone(),
            RoomEntry {
                seats: 1,
                joins,
                task,
            },
        );
        Seating::Seated(id)
    }

    fn join_room(&mut self, room: RoomId, player: PlayerId, reader: SeatReader) -> Seating {
        let Some(sink) = self.clients.remove(&player) else {
            return Seating::Rejected(MatchError::UnknownPlayer(player), reader);
        };
        let Some(entry) = self.rooms.get_mut(&room) else {
            self.clients.insert(player, sink);
            return Seating::Rejected(MatchError::RoomNotFound(room), reader);
        };
        if entry.seats >= 2 {
            self.clients.insert(player, sink);
            return Seating::Rejected(MatchError::RoomFull(room), reader);
        }
        match entry.joins.try_send(Seated {
            id: player,
            sink,
            reader,
        }) {
            Ok(()) => {
                entry.seats = 2;
                Seating::Seated(room)
            }
            Err(mpsc::error::TrySendError::Full(joiner)) => {
                self.clients.insert(joiner.id, joiner.sink);
                Seating::Rejected(MatchError::RoomFull(room), joiner.reader)
            }
            Err(mpsc::error::TrySendError::Closed(joiner)) => {
                warn!("room {} is gone but still listed", room);
                self.clients.insert(joiner.id, joiner.sink);
                Seating::Rejected(MatchError::RoomNotFound(room), joiner.reader)
            }
        }
    }

    fn join_random(&mut self, player: PlayerId, reader: SeatReader) -> Seating {
        if !self.clients.contains_key(&player) {
            return Seating::Rejected(MatchError::UnknownPlayer(player), reader);
        }
        let free: Vec<&RoomId> = self
            .rooms
            .iter()
            .filter(|(_, entry)| entry.seats == 1)
            .map(|(id, _)| id)
            .collect();
        if free.is_empty() {
            return Seating::Rejected(MatchError::NoFreeRooms, reader);
        }
        let room = free[rand::rng().random_range(0..free.len())].clone();
        self.join_room(room, player, reader)
    }

    fn leave(&mut self, player: &PlayerId) {
        if let Some(sink) = self.clients.remove(player) {
            info!("player {} left", player);
            sink.close();
        }
    }

    async fn shutdown(&mut self) {
        info!(
            "registry shutting down: {} rooms, {} free players",
            self.rooms.len(),
            self.clients.len()
        );
        for (_, entry) in self.rooms.drain() {
            entry.task.stop().await;
        }
        for (_, sink) in self.clients.drain() {
            sink.close();
        }
    }
}
