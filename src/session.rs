#![cfg(feature = "std")]
//! Lobby side of a single connection.

use std::boxed::Box;
use std::string::ToString;
use std::sync::Arc;

use log::{debug, info};
use tokio::time::{timeout, Duration};

use crate::ids::PlayerId;
use crate::protocol::{LobbyCommand, Request, Response};
use crate::registry::{RegistryHandle, Seating};
use crate::room::task::SeatReader;
use crate::sink::{Outbox, ResponseSink};
use crate::transport::Transport;

/// Serve one connection: start its writer, register it, then run the lobby
/// until the player is seated in a room or goes away.
///
/// A player silent in the lobby for `idle_timeout` is dropped.
pub async fn serve_connection<T>(
    registry: RegistryHandle,
    transport: T,
    idle_timeout: Duration,
) -> anyhow::Result<()>
where
    T: Transport<Request, Response>,
{
    let (reader, writer) = transport.split();
    let outbox = Outbox::spawn(Box::new(writer));
    let player = match registry.register(Arc::new(outbox.clone())).await {
        Ok(player) => player,
        Err(e) => {
            outbox.close();
            return Err(e);
        }
    };
    lobby(&registry, player, Box::new(reader), &outbox, idle_timeout).await
}

async fn lobby(
    registry: &RegistryHandle,
    player: PlayerId,
    mut reader: SeatReader,
    outbox: &Outbox,
    idle_timeout: Duration,
) -> anyhow::Result<()> {
    loop {
        let read = tokio::select! {
            _ = outbox.failed() => {
                debug!("lobby connection of {} lost: write failed", player);
                return registry.leave(player);
            }
            read = timeout(idle_timeout, reader.recv()) => read,
        };
        let request = match read {
            Ok(Ok(request)) => request,
            Ok(Err(e)) => {
                debug!("lobby connection of {} lost: {}", player, e);
                return registry.leave(player);
            }
            Err(_) => {
                info!("{} idle in the lobby for {:?}, dropping", player, idle_timeout);
                return registry.leave(player);
            }
        };
        let seating = match LobbyCommand::decode(&request) {
            Err(e) => {
                outbox.send(Response::retry(e.to_string()));
                continue;
            }
            Ok(LobbyCommand::Exit) => return registry.leave(player),
            Ok(LobbyCommand::ListRooms) => {
                let rooms = registry.list_rooms().await?;
                outbox.send(Response::info(&rooms));
                continue;
            }
            Ok(LobbyCommand::CreateRoom) => registry.create_room(player.clone(), reader).await?,
            Ok(LobbyCommand::JoinRoom(room)) => registry.join_room(room, player.clone(), reader).await?,
            Ok(LobbyCommand::JoinRandom) => registry.join_random(player.clone(), reader).await?,
        };
        match seating {
            Seating::Seated(room) => {
                info!("{} seated in room {}", player, room);
                return Ok(());
            }
            Seating::Rejected(e, returned) => {
                outbox.send(Response::retry(e.to_string()));
                reader = returned;
            }
        }
    }
}
