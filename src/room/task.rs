//! Control task owning a [`Room`] for its whole life.

use std::string::ToString;
use std::sync::Arc;

use log::{debug, info, trace};
use tokio::sync::{mpsc, oneshot};

use super::{Flow, Room, Seat};
use crate::ids::{PlayerId, RoomId};
use crate::player::Player;
use crate::common::MatchError;
use crate::protocol::{Request, Response, RoomCommand};
use crate::sink::ResponseSink;
use crate::tasks::TaskControl;
use crate::transport::BoxReceiver;

/// Receiving half of a player's connection.
pub type SeatReader = BoxReceiver<Request>;

/// A player handed over to a room together with their connection.
pub struct Seated {
    pub id: PlayerId,
    pub sink: Arc<dyn ResponseSink>,
    pub reader: SeatReader,
}

/// What a seat's read task forwards to the room.
#[derive(Debug)]
pub enum SeatEvent {
    Request(Request),
    Disconnected,
}

/// Drive the room created by `creator` until the match ends or `stop` fires.
///
/// Late joiners arrive on `joins`; only the first one is seated.
pub async fn run_room(
    id: RoomId,
    creator: Seated,
    mut joins: mpsc::Receiver<Seated>,
    mut stop: oneshot::Receiver<()>,
) {
    let (first_tx, mut first_rx) = mpsc::unbounded_channel();
    let (second_tx, mut second_rx) = mpsc::unbounded_channel();
    let mut second_tx = Some(second_tx);

    let mut readers = vec![spawn_reader(creator.reader, creator.sink.clone(), first_tx)];
    let mut room = Room::new(id, Player::new(creator.id, creator.sink));
    let mut awaiting = true;

    loop {
        let flow = tokio::select! {
            biased;
            _ = &mut stop => {
                info!("room {} stopped", room.id());
                break;
            }
            joined = joins.recv(), if awaiting => match joined {
                Some(joiner) => {
                    let (reader, sink) = (joiner.reader, joiner.sink.clone());
                    match room.seat(Player::new(joiner.id, joiner.sink)) {
                        Ok(()) => {
                            awaiting = false;
                            if let Some(tx) = second_tx.take() {
                                readers.push(spawn_reader(reader, sink, tx));
                            }
                        }
                        Err(player) => {
                            debug!("room {} is full, refusing {}", room.id(), player.id());
                            player.close();
                        }
                    }
                    Flow::Continue
                }
                None => {
                    awaiting = false;
                    Flow::Continue
                }
            },
            Some(event) = first_rx.recv() => dispatch(&mut room, Seat::First, event),
            Some(event) = second_rx.recv() => dispatch(&mut room, Seat::Second, event),
            else => break,
        };
        if flow == Flow::Finished {
            break;
        }
    }

    joins.close();
    room.close();
    first_rx.close();
    second_rx.close();
    for reader in readers {
        reader.stop().await;
    }
    while let Ok(late) = joins.try_recv() {
        debug!("room {} closed before {} could be seated", room.id(), late.id);
        late.sink
            .send(Response::retry(MatchError::RoomNotFound(room.id().clone()).to_string()));
        late.sink.close();
    }
    info!("room {} closed", room.id());
}

fn dispatch(room: &mut Room, seat: Seat, event: SeatEvent) -> Flow {
    trace!("room {} got {:?} from {:?}", room.id(), event, seat);
    match event {
        SeatEvent::Request(request) => room.handle(seat, RoomCommand::decode(&request)),
        SeatEvent::Disconnected => room.disconnect(seat),
    }
}

/// Forward everything read from `reader` until the task is stopped. A failed
/// read, or a failed write to `sink`, ends the seat with `Disconnected`.
fn spawn_reader(
    mut reader: SeatReader,
    sink: Arc<dyn ResponseSink>,
    events: mpsc::UnboundedSender<SeatEvent>,
) -> TaskControl {
    TaskControl::spawn(move |mut stop| async move {
        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = sink.failed() => {
                    debug!("seat connection lost: write failed");
                    let _ = events.send(SeatEvent::Disconnected);
                    break;
                }
                read = reader.recv() => match read {
                    Ok(request) => {
                        if events.send(SeatEvent::Request(request)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!("seat connection lost: {}", e);
                        let _ = events.send(SeatEvent::Disconnected);
                        break;
                    }
                },
            }
        }
    })
}
