#![cfg(feature = "std")]
//! Turn state machine of a single match.
//!
//! A [`Room`] is plain data driven by its control task (see [`task`]); it
//! never touches a transport, only the [`ResponseSink`](crate::sink::ResponseSink)
//! of each seated player.

use std::fmt;
use std::string::ToString;

use log::{debug, info};

use crate::ids::{PlayerId, RoomId};
use crate::player::Player;
use crate::protocol::{actions, CommandError, Response, RoomCommand, ShotReport};
use crate::schedule::ShipSchedule;
use crate::ship::{Direction, Position, Ship};

pub mod task;

/// Stage of the match gating which action is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, waiting for an opponent.
    Wait,
    Place,
    Shoot,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Wait => actions::WAIT,
            Phase::Place => actions::PLACE,
            Phase::Shoot => actions::SHOOT,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two seats an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

/// Whether the room keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Finished,
}

pub struct Room {
    id: RoomId,
    phase: Phase,
    first: Player,
    second: Option<Player>,
    current: Seat,
    schedule: ShipSchedule,
}

impl Room {
    /// A room in the `Wait` phase with `creator` holding the first turn.
    pub fn new(id: RoomId, creator: Player) -> Self {
        creator.send(Response::room_created(&id));
        info!("room {} created by {}", id, creator.id());
        Self {
            id,
            phase: Phase::Wait,
            first: creator,
            second: None,
            current: Seat::First,
            schedule: ShipSchedule::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seat whose turn it is.
    pub fn current(&self) -> Seat {
        self.current
    }

    /// Length the current placer has to place next.
    pub fn next_ship_length(&self) -> usize {
        self.schedule.current()
    }

    pub fn is_full(&self) -> bool {
        self.second.is_some()
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        match seat {
            Seat::First => Some(&self.first),
            Seat::Second => self.second.as_ref(),
        }
    }

    pub fn player_id(&self, seat: Seat) -> Option<&PlayerId> {
        self.player(seat).map(Player::id)
    }

    /// Seat the late joiner and start the placement phase.
    ///
    /// A full room hands the player back untouched.
    pub fn seat(&mut self, player: Player) -> Result<(), Player> {
        if self.second.is_some() || self.phase != Phase::Wait {
            return Err(player);
        }
        player.send(Response::room_joined(&self.id));
        info!("{} joined room {}", player.id(), self.id);
        self.second = Some(player);
        self.phase = Phase::Place;
        self.first.send(Response::place_ship(self.schedule.current()));
        Ok(())
    }

    /// Process one decoded request from `seat`.
    pub fn handle(&mut self, seat: Seat, command: Result<RoomCommand, CommandError>) -> Flow {
        if let Ok(RoomCommand::Exit) = command {
            return self.leave(seat, "Your opponent exited the game. Congratulations, you win!");
        }
        if seat != self.current {
            self.send_to(seat, Response::not_your_turn());
            return Flow::Continue;
        }
        let action = match &command {
            Ok(cmd) => cmd.action(),
            Err(e) => e.action.as_str(),
        };
        if action != self.phase.as_str() {
            self.send_to(
                seat,
                Response::retry(format!("Invalid action during phase: {}.", self.phase)),
            );
            return Flow::Continue;
        }
        match command {
            Err(e) => {
                self.send_to(seat, Response::retry(e.to_string()));
                Flow::Continue
            }
            Ok(RoomCommand::Place { origin, direction }) => self.place(origin, direction),
            Ok(RoomCommand::Shoot { target }) => self.shoot(target),
            Ok(RoomCommand::Exit) => Flow::Finished,
        }
    }

    /// The connection behind `seat` is gone.
    pub fn disconnect(&mut self, seat: Seat) -> Flow {
        self.leave(seat, "Your opponent disconnected. Congratulations, you win!")
    }

    /// Close both connections once every queued response is written.
    pub fn close(&self) {
        self.first.close();
        if let Some(second) = &self.second {
            second.close();
        }
    }

    fn leave(&self, seat: Seat, message: &str) -> Flow {
        info!("{:?} left room {}", self.player_id(seat), self.id);
        if let Some(opponent) = self.player(seat.other()) {
            opponent.send(Response::win(message));
        }
        Flow::Finished
    }

    fn send_to(&self, seat: Seat, response: Response) {
        if let Some(player) = self.player(seat) {
            player.send(response);
        }
    }

    fn swap(&mut self) {
        self.current = self.current.other();
    }

    fn place(&mut self, origin: Position, direction: Direction) -> Flow {
        let Some((current, next)) = turn(&mut self.first, &mut self.second, self.current) else {
            return Flow::Continue;
        };
        let placed = Ship::new(origin, direction, self.schedule.current())
            .and_then(|ship| current.board_mut().place_ship(&ship).map(|()| ship));
        let ship = match placed {
            Ok(ship) => ship,
            Err(e) => {
                current.send(Response::retry(e.to_string()));
                return Flow::Continue;
            }
        };
        current.send(Response::placed(&ship));
        debug!("{} placed {:?} in room {}", current.id(), ship, self.id);

        match self.schedule.advance() {
            Some(length) => next.send(Response::place_ship(length)),
            None => {
                info!("room {} starts shooting", self.id);
                self.phase = Phase::Shoot;
                next.send(Response::shoot(None));
            }
        }
        self.swap();
        Flow::Continue
    }

    fn shoot(&mut self, target: Position) -> Flow {
        let Some((current, next)) = turn(&mut self.first, &mut self.second, self.current) else {
            return Flow::Continue;
        };
        let resolved = next
            .board_mut()
            .receive_attack(target)
            .and_then(|outcome| current.board_mut().attack(target, outcome.hit).map(|()| outcome));
        let outcome = match resolved {
            Ok(outcome) => outcome,
            Err(e) => {
                current.send(Response::retry(e.to_string()));
                return Flow::Continue;
            }
        };

        if next.board().is_beaten() {
            info!("{} won room {}", current.id(), self.id);
            current.send(Response::win("Congratulations, you win!"));
            next.send(Response::lose());
            return Flow::Finished;
        }

        let report = ShotReport {
            target,
            hit: outcome.hit,
            sunk: outcome.sunk,
        };
        current.send(Response::shoot_outcome(&report));
        next.send(Response::shoot(Some(&report)));
        self.swap();
        Flow::Continue
    }
}

/// Current and next player, in that order, once both seats are taken.
fn turn<'a>(
    first: &'a mut Player,
    second: &'a mut Option<Player>,
    current: Seat,
) -> Option<(&'a mut Player, &'a mut Player)> {
    let second = second.as_mut()?;
    Some(match current {
        Seat::First => (first, second),
        Seat::Second => (second, first),
    })
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}
