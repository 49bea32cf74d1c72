#![cfg(feature = "std")]
//! Wire envelopes exchanged between clients and the server.

use std::collections::BTreeMap;
use std::string::{String, ToString};

use serde::{Deserialize, Serialize};

use crate::ids::{PlayerId, RoomId};
use crate::ship::{Position, Ship};

pub mod command;

pub use command::{CommandError, DecodeError, LobbyCommand, RoomCommand};

/// Action names used on the wire.
pub mod actions {
    pub const REGISTER: &str = "register";
    pub const EXIT: &str = "exit";
    pub const SHOOT: &str = "shoot";
    pub const SHOOT_OUTCOME: &str = "shoot-outcome";
    pub const PLACE: &str = "place";
    pub const PLACED: &str = "placed";
    pub const WAIT: &str = "wait";
    pub const RETRY: &str = "retry";
    pub const WIN: &str = "win";
    pub const LOSE: &str = "lose";
    pub const INFO: &str = "info";

    pub const LIST_ROOMS: &str = "ls-rooms";
    pub const CREATE_ROOM: &str = "create-room";
    pub const JOIN_ROOM: &str = "join-room";
    pub const JOIN_RANDOM: &str = "join-random";
}

/// Loosely typed argument value as carried by an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl std::fmt::Display for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgValue::Text(v) => f.write_str(v),
            ArgValue::Int(v) => write!(f, "{}", v),
            ArgValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Text(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Text(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        ArgValue::Int(v as i64)
    }
}

impl From<usize> for ArgValue {
    fn from(v: usize) -> Self {
        ArgValue::Int(v as i64)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Bool(v)
    }
}

pub type Args = BTreeMap<String, ArgValue>;

/// Build an [`Args`] map from `key => value` pairs.
#[macro_export]
macro_rules! args {
    () => { $crate::protocol::Args::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::protocol::Args::new();
        $( args.insert(::std::string::String::from($key), $crate::protocol::ArgValue::from($value)); )+
        args
    }};
}

/// Message sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub player_id: String,
    pub action: String,
    pub args: Args,
}

impl Request {
    pub fn new(player_id: impl Into<String>, action: impl Into<String>, args: Args) -> Self {
        Self {
            player_id: player_id.into(),
            action: action.into(),
            args,
        }
    }
}

/// Message sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub action: String,
    pub message: String,
    pub args: Args,
}

impl Response {
    pub fn new(action: impl Into<String>, message: impl Into<String>, args: Args) -> Self {
        Self {
            action: action.into(),
            message: message.into(),
            args,
        }
    }

    pub fn register(id: &PlayerId) -> Self {
        Self::new(actions::REGISTER, "Connected to server.", args! { "id" => id.as_str() })
    }

    pub fn info(rooms: &BTreeMap<RoomId, usize>) -> Self {
        let args = rooms
            .iter()
            .map(|(id, count)| (id.to_string(), ArgValue::from(*count)))
            .collect();
        Self::new(actions::INFO, "Rooms: ", args)
    }

    pub fn wait(message: impl Into<String>) -> Self {
        Self::new(actions::WAIT, message, Args::new())
    }

    pub fn room_created(id: &RoomId) -> Self {
        Self::new(
            actions::WAIT,
            format!(
                "You have created room {}. Wait for an opponent to join the room.",
                id
            ),
            args! { "id" => id.as_str() },
        )
    }

    pub fn room_joined(id: &RoomId) -> Self {
        Self::new(
            actions::WAIT,
            format!(
                "You have joined room {}. Wait for your opponent to make their turn.",
                id
            ),
            args! { "id" => id.as_str() },
        )
    }

    pub fn not_your_turn() -> Self {
        Self::wait("Wait for your opponent to make their turn.")
    }

    pub fn retry(message: impl Into<String>) -> Self {
        Self::new(actions::RETRY, message, Args::new())
    }

    pub fn place_ship(length: usize) -> Self {
        Self::new(
            actions::PLACE,
            format!("Select where to place ship with length {}", length),
            args! { "length" => length },
        )
    }

    pub fn placed(ship: &Ship) -> Self {
        let origin = ship.origin();
        Self::new(
            actions::PLACED,
            "Ship placed successfully. Wait for your opponent to make their turn.",
            args! {
                "x" => origin.row,
                "y" => origin.col,
                "direction" => ship.direction().as_str(),
                "length" => ship.length(),
            },
        )
    }

    /// Prompt to attack, optionally carrying the opponent's last shot.
    pub fn shoot(last: Option<&ShotReport>) -> Self {
        Self::new(
            actions::SHOOT,
            "Select field to attack.",
            last.map(ShotReport::args).unwrap_or_default(),
        )
    }

    pub fn shoot_outcome(report: &ShotReport) -> Self {
        let message = match (report.hit, report.sunk) {
            (true, true) => "Hit and sunk!",
            (true, false) => "Hit.",
            _ => "Miss.",
        };
        Self::new(actions::SHOOT_OUTCOME, message, report.args())
    }

    pub fn win(message: impl Into<String>) -> Self {
        Self::new(actions::WIN, message, Args::new())
    }

    pub fn lose() -> Self {
        Self::new(actions::LOSE, "Defeat!", Args::new())
    }
}

/// Resolved shot as reported to both seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotReport {
    pub target: Position,
    pub hit: bool,
    pub sunk: bool,
}

impl ShotReport {
    fn args(&self) -> Args {
        args! {
            "hit" => self.hit,
            "sunk" => self.sunk,
            "x" => self.target.row,
            "y" => self.target.col,
        }
    }

    /// Read a report back from response args.
    pub fn from_args(args: &Args) -> Result<Self, DecodeError> {
        Ok(Self {
            target: command::position_arg(args)?,
            hit: command::bool_arg(args, "hit")?,
            sunk: command::bool_arg(args, "sunk").unwrap_or(false),
        })
    }
}
