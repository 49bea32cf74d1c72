//! Typed commands decoded from request envelopes.
//!
//! Everything past this module works with these enums; the loosely typed
//! argument maps stop here.

use std::fmt;
use std::string::{String, ToString};

use super::{actions, ArgValue, Args, Request};
use crate::ids::RoomId;
use crate::ship::{Direction, Position};

/// Why a request could not be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    UnknownAction(String),
    Missing(&'static str),
    Invalid(&'static str),
    InvalidDirection(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownAction(a) => write!(f, "unknown action {}", a),
            DecodeError::Missing(key) => write!(f, "missing value for {}", key),
            DecodeError::Invalid(key) => write!(f, "invalid value for {}", key),
            DecodeError::InvalidDirection(d) => write!(f, "unknown positioning direction {}", d),
        }
    }
}

impl std::error::Error for DecodeError {}

/// A request that names an action but could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    pub action: String,
    pub reason: DecodeError,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reason.fmt(f)
    }
}

/// Actions accepted before a player is seated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyCommand {
    Exit,
    ListRooms,
    CreateRoom,
    JoinRoom(RoomId),
    JoinRandom,
}

impl LobbyCommand {
    pub fn decode(req: &Request) -> Result<Self, DecodeError> {
        match req.action.as_str() {
            actions::EXIT => Ok(LobbyCommand::Exit),
            actions::LIST_ROOMS => Ok(LobbyCommand::ListRooms),
            actions::CREATE_ROOM => Ok(LobbyCommand::CreateRoom),
            actions::JOIN_ROOM => {
                let id = text_arg(&req.args, "roomId")?;
                if id.trim().is_empty() {
                    return Err(DecodeError::Invalid("roomId"));
                }
                Ok(LobbyCommand::JoinRoom(RoomId::new(id.trim())))
            }
            actions::JOIN_RANDOM => Ok(LobbyCommand::JoinRandom),
            other => Err(DecodeError::UnknownAction(other.to_string())),
        }
    }
}

/// Actions accepted inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomCommand {
    Place { origin: Position, direction: Direction },
    Shoot { target: Position },
    Exit,
}

impl RoomCommand {
    /// Wire name of the action.
    pub fn action(&self) -> &'static str {
        match self {
            RoomCommand::Place { .. } => actions::PLACE,
            RoomCommand::Shoot { .. } => actions::SHOOT,
            RoomCommand::Exit => actions::EXIT,
        }
    }

    pub fn decode(req: &Request) -> Result<Self, CommandError> {
        let fail = |reason| CommandError {
            action: req.action.clone(),
            reason,
        };
        match req.action.as_str() {
            actions::PLACE => {
                let origin = position_arg(&req.args).map_err(fail)?;
                let direction = text_arg(&req.args, "direction").map_err(fail)?;
                let direction = direction
                    .parse::<Direction>()
                    .map_err(|_| fail(DecodeError::InvalidDirection(direction.to_string())))?;
                Ok(RoomCommand::Place { origin, direction })
            }
            actions::SHOOT => Ok(RoomCommand::Shoot {
                target: position_arg(&req.args).map_err(fail)?,
            }),
            actions::EXIT => Ok(RoomCommand::Exit),
            other => Err(fail(DecodeError::UnknownAction(other.to_string()))),
        }
    }
}

/// Integer argument; decimal strings are accepted as well.
pub fn int_arg(args: &Args, key: &'static str) -> Result<i32, DecodeError> {
    match args.get(key) {
        None => Err(DecodeError::Missing(key)),
        Some(ArgValue::Int(v)) => i32::try_from(*v).map_err(|_| DecodeError::Invalid(key)),
        Some(ArgValue::Text(s)) => s.trim().parse().map_err(|_| DecodeError::Invalid(key)),
        Some(ArgValue::Bool(_)) => Err(DecodeError::Invalid(key)),
    }
}

pub fn text_arg<'a>(args: &'a Args, key: &'static str) -> Result<&'a str, DecodeError> {
    match args.get(key) {
        None => Err(DecodeError::Missing(key)),
        Some(ArgValue::Text(s)) => Ok(s),
        Some(_) => Err(DecodeError::Invalid(key)),
    }
}

pub fn bool_arg(args: &Args, key: &'static str) -> Result<bool, DecodeError> {
    match args.get(key) {
        None => Err(DecodeError::Missing(key)),
        Some(ArgValue::Bool(b)) => Ok(*b),
        Some(ArgValue::Text(s)) => s.trim().parse().map_err(|_| DecodeError::Invalid(key)),
        Some(ArgValue::Int(_)) => Err(DecodeError::Invalid(key)),
    }
}

/// The `x` (row) and `y` (column) pair.
pub fn position_arg(args: &Args) -> Result<Position, DecodeError> {
    Ok(Position::new(int_arg(args, "x")?, int_arg(args, "y")?))
}
