//! Common error types shared by the grid model and the match engine.

use alloc::string::String;

/// Errors returned by ship geometry and board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Targeted position lies outside the grid.
    OutOfBounds,
    /// Some cell of the ship would lie outside the grid.
    ShipOutOfBounds,
    /// Direction name is not one of up/down/left/right.
    InvalidDirection(String),
    /// Ship length outside the supported range.
    InvalidLength(usize),
    /// At least one cell of the ship is not empty.
    FieldsAlreadyTaken,
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::OutOfBounds => write!(f, "position out of bounds"),
            BoardError::ShipOutOfBounds => write!(f, "ship goes out of bounds"),
            BoardError::InvalidDirection(d) => write!(f, "unknown positioning direction {}", d),
            BoardError::InvalidLength(n) => write!(f, "invalid ship length {}", n),
            BoardError::FieldsAlreadyTaken => write!(f, "some of the fields are already taken"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

/// Errors raised by matchmaking.
#[cfg(feature = "std")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    RoomNotFound(crate::ids::RoomId),
    RoomFull(crate::ids::RoomId),
    NoFreeRooms,
    UnknownPlayer(crate::ids::PlayerId),
}

#[cfg(feature = "std")]
impl core::fmt::Display for MatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatchError::RoomNotFound(id) => write!(f, "room with id {} doesn't exist", id),
            MatchError::RoomFull(id) => write!(f, "room {} is already full", id),
            MatchError::NoFreeRooms => write!(f, "there are no free rooms at the moment"),
            MatchError::UnknownPlayer(id) => write!(f, "player {} is not registered", id),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatchError {}
