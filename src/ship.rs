//! Ship placement descriptors and their geometry.

use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::common::BoardError;
use crate::config::{BOARD_SIZE, MAX_SHIP_LENGTH, MIN_SHIP_LENGTH};

/// A cell coordinate. `row` grows downwards, `col` grows to the right.
///
/// Values are signed so that positions decoded from the wire can be
/// represented before they are bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether the position lies on the grid.
    pub fn in_bounds(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// Orthogonal neighbours, including ones off the grid.
    pub fn neighbours(&self) -> [Position; 4] {
        [
            Position::new(self.row - 1, self.col),
            Position::new(self.row + 1, self.col),
            Position::new(self.row, self.col - 1),
            Position::new(self.row, self.col + 1),
        ]
    }

    pub(crate) fn step(&self, (dr, dc): (i32, i32), n: i32) -> Position {
        Position::new(self.row + dr * n, self.col + dc * n)
    }
}

/// Direction in which a ship extends from its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step as `(row, col)` delta.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(BoardError::InvalidDirection(other.to_string())),
        }
    }
}

/// A ship to be placed: origin cell, direction and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    origin: Position,
    direction: Direction,
    length: usize,
}

impl Ship {
    /// Describe a ship. Lengths outside `MIN_SHIP_LENGTH..=MAX_SHIP_LENGTH`
    /// are rejected; bounds are checked by [`Ship::positions`].
    pub fn new(origin: Position, direction: Direction, length: usize) -> Result<Self, BoardError> {
        if !(MIN_SHIP_LENGTH..=MAX_SHIP_LENGTH).contains(&length) {
            return Err(BoardError::InvalidLength(length));
        }
        Ok(Self {
            origin,
            direction,
            length,
        })
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Last cell covered by the ship.
    pub fn terminal(&self) -> Position {
        self.origin
            .step(self.direction.delta(), self.length as i32 - 1)
    }

    /// Cells covered by the ship, starting at the origin.
    ///
    /// Both ends are bounds-checked before anything is generated, so an
    /// error never comes with a partial result.
    pub fn positions(&self) -> Result<Vec<Position>, BoardError> {
        if !self.origin.in_bounds() || !self.terminal().in_bounds() {
            return Err(BoardError::ShipOutOfBounds);
        }
        let delta = self.direction.delta();
        Ok((0..self.length as i32)
            .map(|i| self.origin.step(delta, i))
            .collect())
    }
}
