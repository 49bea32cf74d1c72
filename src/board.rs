//! Per-player grids: ship placement, attack bookkeeping and sunk detection.

use core::fmt;

use crate::common::BoardError;
use crate::config::BOARD_SIZE;
use crate::ship::{Position, Ship};

const N: usize = BOARD_SIZE as usize;

type Grid = [[Cell; N]; N];

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// Buffer cell orthogonally adjacent to a placed ship.
    ShipArea,
    /// Ship segment that has not been hit.
    Taken,
    Hit,
    Miss,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::ShipArea => ',',
            Cell::Taken => 'S',
            Cell::Hit => 'X',
            Cell::Miss => 'o',
        }
    }
}

/// Outcome of an incoming attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub hit: bool,
    pub sunk: bool,
}

/// One player's view of the game: their own fleet and their shots at the
/// opponent.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    own: Grid,
    enemy: Grid,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a board with both grids empty.
    pub fn new() -> Self {
        Board {
            own: [[Cell::Empty; N]; N],
            enemy: [[Cell::Empty; N]; N],
        }
    }

    /// Cell of the own grid, `None` off the grid.
    pub fn own_cell(&self, p: Position) -> Option<Cell> {
        p.in_bounds().then(|| self.own[p.row as usize][p.col as usize])
    }

    /// Cell of the enemy view, `None` off the grid.
    pub fn enemy_cell(&self, p: Position) -> Option<Cell> {
        p.in_bounds().then(|| self.enemy[p.row as usize][p.col as usize])
    }

    fn own_mut(&mut self, p: Position) -> &mut Cell {
        &mut self.own[p.row as usize][p.col as usize]
    }

    /// Place a ship on the own grid.
    ///
    /// All-or-nothing: on error the board is left untouched. Buffer cells
    /// count as occupied, so ships can never touch orthogonally.
    pub fn place_ship(&mut self, ship: &Ship) -> Result<(), BoardError> {
        let positions = ship.positions()?;
        if positions
            .iter()
            .any(|p| self.own_cell(*p) != Some(Cell::Empty))
        {
            return Err(BoardError::FieldsAlreadyTaken);
        }
        for p in &positions {
            *self.own_mut(*p) = Cell::Taken;
            for n in p.neighbours() {
                if n.in_bounds() && self.own_cell(n) != Some(Cell::Taken) {
                    *self.own_mut(n) = Cell::ShipArea;
                }
            }
        }
        Ok(())
    }

    /// Record the outcome of a shot this player fired at the opponent.
    pub fn attack(&mut self, p: Position, hit: bool) -> Result<(), BoardError> {
        if !p.in_bounds() {
            return Err(BoardError::OutOfBounds);
        }
        self.enemy[p.row as usize][p.col as usize] = if hit { Cell::Hit } else { Cell::Miss };
        Ok(())
    }

    /// Resolve a shot fired at this player's fleet.
    pub fn receive_attack(&mut self, p: Position) -> Result<AttackOutcome, BoardError> {
        if !p.in_bounds() {
            return Err(BoardError::OutOfBounds);
        }
        if self.own_cell(p) == Some(Cell::Taken) {
            *self.own_mut(p) = Cell::Hit;
            Ok(AttackOutcome {
                hit: true,
                sunk: self.ship_is_sunk(p),
            })
        } else {
            *self.own_mut(p) = Cell::Miss;
            Ok(AttackOutcome {
                hit: false,
                sunk: false,
            })
        }
    }

    /// Whether the ship through `p` has no unhit segment left.
    ///
    /// Walks outwards along both axes; a walk ends at a buffer cell or the
    /// edge of the grid. Any `Taken` cell met on the way means the ship is
    /// still afloat.
    pub fn ship_is_sunk(&self, p: Position) -> bool {
        for dir in crate::ship::Direction::ALL {
            let delta = dir.delta();
            let mut cur = p.step(delta, 1);
            while let Some(cell) = self.own_cell(cur) {
                match cell {
                    Cell::Taken => return false,
                    Cell::ShipArea => break,
                    _ => cur = cur.step(delta, 1),
                }
            }
        }
        true
    }

    /// True once no unhit ship segment remains.
    pub fn is_beaten(&self) -> bool {
        self.own.iter().flatten().all(|c| *c != Cell::Taken)
    }

    /// Number of unhit ship segments.
    pub fn remaining_segments(&self) -> usize {
        self.own.iter().flatten().filter(|c| **c == Cell::Taken).count()
    }
}

fn write_grid(f: &mut fmt::Formatter<'_>, title: &str, grid: &Grid) -> fmt::Result {
    writeln!(f, "{}", title)?;
    write!(f, "  ")?;
    for c in 0..N {
        write!(f, " {}", c)?;
    }
    writeln!(f)?;
    for (r, row) in grid.iter().enumerate() {
        write!(f, " {}", (b'A' + r as u8) as char)?;
        for cell in row {
            write!(f, " {}", cell.symbol())?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, "Enemy fields:", &self.enemy)?;
        write_grid(f, "Own fields:", &self.own)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Board {{ remaining: {}, beaten: {} }}",
            self.remaining_segments(),
            self.is_beaten()
        )
    }
}
