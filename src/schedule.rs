//! Countdown of ship sizes still to be placed in a room.

use crate::config::{MAX_SHIP_LENGTH, MIN_SHIP_LENGTH, SHIP_SCHEDULE};

/// Largest-first schedule of ship lengths, shared by both seats of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipSchedule {
    remaining: [usize; MAX_SHIP_LENGTH + 1],
    next: usize,
}

impl Default for ShipSchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl ShipSchedule {
    pub fn new() -> Self {
        let mut remaining = [0; MAX_SHIP_LENGTH + 1];
        for (length, count) in SHIP_SCHEDULE {
            remaining[length] = count;
        }
        Self {
            remaining,
            next: MAX_SHIP_LENGTH,
        }
    }

    /// Length of the ship that must be placed now.
    pub fn current(&self) -> usize {
        self.next
    }

    /// How many ships of `length` the schedule still holds.
    pub fn remaining(&self, length: usize) -> usize {
        self.remaining.get(length).copied().unwrap_or(0)
    }

    /// Draw the next length, or `None` once every count is used up.
    pub fn advance(&mut self) -> Option<usize> {
        while self.next >= MIN_SHIP_LENGTH {
            if self.remaining[self.next] > 0 {
                self.remaining[self.next] -= 1;
                return Some(self.next);
            }
            self.next -= 1;
        }
        None
    }

    pub fn is_exhausted(&self) -> bool {
        self.next < MIN_SHIP_LENGTH
    }
}
