#![cfg(feature = "std")]

use std::sync::Arc;

use crate::board::Board;
use crate::ids::PlayerId;
use crate::protocol::Response;
use crate::sink::ResponseSink;

/// A seated participant: identity, private board and the way to reach
/// their connection.
pub struct Player {
    id: PlayerId,
    board: Board,
    sink: Arc<dyn ResponseSink>,
}

impl Player {
    pub fn new(id: PlayerId, sink: Arc<dyn ResponseSink>) -> Self {
        Self {
            id,
            board: Board::new(),
            sink,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn send(&self, response: Response) {
        self.sink.send(response);
    }

    pub fn close(&self) {
        self.sink.close();
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("board", &self.board)
            .finish()
    }
}
