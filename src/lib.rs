#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod board;
mod common;
mod config;
mod schedule;
mod ship;

#[cfg(feature = "std")]
mod client;
#[cfg(feature = "std")]
pub mod ids;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
mod player;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod registry;
#[cfg(feature = "std")]
pub mod room;
#[cfg(feature = "std")]
mod server;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod sink;
#[cfg(feature = "std")]
pub mod tasks;
#[cfg(feature = "std")]
pub mod transport;

pub use board::*;
pub use common::*;
pub use config::*;
pub use schedule::*;
pub use ship::*;

#[cfg(feature = "std")]
pub use client::{parse_command, parse_coordinate, run_client, ClientView};
#[cfg(feature = "std")]
pub use ids::{PlayerId, RoomId};
#[cfg(feature = "std")]
pub use logging::{init_logging, level_from_env};
#[cfg(feature = "std")]
pub use player::Player;
#[cfg(feature = "std")]
pub use protocol::{ArgValue, Args, LobbyCommand, Request, Response, RoomCommand, ShotReport};
#[cfg(feature = "std")]
pub use registry::{MatchRegistry, RegistryHandle, Seating};
#[cfg(feature = "std")]
pub use room::{Flow, Phase, Room, Seat};
#[cfg(feature = "std")]
pub use server::Server;
#[cfg(feature = "std")]
pub use session::serve_connection;
#[cfg(feature = "std")]
pub use sink::{Outbox, ResponseSink};
#[cfg(feature = "std")]
pub use transport::in_memory::InMemoryTransport;
#[cfg(feature = "std")]
pub use transport::tcp::TcpTransport;
