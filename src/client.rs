#![cfg(feature = "std")]
//! Line-oriented terminal client.
//!
//! Everything typed is turned into a [`Request`]; every [`Response`] is
//! printed, and the local view of both grids is kept in a [`Board`] mirror.

use std::string::{String, ToString};

use anyhow::{anyhow, bail};
use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::args;
use crate::board::Board;
use crate::config::BOARD_SIZE;
use crate::protocol::command::{int_arg, position_arg, text_arg};
use crate::protocol::{actions, Args, Request, Response, ShotReport};
use crate::ship::{Direction, Position, Ship};
use crate::transport::tcp::TcpTransport;
use crate::transport::{FrameReceiver, FrameSender, Transport};

const HELP: &str = "\
commands:
  ls-rooms                  list rooms and their player counts
  create-room               open a new room
  join-room <id>            join the room with that id
  join-random               join any room waiting for an opponent
  place <coord> <dir>       place a ship, e.g. `place C4 down`
  shoot <coord>             attack a field, e.g. `shoot J0`
  exit                      leave";

/// Parse a field name such as `C4`: row letter `A`-`J`, then column `0`-`9`.
pub fn parse_coordinate(s: &str) -> anyhow::Result<Position> {
    let s = s.trim();
    let mut chars = s.chars();
    let row = chars
        .next()
        .filter(char::is_ascii_alphabetic)
        .ok_or_else(|| anyhow!("invalid coordinate {:?}", s))?;
    let row = (row.to_ascii_uppercase() as u8 - b'A') as i32;
    let col: i32 = chars
        .as_str()
        .parse()
        .map_err(|_| anyhow!("invalid coordinate {:?}", s))?;
    let pos = Position::new(row, col);
    if !pos.in_bounds() {
        bail!("coordinate {} is outside the {}x{} grid", s, BOARD_SIZE, BOARD_SIZE);
    }
    Ok(pos)
}

fn position_args(pos: Position) -> Args {
    args! { "x" => pos.row, "y" => pos.col }
}

/// Turn one input line into a request on behalf of `player_id`.
pub fn parse_command(line: &str, player_id: &str) -> anyhow::Result<Request> {
    let mut words = line.split_whitespace();
    let action = words.next().ok_or_else(|| anyhow!("empty command"))?;
    let args = match action {
        actions::LIST_ROOMS | actions::CREATE_ROOM | actions::JOIN_RANDOM | actions::EXIT => {
            Args::new()
        }
        actions::JOIN_ROOM => {
            let id = words.next().ok_or_else(|| anyhow!("usage: join-room <id>"))?;
            args! { "roomId" => id }
        }
        actions::PLACE => {
            let (Some(coord), Some(dir)) = (words.next(), words.next()) else {
                bail!("usage: place <coord> <up|down|left|right>");
            };
            let direction: Direction = dir.parse()?;
            let mut args = position_args(parse_coordinate(coord)?);
            args.insert("direction".to_string(), direction.as_str().into());
            args
        }
        actions::SHOOT => {
            let coord = words.next().ok_or_else(|| anyhow!("usage: shoot <coord>"))?;
            position_args(parse_coordinate(coord)?)
        }
        other => bail!("unknown command {:?}\n{}", other, HELP),
    };
    if words.next().is_some() {
        bail!("too many arguments for {}", action);
    }
    Ok(Request::new(player_id, action, args))
}

/// What the client knows: its id and a mirror of both grids.
#[derive(Debug, Default)]
pub struct ClientView {
    pub player_id: Option<String>,
    pub board: Board,
}

impl ClientView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a response into the view. Returns true when the board changed.
    pub fn apply(&mut self, response: &Response) -> anyhow::Result<bool> {
        let args = &response.args;
        match response.action.as_str() {
            actions::REGISTER => {
                self.player_id = Some(text_arg(args, "id")?.to_string());
                Ok(false)
            }
            actions::PLACED => {
                let direction: Direction = text_arg(args, "direction")?.parse()?;
                let length = int_arg(args, "length")? as usize;
                let ship = Ship::new(position_arg(args)?, direction, length)?;
                self.board.place_ship(&ship)?;
                Ok(true)
            }
            actions::SHOOT_OUTCOME => {
                let report = ShotReport::from_args(args)?;
                self.board.attack(report.target, report.hit)?;
                Ok(true)
            }
            actions::SHOOT if !args.is_empty() => {
                let report = ShotReport::from_args(args)?;
                self.board.receive_attack(report.target)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

fn render(response: &Response) -> String {
    let mut out = format!("[{}] {}", response.action, response.message);
    if response.action == actions::INFO {
        if response.args.is_empty() {
            out.push_str("none");
        }
        for (id, count) in &response.args {
            out.push_str(&format!("\n  {} ({} players)", id, count));
        }
    }
    out
}

async fn print_responses<R>(mut reader: R, id: watch::Sender<String>)
where
    R: FrameReceiver<Response> + Send + 'static,
{
    let mut view = ClientView::new();
    loop {
        let response = match reader.recv().await {
            Ok(response) => response,
            Err(e) => {
                println!("disconnected: {}", e);
                return;
            }
        };
        println!("{}", render(&response));
        match view.apply(&response) {
            Ok(true) => println!("{}", view.board),
            Ok(false) => {}
            Err(e) => debug!("could not mirror {}: {}", response.action, e),
        }
        if let Some(player_id) = &view.player_id {
            id.send_if_modified(|current| {
                if *current == *player_id {
                    return false;
                }
                *current = player_id.clone();
                true
            });
        }
    }
}

/// Connect to `addr` and relay stdin to the server until either side quits.
pub async fn run_client(addr: &str) -> anyhow::Result<()> {
    let transport = TcpTransport::connect(addr).await?;
    let (reader, mut writer) = Transport::<Response, Request>::split(transport);
    let (id_tx, id_rx) = watch::channel(String::new());
    let mut printer = tokio::spawn(print_responses(reader, id_tx));
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = &mut printer => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let request = match parse_command(&line, &id_rx.borrow()) {
                    Ok(request) => request,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                let leaving = request.action == actions::EXIT;
                writer.send(request).await?;
                if leaving {
                    break;
                }
            }
        }
    }
    writer.close().await?;
    Ok(())
}
