/*
host.rs

Copyright 2025 Hervé Quatremain

This file is part of Jigtile.

Jigtile is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Jigtile is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Jigtile. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Terminal front end.
//!
//! The main loop is the only place where the [`Session`] object is modified. Three kinds of
//! producers send it [`Event`] messages through a channel:
//!
//! * a thread that reads the player commands from the standard input,
//! * a thread that sends a tick every second,
//! * a short-lived thread per uploaded image, which sends the cropped image.

use log::debug;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use async_channel::Sender;
use jigtile::config::{self, Settings};
use jigtile::cropper::{self, CroppedImage, ImageDecodeError};
use jigtile::payload::DragPayload;
use jigtile::render::{self, TileBackground};
use jigtile::session::{Intent, Notification, Session, UploadTicket};

const HELP: &str = "Commands:
  show                       display the grid and the tray
  place <tile> <cell|tray>   move a tile
  drag <tile>                print the drag data for a tile
  drop <data> <cell|tray>    drop a tile using its drag data
  css <tile>                 print the CSS background of a tile
  shuffle                    shuffle the tiles
  insert                     put all the tray tiles on the grid
  reset                      start again
  grid <size>                start again with another grid size
  image <file>               start again with another picture
  reward                     open the reward
  close                      close the reward
  help                       display this help
  quit                       leave the game";

/// Messages processed by the main loop.
enum Event {
    /// A line typed by the player.
    Line(String),

    /// One second elapsed.
    Tick,

    /// An uploaded image is ready, or failed.
    Cropped {
        ticket: UploadTicket,
        result: Result<CroppedImage, ImageDecodeError>,
    },

    /// The standard input is closed.
    InputClosed,
}

/// Player commands.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Show,
    Help,
    Quit,
    Drag(usize),
    Css(usize),
    Upload(PathBuf),
    Play(Intent),
}

/// Parse a cell number, or `tray`.
fn parse_target(word: Option<&str>) -> Result<Option<usize>, String> {
    match word {
        Some("tray") => Ok(None),
        Some(w) => w
            .parse::<usize>()
            .map(Some)
            .map_err(|_| format!("Invalid cell: {w}")),
        None => Err("Missing target cell".to_string()),
    }
}

/// Parse a tile identifier.
fn parse_tile(word: Option<&str>) -> Result<usize, String> {
    match word {
        Some(w) => w.parse::<usize>().map_err(|_| format!("Invalid tile: {w}")),
        None => Err("Missing tile".to_string()),
    }
}

/// Parse a line typed by the player.
fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Show);
    };

    let command: Command = match verb {
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "place" => {
            let tile_id: usize = parse_tile(words.next())?;
            let target: Option<usize> = parse_target(words.next())?;
            Command::Play(Intent::Place { tile_id, target })
        }
        "drag" => Command::Drag(parse_tile(words.next())?),
        "drop" => {
            // The drag data is kept as is: the session decides whether it is usable
            let payload: String = words.next().unwrap_or_default().to_string();
            let target: Option<usize> = parse_target(words.next())?;
            Command::Play(Intent::Drop { payload, target })
        }
        "css" => Command::Css(parse_tile(words.next())?),
        "shuffle" => Command::Play(Intent::Shuffle),
        "insert" => Command::Play(Intent::InsertAll),
        "reset" => Command::Play(Intent::Reset),
        "grid" => {
            let size: usize = match words.next().map(str::parse::<usize>) {
                Some(Ok(s)) => s,
                _ => return Err("Usage: grid <size>".to_string()),
            };
            config::check_grid_size(size).map_err(|err| err.to_string())?;
            Command::Play(Intent::ChangeGridSize(size))
        }
        "image" => match words.next() {
            Some(path) => Command::Upload(PathBuf::from(path)),
            None => return Err("Usage: image <file>".to_string()),
        },
        "reward" => Command::Play(Intent::OpenReward),
        "close" => Command::Play(Intent::CloseReward),
        _ => return Err(format!("Unknown command: {verb}. Type `help` for the list.")),
    };
    Ok(command)
}

/// Read the player commands from the standard input.
fn spawn_input_reader(sender: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if sender.send_blocking(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = sender.send_blocking(Event::InputClosed);
    });
}

/// Send a tick every second.
fn spawn_ticker(sender: Sender<Event>) {
    thread::spawn(move || {
        loop {
            thread::sleep(Duration::from_secs(1));
            if sender.send_blocking(Event::Tick).is_err() {
                break;
            }
        }
    });
}

/// Crop the uploaded image in the background.
fn spawn_upload(session: &mut Session, path: PathBuf, sender: &Sender<Event>) {
    let bytes: Vec<u8> = match std::fs::read(&path) {
        Ok(b) => b,
        Err(err) => {
            println!("Cannot read {}: {err}", path.display());
            return;
        }
    };
    let ticket: UploadTicket = session.begin_upload();
    let options = session.settings().crop_options();
    let sender: Sender<Event> = sender.clone();
    debug!("Upload {ticket:?}: {} bytes from {path:?}", bytes.len());

    thread::spawn(move || {
        let result = pollster::block_on(cropper::crop_to_square(bytes, options));
        let _ = sender.send_blocking(Event::Cropped { ticket, result });
    });
    println!("Processing {}...", path.display());
}

fn show(session: &Session) {
    let state = session.state();
    println!(
        "\n{} | {}x{} | {}{}",
        session.image(),
        session.grid_size(),
        session.grid_size(),
        session.timer().format_clock(),
        if state.solved { " | solved" } else { "" }
    );
    println!("{}", render::board_text(session.tiles()));
    println!("{}", render::tray_text(session.tiles()));
}

fn notify(session: &Session, notification: Notification) {
    match notification {
        Notification::Solved { elapsed_seconds } => {
            println!(
                "Congratulations! You solved the puzzle in {elapsed_seconds} seconds. \
                 Type `reward` to get your reward!"
            );
        }
        Notification::RewardLocked => {
            println!("Finish the puzzle first to unlock the reward!");
        }
        Notification::RewardOpened => {
            let when: String = session
                .solved_at()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            println!("*** Well done! ***");
            println!("You completed the puzzle on {when}");
            println!("Time: {}", session.timer().format_clock());
            println!("Type `close` to close.");
        }
        Notification::ImageChanged => {
            println!("New image loaded.");
            show(session);
        }
        Notification::ImageFailed(msg) => {
            println!("Failed to process the image: {msg}");
        }
    }
}

/// Execute a player command.
fn handle(session: &mut Session, command: Command, sender: &Sender<Event>) {
    match command {
        Command::Show => show(session),
        Command::Help => println!("{HELP}"),
        Command::Quit => (),
        Command::Drag(tile_id) => match session.tiles().tile(tile_id) {
            Some(tile) => println!("{}", DragPayload::for_tile(tile).to_json()),
            None => println!("Unknown tile {tile_id}"),
        },
        Command::Css(tile_id) => match session.tiles().tile(tile_id) {
            Some(tile) => {
                let background =
                    TileBackground::for_tile(tile.correct_position(), session.grid_size());
                println!("{}", background.to_css(session.image().url()));
            }
            None => println!("Unknown tile {tile_id}"),
        },
        Command::Upload(path) => spawn_upload(session, path, sender),
        Command::Play(intent) => {
            let redraw: bool = !matches!(intent, Intent::OpenReward | Intent::CloseReward);
            let notification: Option<Notification> = session.dispatch(intent);
            if redraw {
                show(session);
            }
            if let Some(n) = notification {
                notify(session, n);
            }
        }
    }
}

/// Run the game until the player quits.
pub fn run(settings: Settings) -> ExitCode {
    let mut session: Session = Session::new(settings);
    let (sender, receiver) = async_channel::unbounded::<Event>();

    spawn_input_reader(sender.clone());
    spawn_ticker(sender.clone());

    println!("{HELP}");
    show(&session);

    while let Ok(event) = receiver.recv_blocking() {
        match event {
            Event::Line(line) => match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => handle(&mut session, command, &sender),
                Err(msg) => println!("{msg}"),
            },
            Event::Tick => {
                session.dispatch(Intent::Tick);
            }
            Event::Cropped { ticket, result } => {
                if let Some(n) = session.finish_upload(ticket, result) {
                    notify(&session, n);
                }
            }
            Event::InputClosed => break,
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_player_commands() {
        assert_eq!(parse_command(""), Ok(Command::Show));
        assert_eq!(
            parse_command("place 3 7"),
            Ok(Command::Play(Intent::Place {
                tile_id: 3,
                target: Some(7)
            }))
        );
        assert_eq!(
            parse_command("place 3 tray"),
            Ok(Command::Play(Intent::Place {
                tile_id: 3,
                target: None
            }))
        );
        assert_eq!(
            parse_command("grid 4"),
            Ok(Command::Play(Intent::ChangeGridSize(4)))
        );
        assert_eq!(
            parse_command("image photo.png"),
            Ok(Command::Upload(PathBuf::from("photo.png")))
        );
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn drop_keeps_the_raw_payload() {
        assert_eq!(
            parse_command("drop garbage 2"),
            Ok(Command::Play(Intent::Drop {
                payload: "garbage".to_string(),
                target: Some(2)
            }))
        );
    }

    #[test]
    fn invalid_commands() {
        assert!(parse_command("place x 1").is_err());
        assert!(parse_command("place 1").is_err());
        assert!(parse_command("grid 1").is_err());
        assert!(parse_command("grid").is_err());
        assert!(parse_command("image").is_err());
        assert!(parse_command("dance").is_err());
    }
}
