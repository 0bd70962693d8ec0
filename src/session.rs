/*
session.rs

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

//! Manage the status of a puzzle in progress.
//!
//! The host owns one [`Session`] object and sends it every player action and every timer tick
//! as an [`Intent`]. [`Session::dispatch`] computes the new tile set with the functions from
//! [`crate::placement`], checks for completion, and returns a [`Notification`] when the host
//! has something to tell the player.
//!
//! Image uploads are asynchronous. The host asks for an [`UploadTicket`] before starting the
//! cropping work, and hands the result back with [`Session::finish_upload`]. Only the result of
//! the most recent upload is applied.

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::completion;
use crate::config::{self, ImageSource, Settings};
use crate::cropper::{CroppedImage, ImageDecodeError};
use crate::payload::DragPayload;
use crate::placement::{self, Move};
use crate::tiles::{Partition, TileSet};
use crate::timer::SessionTimer;

/// Player actions and timer events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Drop a tile on a grid cell, or in the tray when `target` is None.
    Place { tile_id: usize, target: Option<usize> },

    /// Drop with the raw drag data, as received from the drag and drop gesture.
    Drop {
        payload: String,
        target: Option<usize>,
    },

    /// Shuffle, according to [`Settings::shuffle_mode`].
    Shuffle,

    /// Put all the tray tiles on the grid.
    InsertAll,

    /// Start the same puzzle again with new tiles.
    Reset,

    /// Start a new puzzle with a different number of tiles.
    ChangeGridSize(usize),

    /// Start a new puzzle with a different image.
    ChangeImage(ImageSource),

    /// One second elapsed.
    Tick,

    /// Show the reward.
    OpenReward,

    /// Hide the reward.
    CloseReward,
}

/// Messages for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The puzzle has just been solved.
    Solved { elapsed_seconds: u64 },

    /// The player asked for the reward before solving the puzzle.
    RewardLocked,

    /// The reward is now visible.
    RewardOpened,

    /// The uploaded image replaced the reference image.
    ImageChanged,

    /// The uploaded image cannot be used. The previous image is kept.
    ImageFailed(String),
}

/// Snapshot of the timer and completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub elapsed_seconds: u64,
    pub timer_running: bool,
    pub solved: bool,
}

/// Identifies an upload in progress. See [`Session::begin_upload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

/// Puzzle in progress.
#[derive(Debug)]
pub struct Session {
    /// Game settings. The grid size and the image change during the session.
    settings: Settings,

    /// The tiles.
    tiles: TileSet,

    /// Time spent on the current puzzle.
    timer: SessionTimer,

    /// Whether the current puzzle is solved. Placement actions are ignored once solved.
    solved: bool,

    /// Completion time of the current puzzle.
    solved_at: Option<DateTime<Local>>,

    /// Whether the reward is visible.
    reward_open: bool,

    /// Number of the most recent upload.
    upload_generation: u64,

    /// Random number generator for shuffling.
    rng: StdRng,
}

impl Session {
    /// Create a [`Session`] object and start a puzzle.
    pub fn new(settings: Settings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    /// Create a [`Session`] object that shuffles with the provided generator.
    pub fn with_rng(settings: Settings, rng: StdRng) -> Self {
        let mut session = Self {
            settings,
            tiles: TileSet::default(),
            timer: SessionTimer::new(),
            solved: false,
            solved_at: None,
            reward_open: false,
            upload_generation: 0,
            rng,
        };
        session.restart();
        session
    }

    /// Start the puzzle again: new tiles, timer back to zero.
    pub fn restart(&mut self) {
        self.tiles = TileSet::new(
            self.settings.grid_size,
            self.settings.initial_layout,
            &mut self.rng,
        );
        self.timer.start();
        self.solved = false;
        self.solved_at = None;
        self.reward_open = false;
        info!(
            "New {}x{} puzzle with {}",
            self.settings.grid_size, self.settings.grid_size, self.settings.image
        );
    }

    /// Process a player action or a timer tick.
    pub fn dispatch(&mut self, intent: Intent) -> Option<Notification> {
        match intent {
            Intent::Place { tile_id, target } => self.play(Move::Place { tile_id, target }),
            Intent::Drop { payload, target } => {
                let tile_id = match DragPayload::parse(&payload)
                    .and_then(|p| p.resolve(&self.tiles))
                {
                    Ok(id) => id,
                    Err(err) => {
                        debug!("Drop ignored: {err}");
                        return None;
                    }
                };
                self.play(Move::Place { tile_id, target })
            }
            Intent::Shuffle => self.play(Move::Shuffle(self.settings.shuffle_mode)),
            Intent::InsertAll => self.play(Move::InsertAll),
            Intent::Reset => {
                self.restart();
                None
            }
            Intent::ChangeGridSize(grid_size) => {
                if let Err(err) = config::check_grid_size(grid_size) {
                    debug!("Grid size change ignored: {err}");
                    return None;
                }
                self.settings.grid_size = grid_size;
                self.restart();
                None
            }
            Intent::ChangeImage(image) => {
                self.settings.image = image;
                self.restart();
                None
            }
            Intent::Tick => {
                self.timer.tick();
                None
            }
            Intent::OpenReward => {
                if self.solved {
                    self.reward_open = true;
                    Some(Notification::RewardOpened)
                } else {
                    Some(Notification::RewardLocked)
                }
            }
            Intent::CloseReward => {
                self.reward_open = false;
                None
            }
        }
    }

    /// Apply a move and check whether it solved the puzzle.
    fn play(&mut self, player_move: Move) -> Option<Notification> {
        // The board is locked once the puzzle is solved
        if self.solved {
            debug!("Puzzle solved: {player_move:?} ignored");
            return None;
        }
        self.tiles = placement::apply(&self.tiles, player_move, &mut self.rng);

        if completion::is_solved(&self.tiles) {
            // Stopping the timer is part of the same transition
            self.timer.stop();
            self.solved = true;
            self.solved_at = Some(Local::now());
            info!("Puzzle solved in {}", self.timer.format_clock());
            return Some(Notification::Solved {
                elapsed_seconds: self.timer.elapsed_seconds(),
            });
        }
        None
    }

    /// Register a new upload. Any upload in progress becomes stale.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.upload_generation += 1;
        UploadTicket(self.upload_generation)
    }

    /// Apply the result of an upload.
    ///
    /// The result is dropped if a more recent upload was registered in the meantime. On
    /// failure, the current image and tiles are kept.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<CroppedImage, ImageDecodeError>,
    ) -> Option<Notification> {
        if ticket.0 != self.upload_generation {
            debug!(
                "Stale upload {} dropped (latest is {})",
                ticket.0, self.upload_generation
            );
            return None;
        }
        match result {
            Ok(image) => {
                self.dispatch(Intent::ChangeImage(ImageSource::DataUrl(image.data_url())));
                Some(Notification::ImageChanged)
            }
            Err(err) => {
                warn!("Cannot use the uploaded image: {err}");
                Some(Notification::ImageFailed(err.to_string()))
            }
        }
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// Split the tiles between the grid and the tray.
    pub fn partition(&self) -> Partition {
        self.tiles.partition()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn image(&self) -> &ImageSource {
        &self.settings.image
    }

    pub fn grid_size(&self) -> usize {
        self.settings.grid_size
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn solved_at(&self) -> Option<DateTime<Local>> {
        self.solved_at
    }

    pub fn is_reward_open(&self) -> bool {
        self.reward_open
    }

    /// Return the timer and completion status.
    pub fn state(&self) -> SessionState {
        SessionState {
            elapsed_seconds: self.timer.elapsed_seconds(),
            timer_running: self.timer.is_running(),
            solved: self.solved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cropper::CropWindow;
    use crate::placement::ShuffleMode;
    use crate::tiles::InitialLayout;
    use crate::tiles::tests::assert_invariants;

    fn session(grid_size: usize) -> Session {
        let settings = Settings {
            grid_size,
            ..Settings::default()
        };
        Session::with_rng(settings, StdRng::seed_from_u64(17))
    }

    /// Place every tile at its correct cell, except `except`. Return the last notification.
    fn solve_all_but(session: &mut Session, except: Option<usize>) -> Option<Notification> {
        let mut last = None;
        for id in 0..session.tiles().total_pieces() {
            if Some(id) == except {
                continue;
            }
            last = session.dispatch(Intent::Place {
                tile_id: id,
                target: Some(id),
            });
        }
        last
    }

    fn fake_image() -> CroppedImage {
        CroppedImage {
            bytes: vec![0xff, 0xd8, 0xff],
            size: 500,
            window: CropWindow {
                x: 0,
                y: 0,
                size: 10,
            },
        }
    }

    #[test]
    fn new_session_starts_running() {
        let session = session(3);
        assert_eq!(
            session.state(),
            SessionState {
                elapsed_seconds: 0,
                timer_running: true,
                solved: false
            }
        );
        assert_eq!(session.partition().unplaced.len(), 9);
        assert_invariants(session.tiles());
    }

    #[test]
    fn solving_stops_the_timer_once() {
        let mut session = session(3);
        for _ in 0..5 {
            session.dispatch(Intent::Tick);
        }
        assert_eq!(session.state().elapsed_seconds, 5);

        assert_eq!(solve_all_but(&mut session, Some(8)), None);
        assert!(!session.is_solved());

        let notification = session.dispatch(Intent::Place {
            tile_id: 8,
            target: Some(8),
        });
        assert_eq!(
            notification,
            Some(Notification::Solved { elapsed_seconds: 5 })
        );
        assert!(session.solved_at().is_some());

        session.dispatch(Intent::Tick);
        session.dispatch(Intent::Tick);
        assert_eq!(
            session.state(),
            SessionState {
                elapsed_seconds: 5,
                timer_running: false,
                solved: true
            }
        );
    }

    #[test]
    fn solved_board_is_locked() {
        let mut session = session(2);
        assert!(matches!(
            solve_all_but(&mut session, None),
            Some(Notification::Solved { .. })
        ));
        let before = session.tiles().clone();
        assert_eq!(
            session.dispatch(Intent::Place {
                tile_id: 0,
                target: None
            }),
            None
        );
        session.dispatch(Intent::Shuffle);
        session.dispatch(Intent::InsertAll);
        assert_eq!(session.tiles(), &before);
    }

    #[test]
    fn reward_requires_completion() {
        let mut session = session(2);
        assert_eq!(
            session.dispatch(Intent::OpenReward),
            Some(Notification::RewardLocked)
        );
        assert!(!session.is_reward_open());

        solve_all_but(&mut session, None);
        assert_eq!(
            session.dispatch(Intent::OpenReward),
            Some(Notification::RewardOpened)
        );
        assert!(session.is_reward_open());
        session.dispatch(Intent::CloseReward);
        assert!(!session.is_reward_open());
    }

    #[test]
    fn reset_and_grid_size_change_restart() {
        let mut session = session(3);
        solve_all_but(&mut session, None);
        session.dispatch(Intent::Reset);
        assert!(!session.state().solved);
        assert_eq!(session.partition().unplaced.len(), 9);

        session.dispatch(Intent::Tick);
        session.dispatch(Intent::ChangeGridSize(5));
        assert_eq!(session.grid_size(), 5);
        assert_eq!(session.tiles().len(), 25);
        assert_eq!(session.state().elapsed_seconds, 0);

        session.dispatch(Intent::ChangeGridSize(1));
        assert_eq!(session.grid_size(), 5);
    }

    #[test]
    fn drop_payloads() {
        let mut session = session(3);
        let tile = *session.tiles().tile(4).expect("tile 4 exists");
        let payload = DragPayload::for_tile(&tile).to_json();
        session.dispatch(Intent::Drop {
            payload,
            target: Some(0),
        });
        assert_eq!(
            session.tiles().tile(4).and_then(|t| t.current_position()),
            Some(0)
        );

        let before = session.tiles().clone();
        let stranger = r#"{"id":40,"correctPosition":40,"currentPosition":null}"#;
        for payload in ["", "not json", stranger] {
            let notification = session.dispatch(Intent::Drop {
                payload: payload.to_string(),
                target: Some(1),
            });
            assert_eq!(notification, None);
        }
        assert_eq!(session.tiles(), &before);
    }

    #[test]
    fn shuffle_follows_the_settings() {
        let settings = Settings {
            grid_size: 3,
            shuffle_mode: ShuffleMode::ClearAll,
            ..Settings::default()
        };
        let mut session = Session::with_rng(settings, StdRng::seed_from_u64(4));
        session.dispatch(Intent::InsertAll);
        assert_eq!(session.partition().unplaced.len(), 0);
        session.dispatch(Intent::Shuffle);
        assert_eq!(session.partition().unplaced.len(), 9);

        let settings = Settings {
            grid_size: 3,
            initial_layout: InitialLayout::Scrambled,
            ..Settings::default()
        };
        let mut session = Session::with_rng(settings, StdRng::seed_from_u64(4));
        let before = session.tiles().clone();
        session.dispatch(Intent::Shuffle);
        assert_eq!(session.tiles(), &before);
    }

    #[test]
    fn stale_upload_is_dropped() {
        let mut session = session(3);
        let first = session.begin_upload();
        let second = session.begin_upload();

        assert_eq!(
            session.finish_upload(second, Ok(fake_image())),
            Some(Notification::ImageChanged)
        );
        let url = session.image().url().to_string();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        assert_eq!(session.finish_upload(first, Ok(fake_image())), None);
        assert_eq!(session.image().url(), url);
    }

    #[test]
    fn failed_upload_keeps_the_puzzle() {
        let mut session = session(3);
        session.dispatch(Intent::Place {
            tile_id: 2,
            target: Some(5),
        });
        let before = session.tiles().clone();
        let ticket = session.begin_upload();
        let notification = session.finish_upload(ticket, Err(ImageDecodeError::Empty));
        assert_eq!(
            notification,
            Some(Notification::ImageFailed("the file is empty".to_string()))
        );
        assert_eq!(session.tiles(), &before);
        assert_eq!(session.image(), &ImageSource::default());
    }
}
