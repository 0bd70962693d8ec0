/*
lib.rs

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

//! Picture tile puzzle.
//!
//! A reference image is cut into a square grid of tiles. The tiles start in a tray and the
//! player drags them onto the grid to rebuild the image.
//!
//! * [`tiles`] holds the tiles and builds shuffled tile sets.
//! * [`placement`] moves tiles between the tray and the grid.
//! * [`completion`] detects a solved puzzle.
//! * [`cropper`] turns an uploaded picture into a square reference image.
//! * [`timer`] counts the seconds spent on a puzzle.
//! * [`session`] ties everything together for a host user interface.

pub mod completion;
pub mod config;
pub mod cropper;
pub mod payload;
pub mod placement;
pub mod render;
pub mod session;
pub mod tiles;
pub mod timer;

pub use completion::is_solved;
pub use config::{ImageSource, Settings};
pub use cropper::{CroppedImage, ImageDecodeError, crop_to_square};
pub use payload::{DragPayload, InvalidDragPayload};
pub use placement::{insert_all, place, shuffle_all, shuffle_unplaced};
pub use session::{Intent, Notification, Session, SessionState};
pub use tiles::{Tile, TileSet};
