/*
completion.rs

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

//! Detect a solved puzzle.

use crate::tiles::TileSet;

/// Whether every tile is on the grid, at its correct cell.
///
/// The function stops at the first tile in the tray or at the wrong cell. An empty tile set is
/// not solved.
pub fn is_solved(tiles: &TileSet) -> bool {
    !tiles.is_empty() && tiles.iter().all(|t| t.is_at_correct_position())
}
