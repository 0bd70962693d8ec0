/*
payload.rs

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

//! Data carried by a drag and drop gesture.
//!
//! When the player starts dragging a tile, the host stores a JSON description of the tile in the
//! drag data. On drop, the description is parsed back to find the dragged tile.
//!
//! ```json
//! {"id":4,"correctPosition":4,"currentPosition":null}
//! ```

use serde::{Deserialize, Serialize};

use crate::tiles::{Tile, TileSet};

/// The drop carried no usable tile description.
#[derive(Debug, thiserror::Error)]
pub enum InvalidDragPayload {
    #[error("empty drag payload")]
    Empty,

    #[error("malformed drag payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("drag payload does not match any tile")]
    UnknownTile,
}

/// Tile description stored in the drag data.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    pub id: usize,
    pub correct_position: usize,
    pub current_position: Option<usize>,
}

impl DragPayload {
    /// Describe the given tile.
    pub fn for_tile(tile: &Tile) -> Self {
        Self {
            id: tile.id(),
            correct_position: tile.correct_position(),
            current_position: tile.current_position(),
        }
    }

    /// Return the JSON string to store in the drag data.
    pub fn to_json(&self) -> String {
        // Serializing plain integers cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse the drag data.
    pub fn parse(data: &str) -> Result<Self, InvalidDragPayload> {
        let data: &str = data.trim();
        if data.is_empty() {
            return Err(InvalidDragPayload::Empty);
        }
        Ok(serde_json::from_str(data)?)
    }

    /// Return the identifier of the tile that the payload describes in the given tile set.
    ///
    /// Only the identifier and the correct position are compared: the current position in the
    /// payload might be out of date, and the tile set is the reference.
    pub fn resolve(&self, tiles: &TileSet) -> Result<usize, InvalidDragPayload> {
        match tiles.tile(self.id) {
            Some(t) if t.correct_position() == self.correct_position => Ok(t.id()),
            _ => Err(InvalidDragPayload::UnknownTile),
        }
    }
}
