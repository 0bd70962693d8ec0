/*
render.rs

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

//! Map tiles to their region of the reference image, and draw the board as text.
//!
//! A tile shows the reference image scaled to `grid_size * 100%` of the tile, shifted so that
//! the region at the tile's correct cell is visible. Renderers must use the offsets from
//! [`TileBackground`] so that the tiles line up with the reference image.

use std::fmt::Write;

use crate::tiles::TileSet;

/// Background placement of the reference image inside a tile, in percent of the tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBackground {
    pub offset_x: i64,
    pub offset_y: i64,
    pub scale: i64,
}

impl TileBackground {
    /// Return the background placement for the tile that belongs to `correct_position`.
    pub fn for_tile(correct_position: usize, grid_size: usize) -> Self {
        let size: i64 = grid_size.max(1) as i64;
        let position: i64 = correct_position as i64;
        Self {
            offset_x: -(position % size) * 100,
            offset_y: -(position / size) * 100,
            scale: size * 100,
        }
    }

    /// Return the CSS declarations for the tile.
    pub fn to_css(&self, image_url: &str) -> String {
        format!(
            "background-image: url(\"{image_url}\"); background-position: {}% {}%; background-size: {}%;",
            self.offset_x, self.offset_y, self.scale
        )
    }
}

/// Draw the grid, one line per row. Each cell shows the identifier of the tile that occupies it.
pub fn board_text(tiles: &TileSet) -> String {
    let grid_size: usize = tiles.grid_size();
    let mut cells: Vec<Option<usize>> = vec![None; tiles.total_pieces()];
    for tile in tiles {
        if let Some(cell) = tile.current_position()
            && let Some(c) = cells.get_mut(cell)
        {
            *c = Some(tile.id());
        }
    }

    let mut out = String::new();
    for (i, row) in cells.chunks(grid_size.max(1)).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for cell in row {
            let _ = match cell {
                Some(id) => write!(out, "[{id:>2}]"),
                None => write!(out, "[  ]"),
            };
        }
    }
    out
}

/// List the tray tiles, in tray order.
pub fn tray_text(tiles: &TileSet) -> String {
    let ids: Vec<String> = tiles
        .iter()
        .filter(|t| !t.is_placed())
        .map(|t| t.id().to_string())
        .collect();
    if ids.is_empty() {
        "Tray: empty".to_string()
    } else {
        format!("Tray ({}): {}", ids.len(), ids.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_offsets() {
        assert_eq!(
            TileBackground::for_tile(0, 3),
            TileBackground {
                offset_x: 0,
                offset_y: 0,
                scale: 300
            }
        );
        assert_eq!(
            TileBackground::for_tile(7, 3),
            TileBackground {
                offset_x: -100,
                offset_y: -200,
                scale: 300
            }
        );
        assert_eq!(
            TileBackground::for_tile(47, 10).to_css("a.jpg"),
            "background-image: url(\"a.jpg\"); background-position: -700% -400%; background-size: 1000%;"
        );
    }

    #[test]
    fn board_and_tray() {
        let tiles = TileSet::from_positions(2, &[Some(3), Some(2), None, Some(0)])
            .expect("valid positions");
        insta::assert_snapshot!(board_text(&tiles), @r"
        [ 3][  ]
        [ 1][ 0]
        ");
        assert_eq!(tray_text(&tiles), "Tray (1): 2");

        let full = TileSet::from_positions(2, &[Some(0), Some(1), Some(2), Some(3)])
            .expect("valid positions");
        assert_eq!(tray_text(&full), "Tray: empty");
    }
}
