/*
tiles.rs

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

//! Puzzle pieces and the tile set that groups them.
//!
//! A [`TileSet`] always holds exactly `grid_size * grid_size` [`Tile`] objects.
//! Each tile knows the grid cell where it belongs ([`Tile::correct_position`]) and the grid cell
//! where it currently sits ([`Tile::current_position`]), or `None` when the tile waits in the
//! tray.
//!
//! The order of the tiles in the set is meaningful: the unplaced tiles are displayed in the tray
//! in that order.

use clap::ValueEnum;
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::completion;

/// How the tiles are laid out when a puzzle starts.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InitialLayout {
    /// All the tiles start in the tray, in random order.
    #[default]
    Tray,

    /// All the tiles start on the grid, at random positions.
    Scrambled,
}

/// A puzzle piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Stable identifier.
    id: usize,

    /// Grid cell where the tile belongs. It also selects the region of the reference image that
    /// the tile displays.
    correct_position: usize,

    /// Grid cell where the tile is, or None if the tile is in the tray.
    current_position: Option<usize>,
}

impl Tile {
    /// Create a [`Tile`] object that belongs to the given cell and that starts in the tray.
    fn new(id: usize, correct_position: usize) -> Self {
        Self {
            id,
            correct_position,
            current_position: None,
        }
    }

    /// Return the tile identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Return the cell where the tile belongs.
    pub fn correct_position(&self) -> usize {
        self.correct_position
    }

    /// Return the cell where the tile is, or None if the tile is in the tray.
    pub fn current_position(&self) -> Option<usize> {
        self.current_position
    }

    /// Whether the tile is on the grid.
    pub fn is_placed(&self) -> bool {
        self.current_position.is_some()
    }

    /// Whether the tile is on the grid, at its correct cell.
    pub fn is_at_correct_position(&self) -> bool {
        self.current_position == Some(self.correct_position)
    }

    /// Row and column of the image region that the tile displays.
    pub fn image_cell(&self, grid_size: usize) -> (usize, usize) {
        (
            self.correct_position / grid_size,
            self.correct_position % grid_size,
        )
    }

    pub(crate) fn set_current_position(&mut self, position: Option<usize>) {
        self.current_position = position;
    }
}

/// Tiles split by location. See [`TileSet::partition`].
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Tiles on the grid.
    pub placed: Vec<Tile>,

    /// Tiles in the tray, in tray order.
    pub unplaced: Vec<Tile>,
}

/// Errors raised when building a [`TileSet`] from explicit positions.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TileSetError {
    #[error("expected {expected} positions, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("cell {0} is outside the grid")]
    OutOfGrid(usize),

    #[error("cell {0} is occupied by several tiles")]
    DuplicatedCell(usize),
}

/// Ordered collection of all the tiles of a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileSet {
    /// Number of tiles per row and per column.
    grid_size: usize,

    /// The tiles. The relative order of the unplaced tiles is the tray order.
    tiles: Vec<Tile>,
}

impl TileSet {
    /// Create a shuffled [`TileSet`] object for a grid of `grid_size` x `grid_size` cells.
    ///
    /// Tile identifiers and correct positions go from 0 to `grid_size * grid_size - 1`.
    pub fn new<R: Rng + ?Sized>(grid_size: usize, layout: InitialLayout, rng: &mut R) -> Self {
        let total: usize = grid_size * grid_size;
        let mut tiles: Vec<Tile> = (0..total).map(|i| Tile::new(i, i)).collect();
        tiles.shuffle(rng);
        let mut tile_set = Self { grid_size, tiles };

        if layout == InitialLayout::Scrambled {
            tile_set.scramble_on_grid(rng);
        }
        debug!(
            "New {grid_size}x{grid_size} tile set ({layout:?}): {} tiles",
            tile_set.len()
        );
        tile_set
    }

    /// Put every tile on the grid at a random cell.
    ///
    /// A scrambled grid that happens to be solved is scrambled again, because the player would
    /// have nothing to do.
    fn scramble_on_grid<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut cells: Vec<usize> = (0..self.total_pieces()).collect();
        loop {
            cells.shuffle(rng);
            for (tile, cell) in self.tiles.iter_mut().zip(&cells) {
                tile.current_position = Some(*cell);
            }
            if self.total_pieces() < 2 || !completion::is_solved(self) {
                break;
            }
            debug!("Scrambled grid is already solved: scrambling again");
        }
    }

    /// Create a [`TileSet`] object from explicit positions.
    ///
    /// The tile with identifier `i` belongs to cell `i` and is at `positions[i]`. The tray order
    /// is the identifier order.
    ///
    /// # Errors
    ///
    /// The method returns an error when the number of positions is not
    /// `grid_size * grid_size`, when a position is outside the grid, or when two tiles share a
    /// cell.
    pub fn from_positions(
        grid_size: usize,
        positions: &[Option<usize>],
    ) -> Result<Self, TileSetError> {
        let total: usize = grid_size * grid_size;
        if positions.len() != total {
            return Err(TileSetError::WrongLength {
                expected: total,
                actual: positions.len(),
            });
        }

        let mut occupied: Vec<bool> = vec![false; total];
        let mut tiles: Vec<Tile> = Vec::with_capacity(total);
        for (i, position) in positions.iter().enumerate() {
            if let Some(cell) = *position {
                if cell >= total {
                    return Err(TileSetError::OutOfGrid(cell));
                }
                if occupied[cell] {
                    return Err(TileSetError::DuplicatedCell(cell));
                }
                occupied[cell] = true;
            }
            let mut tile = Tile::new(i, i);
            tile.current_position = *position;
            tiles.push(tile);
        }
        Ok(Self { grid_size, tiles })
    }

    /// Return the number of tiles per row and per column.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Return the number of cells in the grid.
    pub fn total_pieces(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Return the number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the tile set has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate over the tiles, in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Return the tiles, in order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Return the position of the tile in the collection, or None if the identifier is unknown.
    pub(crate) fn index_of(&self, tile_id: usize) -> Option<usize> {
        self.tiles.iter().position(|t| t.id == tile_id)
    }

    /// Return the tile with the given identifier.
    pub fn tile(&self, tile_id: usize) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == tile_id)
    }

    /// Return the tile that occupies the given cell, or None if the cell is empty.
    pub fn tile_at(&self, cell: usize) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.current_position == Some(cell))
    }

    /// Split the tiles between the grid and the tray.
    pub fn partition(&self) -> Partition {
        let (placed, unplaced): (Vec<Tile>, Vec<Tile>) =
            self.tiles.iter().partition(|t| t.is_placed());
        Partition { placed, unplaced }
    }

    /// Return the number of tiles in the tray.
    pub fn unplaced_count(&self) -> usize {
        self.tiles.iter().filter(|t| !t.is_placed()).count()
    }

    /// Return the list of the cells that no tile occupies, in increasing order.
    pub fn empty_cells(&self) -> Vec<usize> {
        let mut occupied: Vec<bool> = vec![false; self.total_pieces()];
        for cell in self.tiles.iter().filter_map(|t| t.current_position) {
            if let Some(o) = occupied.get_mut(cell) {
                *o = true;
            }
        }
        occupied
            .iter()
            .enumerate()
            .filter_map(|(cell, o)| if *o { None } else { Some(cell) })
            .collect()
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}
