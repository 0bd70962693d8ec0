/*
placement.rs

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

//! Move tiles between the tray and the grid.
//!
//! Every function takes the current [`TileSet`] and returns a new one. The input is never
//! modified. All the functions keep the tile set invariants: the set of tile identifiers does not
//! change, and a grid cell never holds more than one tile.

use clap::ValueEnum;
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::tiles::TileSet;

/// What the shuffle button does.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ShuffleMode {
    /// Shuffle the tray order. Tiles on the grid stay where they are.
    #[default]
    Tray,

    /// Shuffle all the tiles and send them back to the tray.
    ClearAll,
}

/// Player move on the tile set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Drop a tile on a grid cell, or in the tray when `target` is None.
    Place { tile_id: usize, target: Option<usize> },

    /// Shuffle the tiles, according to the [`ShuffleMode`].
    Shuffle(ShuffleMode),

    /// Put all the tray tiles on the empty cells.
    InsertAll,
}

/// Apply the given [`Move`] and return the resulting tile set.
pub fn apply<R: Rng + ?Sized>(tiles: &TileSet, player_move: Move, rng: &mut R) -> TileSet {
    match player_move {
        Move::Place { tile_id, target } => place(tiles, tile_id, target),
        Move::Shuffle(ShuffleMode::Tray) => shuffle_unplaced(tiles, rng),
        Move::Shuffle(ShuffleMode::ClearAll) => shuffle_all(tiles, rng),
        Move::InsertAll => insert_all(tiles, rng),
    }
}

/// Move the dragged tile to the `target` cell, or to the tray if `target` is None.
///
/// If another tile occupies the target cell, then the two tiles swap: the other tile takes the
/// previous location of the dragged tile, which might be the tray.
///
/// Nothing changes when the tile identifier is unknown, when the tile is already at the target,
/// or when the target cell is outside the grid.
pub fn place(tiles: &TileSet, tile_id: usize, target: Option<usize>) -> TileSet {
    let mut new_tiles: TileSet = tiles.clone();

    let Some(dragged) = tiles.index_of(tile_id) else {
        debug!("Drop ignored: unknown tile {tile_id}");
        return new_tiles;
    };
    let previous: Option<usize> = tiles.tiles()[dragged].current_position();
    if previous == target {
        return new_tiles;
    }

    if let Some(cell) = target {
        if cell >= tiles.total_pieces() {
            debug!("Drop ignored: cell {cell} is outside the grid");
            return new_tiles;
        }
        // Swap with the tile that already occupies the cell
        if let Some(occupant) = tiles
            .iter()
            .position(|t| t.current_position() == Some(cell))
        {
            debug!(
                "Tile {tile_id} swaps with tile {} at cell {cell}",
                tiles.tiles()[occupant].id()
            );
            new_tiles.tiles_mut()[occupant].set_current_position(previous);
        }
    }
    new_tiles.tiles_mut()[dragged].set_current_position(target);
    new_tiles
}

/// Shuffle the order of the tiles in the tray.
///
/// The tiles on the grid keep their cell and their rank in the collection.
pub fn shuffle_unplaced<R: Rng + ?Sized>(tiles: &TileSet, rng: &mut R) -> TileSet {
    let mut new_tiles: TileSet = tiles.clone();

    let slots: Vec<usize> = tiles
        .iter()
        .enumerate()
        .filter_map(|(i, t)| if t.is_placed() { None } else { Some(i) })
        .collect();
    let mut tray: Vec<_> = slots.iter().map(|i| tiles.tiles()[*i]).collect();
    tray.shuffle(rng);

    let all: &mut [_] = new_tiles.tiles_mut();
    for (slot, tile) in slots.iter().zip(tray) {
        all[*slot] = tile;
    }
    debug!("Shuffled {} tray tiles", slots.len());
    new_tiles
}

/// Put every tray tile on an empty cell, at random.
///
/// The tile set invariants guarantee that there are as many empty cells as tiles in the tray,
/// so the tray is always empty afterward.
pub fn insert_all<R: Rng + ?Sized>(tiles: &TileSet, rng: &mut R) -> TileSet {
    let mut new_tiles: TileSet = tiles.clone();

    let mut cells: Vec<usize> = tiles.empty_cells();
    cells.shuffle(rng);
    let mut cells = cells.into_iter();

    let mut count: usize = 0;
    for tile in new_tiles.tiles_mut().iter_mut().filter(|t| !t.is_placed()) {
        match cells.next() {
            Some(cell) => {
                tile.set_current_position(Some(cell));
                count += 1;
            }
            None => break,
        }
    }
    debug!("Inserted {count} tiles");
    new_tiles
}

/// Shuffle all the tiles and send them back to the tray.
pub fn shuffle_all<R: Rng + ?Sized>(tiles: &TileSet, rng: &mut R) -> TileSet {
    let mut new_tiles: TileSet = tiles.clone();

    let all: &mut [_] = new_tiles.tiles_mut();
    all.shuffle(rng);
    for tile in all.iter_mut() {
        tile.set_current_position(None);
    }
    debug!("Shuffled all the tiles back to the tray");
    new_tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::is_solved;
    use crate::tiles::InitialLayout;
    use crate::tiles::tests::assert_invariants;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn positions(tiles: &TileSet) -> Vec<Option<usize>> {
        let mut by_id: Vec<(usize, Option<usize>)> = tiles
            .iter()
            .map(|t| (t.id(), t.current_position()))
            .collect();
        by_id.sort_unstable();
        by_id.into_iter().map(|(_, p)| p).collect()
    }

    #[test]
    fn place_on_empty_cell_and_back_to_tray() {
        let tiles = TileSet::from_positions(3, &[None; 9]).expect("valid positions");
        let placed = place(&tiles, 4, Some(2));
        assert_eq!(placed.tile(4).and_then(|t| t.current_position()), Some(2));
        assert_invariants(&placed);

        let back = place(&placed, 4, None);
        assert_eq!(back, tiles);
    }

    #[test]
    fn place_swaps_in_a_single_call() {
        let tiles = TileSet::from_positions(2, &[Some(0), Some(3), None, None])
            .expect("valid positions");
        let swapped = place(&tiles, 0, Some(3));
        assert_eq!(positions(&swapped), vec![Some(3), Some(0), None, None]);
        assert_invariants(&swapped);
    }

    #[test]
    fn place_from_tray_sends_occupant_to_tray() {
        let tiles = TileSet::from_positions(2, &[Some(1), None, None, None])
            .expect("valid positions");
        let result = place(&tiles, 2, Some(1));
        assert_eq!(positions(&result), vec![None, None, Some(1), None]);
        assert_invariants(&result);
    }

    #[test]
    fn place_ignores_invalid_drops() {
        let tiles = TileSet::from_positions(2, &[Some(1), None, None, None])
            .expect("valid positions");
        assert_eq!(place(&tiles, 9, Some(0)), tiles);
        assert_eq!(place(&tiles, 0, Some(1)), tiles);
        assert_eq!(place(&tiles, 1, None), tiles);
        assert_eq!(place(&tiles, 1, Some(4)), tiles);
    }

    #[test]
    fn place_to_tray_never_displaces_anything() {
        let tiles = TileSet::from_positions(2, &[Some(0), Some(1), Some(2), Some(3)])
            .expect("valid positions");
        let result = place(&tiles, 2, None);
        assert_eq!(positions(&result), vec![Some(0), Some(1), None, Some(3)]);
    }

    #[test]
    fn shuffle_unplaced_keeps_the_grid() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut layout: Vec<Option<usize>> = vec![None; 25];
        layout[3] = Some(10);
        layout[7] = Some(0);
        layout[20] = Some(24);
        let tiles = TileSet::from_positions(5, &layout).expect("valid positions");

        let shuffled = shuffle_unplaced(&tiles, &mut rng);
        assert_invariants(&shuffled);
        assert_eq!(positions(&shuffled), layout);
        for slot in [3, 7, 20] {
            assert_eq!(shuffled.tiles()[slot], tiles.tiles()[slot]);
        }
        let before: Vec<usize> = tiles.partition().unplaced.iter().map(|t| t.id()).collect();
        let after: Vec<usize> = shuffled
            .partition()
            .unplaced
            .iter()
            .map(|t| t.id())
            .collect();
        assert_ne!(before, after);
        let mut sorted = after.clone();
        sorted.sort_unstable();
        assert_eq!(before, sorted);
    }

    #[test]
    fn insert_all_fills_every_empty_cell() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut layout: Vec<Option<usize>> = vec![None; 9];
        layout[1] = Some(4);
        layout[4] = Some(0);
        let tiles = TileSet::from_positions(3, &layout).expect("valid positions");
        let filled = insert_all(&tiles, &mut rng);
        assert_invariants(&filled);
        assert_eq!(filled.unplaced_count(), 0);
        assert!(filled.empty_cells().is_empty());
        assert_eq!(filled.tile(1).and_then(|t| t.current_position()), Some(4));
        assert_eq!(filled.tile(4).and_then(|t| t.current_position()), Some(0));
    }

    #[test]
    fn insert_all_on_a_full_grid_changes_nothing() {
        let mut rng = StdRng::seed_from_u64(5);
        let tiles = TileSet::new(3, InitialLayout::Scrambled, &mut rng);
        assert_eq!(insert_all(&tiles, &mut rng), tiles);
    }

    #[test]
    fn shuffle_all_clears_the_grid() {
        let mut rng = StdRng::seed_from_u64(9);
        let tiles = TileSet::new(4, InitialLayout::Scrambled, &mut rng);
        let cleared = shuffle_all(&tiles, &mut rng);
        assert_invariants(&cleared);
        assert_eq!(cleared.unplaced_count(), 16);
    }

    #[test]
    fn random_move_sequences_keep_the_invariants() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut tiles = TileSet::new(4, InitialLayout::Tray, &mut rng);
        for step in 0..2000 {
            let player_move = match rng.random_range(0..20) {
                0 => Move::Shuffle(ShuffleMode::Tray),
                1 => Move::InsertAll,
                2 => Move::Shuffle(ShuffleMode::ClearAll),
                3 => Move::Place {
                    tile_id: rng.random_range(0..18),
                    target: None,
                },
                _ => Move::Place {
                    tile_id: rng.random_range(0..18),
                    target: Some(rng.random_range(0..18)),
                },
            };
            let before = tiles.len();
            tiles = apply(&tiles, player_move, &mut rng);
            assert_eq!(tiles.len(), before, "Tile lost at step {step}");
            assert_invariants(&tiles);
        }
    }

    #[test]
    fn placing_every_tile_home_solves_the_puzzle() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut tiles = TileSet::new(3, InitialLayout::Scrambled, &mut rng);
        for id in 0..9 {
            tiles = place(&tiles, id, Some(id));
        }
        assert!(is_solved(&tiles));
    }
}
