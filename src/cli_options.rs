/*
cli_options.rs

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

//! Process command-line options.
//!
//! # Examples
//!
//! List the available grid sizes:
//!
//! ```text
//! $ jigtile --ls
//! 3x3 (9 pieces)
//! 4x4 (16 pieces)
//! ...
//! ```
//!
//! Play a 4x4 puzzle, with all the tiles starting on the grid:
//!
//! ```text
//! $ jigtile -g 4 --layout scrambled
//! ```

use clap::Parser;
use log::debug;
use std::env;
use std::path::PathBuf;

use jigtile::config::{COPYRIGHT_NOTICE, GRID_SIZE_CHOICES, ImageSource, Settings};
use jigtile::placement::ShuffleMode;
use jigtile::tiles::InitialLayout;

/// Rebuild a picture from its tiles.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// List the grid sizes
    #[arg(short, long, default_value_t = false)]
    ls: bool,

    /// Settings file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of tiles per row and per column
    #[arg(short, long)]
    grid_size: Option<usize>,

    /// Reference image
    #[arg(short, long)]
    image: Option<String>,

    /// Where the tiles are when a puzzle starts
    #[arg(value_enum, long)]
    layout: Option<InitialLayout>,

    /// What the shuffle command does
    #[arg(value_enum, short, long)]
    shuffle: Option<ShuffleMode>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Parse the command-line options and build the settings.
///
/// Return the exit code in `Err` when the program must stop: 0 after listing the grid sizes,
/// 1 when the settings are invalid.
pub fn parse() -> Result<Settings, u8> {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    //
    // List the grid sizes
    //
    if args.ls {
        for grid_size in GRID_SIZE_CHOICES {
            println!("{grid_size}x{grid_size} ({} pieces)", grid_size * grid_size);
        }
        return Err(0);
    }

    //
    // Settings file first, then the command-line options
    //
    let mut settings: Settings = match &args.config {
        Some(path) => match Settings::load(path) {
            Ok(s) => s,
            Err(err) => {
                eprintln!("Error: {err}");
                return Err(1);
            }
        },
        None => Settings::default(),
    };
    if let Some(grid_size) = args.grid_size {
        settings.grid_size = grid_size;
    }
    if let Some(image) = args.image {
        settings.image = ImageSource::from(image);
    }
    if let Some(layout) = args.layout {
        settings.initial_layout = layout;
    }
    if let Some(shuffle) = args.shuffle {
        settings.shuffle_mode = shuffle;
    }

    if let Err(err) = settings.validate() {
        eprintln!("Error: {err}");
        return Err(1);
    }
    debug!("Settings: {settings:?}");
    Ok(settings)
}
