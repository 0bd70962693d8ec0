/*
config.rs

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

//! Game settings.
//!
//! The settings are read from an optional JSON file, and then command-line options override
//! them (see [`crate::config::Settings::load`]). Missing keys in the file take their default
//! value.
//!
//! ```json
//! {
//!     "grid_size": 4,
//!     "image": "images/jigsaw-image.jpg",
//!     "initial_layout": "tray",
//!     "shuffle_mode": "clear-all",
//!     "crop_size": 500,
//!     "jpeg_quality": 80
//! }
//! ```

use log::debug;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cropper::{CropOptions, DEFAULT_QUALITY, DEFAULT_SIZE};
use crate::placement::ShuffleMode;
use crate::tiles::InitialLayout;

pub const COPYRIGHT_NOTICE: &str = "Copyright 2025 Hervé Quatremain
License GPL-3.0-or-later <https://www.gnu.org/licenses/gpl-3.0.html>";

/// Smallest grid: 2x2 tiles.
pub const MIN_GRID_SIZE: usize = 2;

/// Largest grid: 10x10 tiles.
pub const MAX_GRID_SIZE: usize = 10;

/// Grid sizes that the player can choose from.
pub const GRID_SIZE_CHOICES: [usize; 8] = [3, 4, 5, 6, 7, 8, 9, 10];

pub const DEFAULT_GRID_SIZE: usize = 10;

/// Reference image bundled with the game.
pub const DEFAULT_IMAGE: &str = "images/jigsaw-image.jpg";

/// Reference image location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageSource {
    /// Path to an image file shipped with the game.
    Asset(String),

    /// Image produced by [`crate::cropper`], as a `data:` URL.
    DataUrl(String),
}

impl ImageSource {
    /// Return the URL or path of the image.
    pub fn url(&self) -> &str {
        match self {
            ImageSource::Asset(s) | ImageSource::DataUrl(s) => s,
        }
    }
}

impl Default for ImageSource {
    fn default() -> Self {
        ImageSource::Asset(DEFAULT_IMAGE.to_string())
    }
}

impl From<String> for ImageSource {
    fn from(url: String) -> Self {
        if url.starts_with("data:") {
            ImageSource::DataUrl(url)
        } else {
            ImageSource::Asset(url)
        }
    }
}

impl From<ImageSource> for String {
    fn from(source: ImageSource) -> Self {
        match source {
            ImageSource::Asset(s) | ImageSource::DataUrl(s) => s,
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImageSource::Asset(s) => write!(f, "{s}"),
            // Data URLs are huge
            ImageSource::DataUrl(s) => write!(f, "uploaded image ({} bytes)", s.len()),
        }
    }
}

/// Errors raised while loading the settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("grid size {0} is out of range (2 to 10)")]
    GridSize(usize),

    #[error("JPEG quality {0} is out of range (1 to 100)")]
    Quality(u8),

    #[error("crop size must not be zero")]
    CropSize,
}

/// Game settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Number of tiles per row and per column.
    pub grid_size: usize,

    /// Reference image.
    pub image: ImageSource,

    /// Where the tiles are when a puzzle starts.
    pub initial_layout: InitialLayout,

    /// What the shuffle action does.
    pub shuffle_mode: ShuffleMode,

    /// Side of the uploaded images after cropping, in pixels.
    pub crop_size: u32,

    /// JPEG quality of the uploaded images after cropping.
    pub jpeg_quality: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            image: ImageSource::default(),
            initial_layout: InitialLayout::default(),
            shuffle_mode: ShuffleMode::default(),
            crop_size: DEFAULT_SIZE,
            jpeg_quality: DEFAULT_QUALITY,
        }
    }
}

impl Settings {
    /// Read the settings from the given JSON file.
    ///
    /// Return the default settings if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let file: File = match File::open(path) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => {
                    debug!("No settings file {path:?}: using defaults");
                    return Ok(Self::default());
                }
                _ => {
                    return Err(SettingsError::Io {
                        path: path.to_path_buf(),
                        source: error,
                    });
                }
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let settings: Settings =
            serde_json::from_reader(reader).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Settings loaded from {path:?}: {settings:?}");
        Ok(settings)
    }

    /// Verify that the settings can be used.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_grid_size(self.grid_size)?;
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(SettingsError::Quality(self.jpeg_quality));
        }
        if self.crop_size == 0 {
            return Err(SettingsError::CropSize);
        }
        Ok(())
    }

    /// Return the cropping parameters for uploaded images.
    pub fn crop_options(&self) -> CropOptions {
        CropOptions {
            size: self.crop_size,
            quality: self.jpeg_quality,
        }
    }
}

/// Verify that a grid size is supported.
pub fn check_grid_size(grid_size: usize) -> Result<(), SettingsError> {
    if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size) {
        Ok(())
    } else {
        Err(SettingsError::GridSize(grid_size))
    }
}
