/*
cropper.rs

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

//! Turn an uploaded picture into a square reference image.
//!
//! The largest centered square of the source image is kept, resized to
//! [`DEFAULT_SIZE`] x [`DEFAULT_SIZE`] pixels, and encoded in JPEG.
//!
//! Decoding a large picture takes time, so [`crop_to_square`] runs the work in a separate thread
//! and returns a future. The host keeps processing events while the image is being prepared.

use std::thread;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, GenericImageView, ImageEncoder};
use log::debug;

/// Side of the square output image, in pixels.
pub const DEFAULT_SIZE: u32 = 500;

/// JPEG quality of the output image (1 to 100).
pub const DEFAULT_QUALITY: u8 = 80;

/// Reasons why an uploaded picture cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageDecodeError {
    #[error("the file is empty")]
    Empty,

    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("invalid image dimensions")]
    Dimensions,

    #[error("image encode failed: {0}")]
    Encode(String),

    #[error("image processing was interrupted")]
    Aborted,
}

/// Output parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropOptions {
    /// Side of the output image, in pixels.
    pub size: u32,

    /// JPEG quality.
    pub quality: u8,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Square region of the source image that is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl CropWindow {
    /// Return the largest square centered in a `width` x `height` image, or None if the image
    /// is empty.
    pub fn centered(width: u32, height: u32) -> Option<Self> {
        let size: u32 = width.min(height);
        if size == 0 {
            return None;
        }
        Some(Self {
            x: (width - size) / 2,
            y: (height - size) / 2,
            size,
        })
    }
}

/// Square reference image.
#[derive(Debug, Clone)]
pub struct CroppedImage {
    /// JPEG data.
    pub bytes: Vec<u8>,

    /// Side of the image, in pixels.
    pub size: u32,

    /// Region of the source image that the output shows.
    pub window: CropWindow,
}

impl CroppedImage {
    /// Return the image as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(&self.bytes))
    }
}

/// Decode the source picture, keep the centered square, resize it, and encode the result.
///
/// # Errors
///
/// The function returns an error when the data is empty or is not an image in a supported
/// format.
pub fn crop_square(bytes: &[u8], options: &CropOptions) -> Result<CroppedImage, ImageDecodeError> {
    if bytes.is_empty() {
        return Err(ImageDecodeError::Empty);
    }
    if options.size == 0 {
        return Err(ImageDecodeError::Dimensions);
    }
    let source =
        image::load_from_memory(bytes).map_err(|err| ImageDecodeError::Decode(err.to_string()))?;
    let (width, height) = source.dimensions();
    let window = CropWindow::centered(width, height).ok_or(ImageDecodeError::Dimensions)?;
    debug!(
        "Cropping {width}x{height} image at ({}, {}) size {}",
        window.x, window.y, window.size
    );

    let square = source
        .crop_imm(window.x, window.y, window.size, window.size)
        .resize_exact(options.size, options.size, FilterType::Triangle)
        .to_rgb8();

    let mut out: Vec<u8> = Vec::new();
    JpegEncoder::new_with_quality(&mut out, options.quality.clamp(1, 100))
        .write_image(&square, options.size, options.size, ExtendedColorType::Rgb8)
        .map_err(|err| ImageDecodeError::Encode(err.to_string()))?;

    Ok(CroppedImage {
        bytes: out,
        size: options.size,
        window,
    })
}

/// Run [`crop_square`] in a worker thread.
///
/// The returned future resolves when the worker is done. It fails with
/// [`ImageDecodeError::Aborted`] if the worker stops before sending its result.
pub async fn crop_to_square(
    bytes: Vec<u8>,
    options: CropOptions,
) -> Result<CroppedImage, ImageDecodeError> {
    let (sender, receiver) = async_channel::bounded::<Result<CroppedImage, ImageDecodeError>>(1);

    thread::spawn(move || {
        let result = crop_square(&bytes, &options);
        // Nobody is waiting anymore if the future was dropped
        let _ = sender.send_blocking(result);
    });

    receiver
        .recv()
        .await
        .map_err(|_| ImageDecodeError::Aborted)?
}
