//! # libbmp
//!
//!
//! This library provides datatypes, i/o and filtering for uncompressed Windows bitmap (BMP)
//! images: 8-bit palette-indexed grayscale and 24-bit BGR truecolor.
//!
//! It aims to provide a minimal, low-level API to build upon. The codec treats the header as
//! a fixed 54-byte record and reproduces it byte-for-byte, so a load/save round trip of an
//! unmodified image returns the original file. Filters never mutate their input; each one
//! derives a fresh [`BmpImage`] carrying a copy of the header and palette.
//!
//! ### Limitations
//!
//! - Compressed bitmaps and bit depths other than 8 and 24 are not supported.
//! - The pixel-data offset stored in the header is not honored; pixel data is expected
//!   directly after the header (and the 1024-byte palette for 8-bit images).
//! - Files holding fewer pixel bytes than the header announces are not rejected: the
//!   missing tail of the pixel buffer is left zeroed.
//! - Rows are kept in file order. Positive-height bitmaps are stored bottom-up, so row 0
//!   of [`BitMap`] is the bottom row of the picture. Filters are orientation-agnostic.
//!
//! ### Usage
//!
//! #### Edge detection
//!
//! ```rust
//! use libbmp::{filter::{detect_edges, EdgeOperator}, BmpImage};
//!
//! fn main() -> Result<(), libbmp::Error> {
//!     let mut image = BmpImage::grayscale(16, 16)?;
//!     for y in 0..16 {
//!         for x in 8..16 {
//!             image.bitmap_mut().set_sample(x, y, 0, 200);
//!         }
//!     }
//!     let edges = detect_edges(&image, EdgeOperator::Sobel)?;
//!     assert_eq!(edges.combined.bitmap().sample(8, 8, 0), 255);
//!     assert_eq!(edges.combined.bitmap().sample(2, 8, 0), 0);
//!     Ok(())
//! }
//! ```
//!
//! #### Custom kernels
//!
//! Any rectangular kernel can be passed to [`filter::convolve`]. Coefficients are used as
//! given, there is no implicit normalization.
//!
//! ```rust
//! use libbmp::{filter::{convolve, Kernel}, BmpImage};
//!
//! fn main() -> Result<(), libbmp::Error> {
//!     let image = BmpImage::grayscale(8, 8)?;
//!     let emboss = Kernel::from_rows([
//!         [-2.0, -1.0, 0.0],
//!         [-1.0, 1.0, 1.0],
//!         [0.0, 1.0, 2.0],
//!     ]);
//!     let embossed = convolve(&image, &emboss)?;
//!     assert_eq!(embossed.width(), 8);
//!     Ok(())
//! }
//! ```
//!

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

mod error;
/// Convolution engine, kernel presets and neighborhood filters
pub mod filter;
/// Module containing types for bitmap image files
pub mod image;
/// Point transforms, noise, histograms and rotation
pub mod ops;

use std::path::Path;

pub use error::Error;
pub use image::BitMap;
pub use image::BmpImage;
pub use image::Depth;
pub use image::Palette;

/// Size of the file header plus the info header
pub const HEADER_SIZE: usize = 54;
/// Size of the color table of an 8-bit image (256 entries of 4 bytes)
pub const PALETTE_SIZE: usize = 1024;

/// Loads a bitmap from a file
///
/// # Errors
///
/// See [`BmpImage::from_reader`]
pub fn load(path: impl AsRef<Path>) -> Result<BmpImage, Error> {
    BmpImage::from_file(path)
}

/// Saves a bitmap to a file
///
/// # Errors
///
/// This will error if unable to create and/or write to the provided path
pub fn save(path: impl AsRef<Path>, image: &BmpImage) -> Result<(), Error> {
    image.save(path)
}
