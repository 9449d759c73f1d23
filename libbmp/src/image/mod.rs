#![allow(clippy::module_name_repetitions)]

pub(crate) mod bitmap;
pub(crate) mod header;
pub(crate) mod palette;

/// Module containing raw header types
///
/// Types in this module are considered "unchecked", the responsibility
/// of upholding validity is on the user
pub mod raw {
    /// Contains types related to bitmap file headers
    pub mod header {
        pub use crate::image::header::{ImageHeader, ImageHeaderBuilder};
    }
}

pub use bitmap::{row_stride, BitMap};
pub use palette::{Palette, PALETTE_ENTRIES};

use crate::{error::Error, HEADER_SIZE, PALETTE_SIZE};
use header::ImageHeader;
use std::{
    fmt::Display,
    fs::File,
    io::{self, BufReader, BufWriter, ErrorKind, Read, Write},
    path::Path,
};
use tracing::{debug, info, trace, warn};

/// A typed representation of an uncompressed 8-bit indexed or 24-bit BGR bitmap
///
/// The image exclusively owns its header, palette and pixel buffer. Every transform in
/// this crate derives a new [`BmpImage`] and leaves its input untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpImage {
    header: ImageHeader,
    depth: Depth,
    palette: Option<Palette>,
    bitmap: BitMap,
}

#[derive(Default, Debug, Eq, PartialEq, PartialOrd, Ord, Copy, Clone, Hash)]
/// Image depth
/// Only 8-bit indexed and 24-bit BGR bitmaps are supported
pub enum Depth {
    /// 8 bits per pixel, one palette index per pixel
    #[default]
    Eight,
    /// 24 bits per pixel, stored as blue, green, red
    TwentyFour,
}

impl Depth {
    /// Returns the number of bytes one pixel occupies
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Eight => 1,
            Self::TwentyFour => 3,
        }
    }

    /// Returns `true` if images of this depth carry a palette
    #[must_use]
    pub const fn has_palette(self) -> bool {
        matches!(self, Self::Eight)
    }
}

impl BmpImage {
    /// Creates a new [`BmpImage`]
    ///
    /// # Errors
    /// This function errors if:
    /// - the header bit depth is not one of (8, 24)
    /// - the header width or height is not positive
    /// - an 8-bit header comes without a palette, or a 24-bit header with one
    /// - the length of `pixels` is not `row_stride * height`
    pub fn new(
        header: ImageHeader,
        palette: Option<Palette>,
        pixels: Vec<u8>,
    ) -> Result<Self, Error> {
        let depth = header.depth()?;
        let (width, height) = header.dimensions()?;
        if depth.has_palette() != palette.is_some() {
            return Err(Error::MismatchedDimensions {
                expected: if depth.has_palette() { PALETTE_ENTRIES } else { 0 },
                actual: if palette.is_some() { PALETTE_ENTRIES } else { 0 },
            });
        }
        let bitmap = BitMap::new(width, height, depth.bytes_per_pixel(), pixels)?;
        Ok(Self {
            header,
            depth,
            palette,
            bitmap,
        })
    }

    /// Creates a black 8-bit image with the identity grayscale palette and a well-formed
    /// header
    ///
    /// # Errors
    ///
    /// This function errors if a dimension is zero or too large for the header, or if
    /// the pixel buffer cannot be allocated
    pub fn grayscale(width: u32, height: u32) -> Result<Self, Error> {
        Self::blank(width, height, Depth::Eight)
    }

    /// Creates a black 24-bit image with a well-formed header
    ///
    /// # Errors
    ///
    /// This function errors if a dimension is zero or too large for the header, or if
    /// the pixel buffer cannot be allocated
    pub fn bgr(width: u32, height: u32) -> Result<Self, Error> {
        Self::blank(width, height, Depth::TwentyFour)
    }

    fn blank(width: u32, height: u32, depth: Depth) -> Result<Self, Error> {
        let invalid = || Error::InvalidDimensions {
            width: i64::from(width),
            height: i64::from(height),
        };
        let w = i32::try_from(width).map_err(|_| invalid())?;
        let h = i32::try_from(height).map_err(|_| invalid())?;
        let palette = depth.has_palette().then(Palette::grayscale);
        let data_offset = HEADER_SIZE + palette.as_ref().map_or(0, |_| PALETTE_SIZE);
        let image_size =
            row_stride(width as usize, depth.bytes_per_pixel()).saturating_mul(height as usize);
        let header = ImageHeader::builder()
            .width(w)
            .height(h)
            .bit_count(depth.into())
            .data_offset(data_offset as u32)
            .image_size(u32::try_from(image_size).map_err(|_| invalid())?)
            .file_size(u32::try_from(data_offset + image_size).map_err(|_| invalid())?)
            .colors_used(if depth.has_palette() { 256 } else { 0 })
            .build();
        let (width, height) = header.dimensions()?;
        Ok(Self {
            header,
            depth,
            palette,
            bitmap: BitMap::zeroed(width, height, depth.bytes_per_pixel())?,
        })
    }

    /// Returns a reference to the [`ImageHeader`]
    #[must_use]
    pub const fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// Returns the image [`Depth`]
    #[must_use]
    pub const fn depth(&self) -> Depth {
        self.depth
    }

    /// Returns the palette, which is present iff the image is 8-bit
    #[must_use]
    pub const fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Returns a reference to the pixel data
    #[must_use]
    pub const fn bitmap(&self) -> &BitMap {
        &self.bitmap
    }

    /// Returns a mutable reference to the pixel data
    pub fn bitmap_mut(&mut self) -> &mut BitMap {
        &mut self.bitmap
    }

    /// Returns the image width
    #[must_use]
    pub const fn width(&self) -> usize {
        self.bitmap.width()
    }

    /// Returns the image height
    #[must_use]
    pub const fn height(&self) -> usize {
        self.bitmap.height()
    }

    /// Returns the padded length of one row in bytes
    #[must_use]
    pub const fn row_stride(&self) -> usize {
        self.bitmap.stride()
    }

    /// Returns a copy of `self` carrying new pixel data of the same dimensions
    pub(crate) fn derive(&self, bitmap: BitMap) -> Self {
        debug_assert_eq!(
            (bitmap.width(), bitmap.height(), bitmap.channels()),
            (self.width(), self.height(), self.bitmap.channels())
        );
        Self {
            header: self.header,
            depth: self.depth,
            palette: self.palette.clone(),
            bitmap,
        }
    }

    /// Returns a copy of `self` carrying new pixel data, with the header width and height
    /// rewritten to match it
    pub(crate) fn derive_resized(&self, bitmap: BitMap) -> Result<Self, Error> {
        let invalid = || Error::InvalidDimensions {
            width: i64::try_from(bitmap.width()).unwrap_or(i64::MAX),
            height: i64::try_from(bitmap.height()).unwrap_or(i64::MAX),
        };
        let mut header = self.header;
        header.width = i32::try_from(bitmap.width()).map_err(|_| invalid())?;
        header.height = i32::try_from(bitmap.height()).map_err(|_| invalid())?;
        Ok(Self {
            header,
            depth: self.depth,
            palette: self.palette.clone(),
            bitmap,
        })
    }

    /// Tries to read a [`Self`] from a reader
    ///
    /// The pixel data is read directly after the header (and palette, for 8-bit
    /// images). A file holding fewer pixel bytes than `row_stride * height` is not
    /// rejected: the missing tail is left zeroed and a warning is logged.
    ///
    /// # Errors
    ///
    /// This function will error if:
    /// - the 54-byte header or the palette cannot be read
    /// - the bit depth is not one of (8, 24)
    /// - the width or height is not positive
    /// - the pixel buffer cannot be allocated
    pub fn from_reader(mut r: impl Read) -> Result<Self, Error> {
        let mut raw = [0; HEADER_SIZE];
        r.read_exact(&mut raw)?;
        let header = ImageHeader::from_bytes(&raw)?;
        trace!("Header: {:?}", &header);

        let depth = header.depth()?;
        let (width, height) = header.dimensions()?;
        debug!("Bitmap width, height, depth: {:?}", (width, height, depth));

        let palette = if depth.has_palette() {
            let mut table = [0; PALETTE_SIZE];
            r.read_exact(&mut table)?;
            debug!("read {PALETTE_SIZE} for palette");
            Some(Palette::from_bytes(&table))
        } else {
            None
        };

        let mut bitmap = BitMap::zeroed(width, height, depth.bytes_per_pixel())?;
        let expected = bitmap.as_bytes().len();
        let read = read_up_to(&mut r, bitmap.as_bytes_mut())?;
        if read < expected {
            warn!("Pixel data is truncated: read {read} of {expected} bytes, the remainder is zero");
        } else {
            debug!("read {read} for pixel data");
        }

        Ok(Self {
            header,
            depth,
            palette,
            bitmap,
        })
    }

    /// Tries to read [`Self`] from a provided file path
    ///
    /// # Errors
    ///
    /// This function will error if the file cannot be opened or if the file contains invalid data.
    /// See [`Self::from_reader`] for potential errors
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self, Error> {
        let file = File::open(filename)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Serializes [`Self`]: header, palette (8-bit only) and the full padded pixel
    /// buffer, with no other transformation
    ///
    /// # Errors
    ///
    /// This will error if the writer fails
    pub fn to_writer(&self, mut w: impl Write) -> Result<(), Error> {
        self.header.write_to(&mut w)?;
        if let Some(palette) = &self.palette {
            w.write_all(&palette.to_bytes())?;
        }
        w.write_all(self.bitmap.as_bytes())?;
        w.flush()?;
        Ok(())
    }

    /// Attempts to serialize and save [`Self`] as a file at the provided path
    ///
    /// # Errors
    ///
    /// This will error if unable to open and/or write to the provided filename
    ///
    pub fn save(&self, filename: impl AsRef<Path>) -> Result<(), Error> {
        let f = File::options()
            .create(true)
            .write(true)
            .truncate(true)
            .open(filename)?;
        self.to_writer(BufWriter::new(f))?;
        info!("Finished writing to file");
        Ok(())
    }

    /// Returns the pixels as (R, G, B) triplets, top row first
    ///
    /// 8-bit images are expanded through their palette. Rows are emitted in reverse file
    /// order, since positive-height bitmaps are stored bottom-up.
    #[must_use]
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width() * self.height() * 3);
        for row in self.bitmap.rows().rev() {
            match &self.palette {
                Some(palette) => out.extend(row.iter().flat_map(|&i| palette.rgb(i))),
                None => out.extend(row.chunks_exact(3).flat_map(|bgr| [bgr[2], bgr[1], bgr[0]])),
            }
        }
        out
    }
}

// read until `buf` is full or the reader is exhausted
fn read_up_to(r: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

impl From<Depth> for u16 {
    fn from(value: Depth) -> Self {
        match value {
            Depth::Eight => 8,
            Depth::TwentyFour => 24,
        }
    }
}

impl From<&Depth> for u16 {
    fn from(value: &Depth) -> Self {
        Self::from(*value)
    }
}

impl Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u16::from(self))
    }
}

impl TryFrom<u16> for Depth {
    type Error = Error;

    fn try_from(value: u16) -> std::result::Result<Self, Self::Error> {
        match value {
            8 => Ok(Self::Eight),
            24 => Ok(Self::TwentyFour),
            bit_count => Err(Error::UnsupportedFormat { bit_count }),
        }
    }
}
