use bon::Builder;
use nom::{
    bytes::complete::take,
    combinator::map_res,
    number::complete::{le_i32, le_u16, le_u32},
    IResult,
};
use std::io::{self, Write};

use crate::{error::Error, image::Depth, HEADER_SIZE};

/// Bitmap file header (14 bytes) followed by the bitmap info header (40 bytes)
///
/// Every one of the 54 header bytes is held by a named field, so decoding and
/// re-encoding an unmodified header reproduces it exactly.
///
/// ```"not rust"
/// offset  size  field
///      0     2  signature ("BM")
///      2     4  file_size
///      6     4  reserved
///     10     4  data_offset
///     14     4  info_size (40)
///     18     4  width (signed)
///     22     4  height (signed)
///     26     2  planes
///     28     2  bit_count
///     30     4  compression
///     34     4  image_size
///     38     4  x_pixels_per_meter
///     42     4  y_pixels_per_meter
///     46     4  colors_used
///     50     4  important_colors
/// ```
///
/// ## Note
///
/// [`ImageHeader`] is "unchecked": [`crate::BmpImage`] only relies on
/// [`ImageHeader::width`], [`ImageHeader::height`] and [`ImageHeader::bit_count`]. The
/// remaining fields are carried verbatim and never re-derived.
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct ImageHeader {
    /// File signature, `BM` for bitmaps
    #[builder(default = *b"BM")]
    pub signature: [u8; 2],

    /// Size of the whole file in bytes
    #[builder(default)]
    pub file_size: u32,

    /// Reserved, application specific
    #[builder(default)]
    pub reserved: [u8; 4],

    /// Offset from the start of the file to the pixel data
    ///
    /// Carried but not used for seeking: pixel data is always read directly after the
    /// header (and palette)
    #[builder(default)]
    pub data_offset: u32,

    /// Size of the info header
    #[builder(default = 40)]
    pub info_size: u32,

    /// Image width in pixels
    pub width: i32,

    /// Image height in pixels. Positive heights are stored bottom-up on disk
    pub height: i32,

    /// Number of color planes (always 1)
    #[builder(default = 1)]
    pub planes: u16,

    /// Bits per pixel
    pub bit_count: u16,

    /// Compression type (0 = none)
    #[builder(default)]
    pub compression: u32,

    /// Raw pixel data size, may be 0 for uncompressed images
    #[builder(default)]
    pub image_size: u32,

    /// Horizontal resolution
    #[builder(default)]
    pub x_pixels_per_meter: i32,

    /// Vertical resolution
    #[builder(default)]
    pub y_pixels_per_meter: i32,

    /// Number of colors in the palette
    #[builder(default)]
    pub colors_used: u32,

    /// Number of important colors
    #[builder(default)]
    pub important_colors: u32,
}

impl ImageHeader {
    /// Decodes a header from its 54 on-disk bytes
    ///
    /// # Errors
    ///
    /// This function errors if fewer than [`HEADER_SIZE`] bytes are provided
    pub fn from_bytes(input: &[u8]) -> Result<Self, Error> {
        parse_header(input)
            .map(|(_, header)| header)
            .map_err(|e| Error::ParseError(format!("{e:?}")))
    }

    /// Encodes the header into its 54 on-disk bytes
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE);
        // writing to a Vec cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    pub(crate) fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.signature)?;
        w.write_all(&self.file_size.to_le_bytes())?;
        w.write_all(&self.reserved)?;
        w.write_all(&self.data_offset.to_le_bytes())?;
        w.write_all(&self.info_size.to_le_bytes())?;
        w.write_all(&self.width.to_le_bytes())?;
        w.write_all(&self.height.to_le_bytes())?;
        w.write_all(&self.planes.to_le_bytes())?;
        w.write_all(&self.bit_count.to_le_bytes())?;
        w.write_all(&self.compression.to_le_bytes())?;
        w.write_all(&self.image_size.to_le_bytes())?;
        w.write_all(&self.x_pixels_per_meter.to_le_bytes())?;
        w.write_all(&self.y_pixels_per_meter.to_le_bytes())?;
        w.write_all(&self.colors_used.to_le_bytes())?;
        w.write_all(&self.important_colors.to_le_bytes())
    }

    /// Returns the [`Depth`] described by [`ImageHeader::bit_count`]
    ///
    /// # Errors
    ///
    /// This function errors if the bit depth is not one of (8, 24)
    pub fn depth(&self) -> Result<Depth, Error> {
        Depth::try_from(self.bit_count)
    }

    /// Returns the width and height as unsigned sizes
    ///
    /// # Errors
    ///
    /// This function errors if either dimension is zero or negative
    pub fn dimensions(&self) -> Result<(usize, usize), Error> {
        let invalid = || Error::InvalidDimensions {
            width: i64::from(self.width),
            height: i64::from(self.height),
        };
        let width = usize::try_from(self.width).map_err(|_| invalid())?;
        let height = usize::try_from(self.height).map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok((width, height))
    }
}

fn parse_array<const N: usize>(input: &[u8]) -> IResult<&[u8], [u8; N]> {
    map_res(take(N), |bytes: &[u8]| <[u8; N]>::try_from(bytes))(input)
}

fn parse_header(input: &[u8]) -> IResult<&[u8], ImageHeader> {
    let (input, signature) = parse_array::<2>(input)?;
    let (input, file_size) = le_u32(input)?;
    let (input, reserved) = parse_array::<4>(input)?;
    let (input, data_offset) = le_u32(input)?;

    let (input, info_size) = le_u32(input)?;
    let (input, width) = le_i32(input)?;
    let (input, height) = le_i32(input)?;
    let (input, planes) = le_u16(input)?;
    let (input, bit_count) = le_u16(input)?;
    let (input, compression) = le_u32(input)?;
    let (input, image_size) = le_u32(input)?;
    let (input, x_pixels_per_meter) = le_i32(input)?;
    let (input, y_pixels_per_meter) = le_i32(input)?;
    let (input, colors_used) = le_u32(input)?;
    let (input, important_colors) = le_u32(input)?;

    Ok((
        input,
        ImageHeader {
            signature,
            file_size,
            reserved,
            data_offset,
            info_size,
            width,
            height,
            planes,
            bit_count,
            compression,
            image_size,
            x_pixels_per_meter,
            y_pixels_per_meter,
            colors_used,
            important_colors,
        },
    ))
}
