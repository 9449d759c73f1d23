use strum::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::{BitMap, BmpImage, Error};

/// A rotation by a multiple of 90 degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
pub enum Rotation {
    /// 90 degrees clockwise
    #[strum(serialize = "cw")]
    Clockwise,
    /// 90 degrees counter-clockwise
    #[strum(serialize = "ccw")]
    CounterClockwise,
    /// 180 degrees
    #[strum(serialize = "180")]
    Half,
}

/// Rotates an image into a fresh zeroed buffer
///
/// Quarter turns swap the width and height fields of the header. Rotation is applied to
/// the rows as stored, with row 0 taken as the top.
///
/// # Errors
///
/// This function errors if the output buffer cannot be allocated
pub fn rotate(src: &BmpImage, rotation: Rotation) -> Result<BmpImage, Error> {
    let input = src.bitmap();
    let (width, height, channels) = (input.width(), input.height(), input.channels());
    let (out_width, out_height) = match rotation {
        Rotation::Half => (width, height),
        Rotation::Clockwise | Rotation::CounterClockwise => (height, width),
    };
    debug!("Rotating {width}x{height} image {rotation} into {out_width}x{out_height}");
    let mut out = BitMap::zeroed(out_width, out_height, channels)?;
    for (y, row) in input.rows().enumerate() {
        for (x, pixel) in row.chunks_exact(channels).enumerate() {
            let (nx, ny) = match rotation {
                Rotation::Clockwise => (out_width - y - 1, x),
                Rotation::CounterClockwise => (y, out_height - x - 1),
                Rotation::Half => (width - x - 1, height - y - 1),
            };
            for (c, &v) in pixel.iter().enumerate() {
                out.set_sample(nx, ny, c, v);
            }
        }
    }
    src.derive_resized(out)
}
