use crate::{BmpImage, Depth, Error};

fn require_bgr(src: &BmpImage) -> Result<(), Error> {
    match src.depth() {
        Depth::TwentyFour => Ok(()),
        depth => Err(Error::UnsupportedFormat {
            bit_count: depth.into(),
        }),
    }
}

/// Replaces every pixel with `f(r, g, b)`, returned in (B, G, R) order
fn map_pixels(
    src: &BmpImage,
    f: impl Fn(f32, f32, f32) -> [f32; 3],
) -> Result<BmpImage, Error> {
    require_bgr(src)?;
    let mut out = src.bitmap().zeroed_like()?;
    for (dst, row) in out.rows_mut().zip(src.bitmap().rows()) {
        for (d, s) in dst.chunks_exact_mut(3).zip(row.chunks_exact(3)) {
            let bgr = f(f32::from(s[2]), f32::from(s[1]), f32::from(s[0]));
            d.copy_from_slice(&bgr.map(to_sample));
        }
    }
    Ok(src.derive(out))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_sample(value: f32) -> u8 {
    value.min(255.0) as u8
}

/// Applies the sepia tone matrix to a 24-bit image
///
/// # Errors
///
/// This function errors if the image is not 24-bit, or if the output buffer cannot be
/// allocated
pub fn sepia(src: &BmpImage) -> Result<BmpImage, Error> {
    map_pixels(src, |r, g, b| {
        let tr = 0.393 * r + 0.769 * g + 0.189 * b;
        let tg = 0.349 * r + 0.686 * g + 0.168 * b;
        let tb = 0.272 * r + 0.534 * g + 0.131 * b;
        [tb, tg, tr]
    })
}

/// Converts a 24-bit image to gray, writing the luma to all three channels
///
/// The result stays 24-bit.
///
/// # Errors
///
/// This function errors if the image is not 24-bit, or if the output buffer cannot be
/// allocated
pub fn grayscale(src: &BmpImage) -> Result<BmpImage, Error> {
    map_pixels(src, |r, g, b| {
        let luma = 0.3 * r + 0.59 * g + 0.11 * b;
        [luma; 3]
    })
}
