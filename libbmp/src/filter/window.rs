//! Square-window filters that only touch interior pixels

use itertools::iproduct;
use tracing::debug;

use super::convolve::clamp_to_u8;
use crate::{BitMap, BmpImage, Error};

fn check_size(size: usize) -> Result<usize, Error> {
    if size == 0 || size % 2 == 0 {
        return Err(Error::InvalidParameter(format!(
            "window size must be odd and non-zero, got {size}"
        )));
    }
    Ok(size / 2)
}

/// Replaces every interior sample with `f` of its `size x size` neighborhood, leaving a
/// border of `size / 2` source pixels untouched. Padding of the output is zero.
fn interior_map(
    src: &BmpImage,
    size: usize,
    mut f: impl FnMut(&BitMap, usize, usize, usize) -> u8,
) -> Result<BmpImage, Error> {
    let half = check_size(size)?;
    let input = src.bitmap();
    let mut out = input.zeroed_like()?;
    for (dst, row) in out.rows_mut().zip(input.rows()) {
        dst.copy_from_slice(row);
    }
    let (width, height) = (input.width(), input.height());
    if width <= 2 * half || height <= 2 * half {
        debug!("Image smaller than a {size}x{size} window, nothing to filter");
        return Ok(src.derive(out));
    }
    for (y, x, c) in iproduct!(half..height - half, half..width - half, 0..input.channels()) {
        out.set_sample(x, y, c, f(input, x - half, y - half, c));
    }
    Ok(src.derive(out))
}

/// Uniform `size x size` blur of the interior, keeping a border of original pixels
///
/// Unlike [`super::blur`], no pixel is computed from a partial window.
///
/// # Errors
///
/// This function errors if `size` is even or zero, or if the output buffer cannot be
/// allocated
#[allow(clippy::cast_precision_loss)]
pub fn blur_bordered(src: &BmpImage, size: usize) -> Result<BmpImage, Error> {
    let side = size as f32;
    let weight = 1.0 / (side * side);
    interior_map(src, size, |input, left, top, c| {
        let mut sum = 0.0f32;
        for (dy, dx) in iproduct!(0..size, 0..size) {
            sum += weight * f32::from(input.sample(left + dx, top + dy, c));
        }
        clamp_to_u8(sum)
    })
}

/// Maximum of the `size x size` window centered on every interior pixel, keeping a border
/// of original pixels
///
/// # Errors
///
/// This function errors if `size` is even or zero, or if the output buffer cannot be
/// allocated
pub fn max_filter(src: &BmpImage, size: usize) -> Result<BmpImage, Error> {
    interior_map(src, size, |input, left, top, c| {
        iproduct!(0..size, 0..size)
            .map(|(dy, dx)| input.sample(left + dx, top + dy, c))
            .max()
            .unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{image::raw::header::ImageHeader, Palette};

    fn checker(width: u32, height: u32) -> BmpImage {
        let mut image = BmpImage::grayscale(width, height).unwrap();
        for (y, row) in image.bitmap_mut().rows_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = if (x + y) % 2 == 0 { 90 } else { 0 };
            }
        }
        image
    }

    #[test]
    fn sizes_must_be_odd() {
        let image = checker(4, 4);
        assert!(matches!(
            blur_bordered(&image, 2),
            Err(Error::InvalidParameter(_))
        ));
        assert!(max_filter(&image, 0).is_err());
    }

    #[test]
    fn bordered_blur_keeps_the_border() {
        let image = checker(5, 5);
        let out = blur_bordered(&image, 3).unwrap();
        for i in 0..5 {
            assert_eq!(out.bitmap().sample(i, 0, 0), image.bitmap().sample(i, 0, 0));
            assert_eq!(out.bitmap().sample(0, i, 0), image.bitmap().sample(0, i, 0));
        }
        // (2, 1) sees four 90s, (2, 2) sees five
        assert_eq!(out.bitmap().sample(2, 1, 0), 40);
        assert_eq!(out.bitmap().sample(2, 2, 0), 50);
    }

    #[test]
    fn max_filter_spreads_bright_pixels() {
        let mut image = BmpImage::grayscale(5, 5).unwrap();
        image.bitmap_mut().set_sample(2, 2, 0, 200);
        let out = max_filter(&image, 3).unwrap();
        for (x, y) in iproduct!(1..4, 1..4) {
            assert_eq!(out.bitmap().sample(x, y, 0), 200);
        }
        assert_eq!(out.bitmap().sample(0, 0, 0), 0);
        assert_eq!(out.bitmap().sample(4, 2, 0), 0);
    }

    #[test]
    fn padding_is_not_carried_over() {
        let header = ImageHeader::builder()
            .width(3)
            .height(3)
            .bit_count(8)
            .build();
        let pixels = [1, 2, 3, 0xA5, 4, 5, 6, 0xA5, 7, 8, 9, 0xA5].to_vec();
        let image = BmpImage::new(header, Some(Palette::grayscale()), pixels).unwrap();
        for out in [
            blur_bordered(&image, 3).unwrap(),
            max_filter(&image, 3).unwrap(),
            max_filter(&image, 5).unwrap(),
        ] {
            let bytes = out.bitmap().as_bytes();
            assert_eq!([bytes[3], bytes[7], bytes[11]], [0, 0, 0]);
            assert_eq!(out.bitmap().row(0), Some(&[1, 2, 3][..]));
        }
        assert_eq!(max_filter(&image, 3).unwrap().bitmap().sample(1, 1, 0), 9);
    }

    #[test]
    fn oversized_window_returns_a_copy() {
        let image = checker(3, 2);
        assert_eq!(max_filter(&image, 5).unwrap(), image);
        assert_eq!(blur_bordered(&image, usize::MAX).unwrap(), image);
    }
}
