use itertools::iproduct;
use tracing::debug;

use super::kernel::{Compass, EdgeOperator, Kernel, Laplacian};
use crate::{BitMap, BmpImage, Error};

/// Clamps an accumulated value to `[0, 255]` and truncates it
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_to_u8(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Correlates `src` with `kernel` and returns the result as a new image
///
/// Every output sample is `sum(k[i][j] * src(x + j - cols/2, y + i - rows/2))`, accumulated
/// in `f32`, then clamped and truncated. Neighbors outside of the image contribute
/// nothing, so edge pixels receive a partial sum. 24-bit images are filtered one channel
/// at a time. Header and palette are copied from `src`.
///
/// # Errors
///
/// This function errors if the output buffer cannot be allocated
pub fn convolve(src: &BmpImage, kernel: &Kernel) -> Result<BmpImage, Error> {
    debug!(
        "Convolving {}x{} image with {}x{} kernel",
        src.width(),
        src.height(),
        kernel.rows(),
        kernel.cols()
    );
    let input = src.bitmap();
    let mut out = input.zeroed_like()?;
    let (width, height, channels) = (input.width(), input.height(), input.channels());
    let (i_center, j_center) = kernel.anchor();

    for (y, x, c) in iproduct!(0..height, 0..width, 0..channels) {
        let mut sum = 0.0f32;
        for (i, j) in iproduct!(0..kernel.rows(), 0..kernel.cols()) {
            let Some(sy) = (y + i).checked_sub(i_center).filter(|&v| v < height) else {
                continue;
            };
            let Some(sx) = (x + j).checked_sub(j_center).filter(|&v| v < width) else {
                continue;
            };
            sum += kernel.at(i, j) * f32::from(input.sample(sx, sy, c));
        }
        out.set_sample(x, y, c, clamp_to_u8(sum));
    }
    Ok(src.derive(out))
}

/// Euclidean magnitude of two gradient samples, truncated and capped at 255
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn magnitude(gx: u8, gy: u8) -> u8 {
    let (gx, gy) = (f32::from(gx), f32::from(gy));
    (gx * gx + gy * gy).sqrt().min(255.0) as u8
}

/// Combines two directional responses into one edge-strength image with [`magnitude`]
///
/// # Errors
///
/// This function errors if the two images differ in dimensions or depth, or if the
/// output buffer cannot be allocated
pub fn combine_magnitude(gx: &BmpImage, gy: &BmpImage) -> Result<BmpImage, Error> {
    zip_samples(gx, gy, magnitude)
}

/// Adds two images sample by sample, saturating at 255
///
/// # Errors
///
/// This function errors if the two images differ in dimensions or depth, or if the
/// output buffer cannot be allocated
pub fn add_clamped(a: &BmpImage, b: &BmpImage) -> Result<BmpImage, Error> {
    zip_samples(a, b, u8::saturating_add)
}

fn zip_samples(
    a: &BmpImage,
    b: &BmpImage,
    f: impl Fn(u8, u8) -> u8,
) -> Result<BmpImage, Error> {
    let (left, right) = (a.bitmap(), b.bitmap());
    let shape = |m: &BitMap| (m.width(), m.height(), m.channels());
    if shape(left) != shape(right) {
        return Err(Error::MismatchedDimensions {
            expected: left.as_bytes().len(),
            actual: right.as_bytes().len(),
        });
    }
    let mut out = left.zeroed_like()?;
    for ((dst, l), r) in out.rows_mut().zip(left.rows()).zip(right.rows()) {
        for ((d, &l), &r) in dst.iter_mut().zip(l).zip(r) {
            *d = f(l, r);
        }
    }
    Ok(a.derive(out))
}

/// High-pass filters `src` and adds the response back onto it
///
/// # Errors
///
/// This function errors if an output buffer cannot be allocated
pub fn sharpen(src: &BmpImage) -> Result<BmpImage, Error> {
    let detail = convolve(src, &Kernel::high_pass())?;
    add_clamped(src, &detail)
}

/// Uniform `size x size` blur with zero-contribution edges
///
/// Edge pixels are divided by the full window size regardless of how many neighbors
/// exist, so borders darken.
///
/// # Errors
///
/// This function errors if `size` is zero, or if the output buffer cannot be allocated
pub fn blur(src: &BmpImage, size: usize) -> Result<BmpImage, Error> {
    convolve(src, &Kernel::box_blur(size)?)
}

/// Convolves with one Laplacian kernel
///
/// # Errors
///
/// This function errors if the output buffer cannot be allocated
pub fn laplacian(src: &BmpImage, variant: Laplacian) -> Result<BmpImage, Error> {
    convolve(src, &Kernel::laplacian(variant))
}

/// The three outputs of a two-direction edge operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeImages {
    /// Response to the horizontal kernel
    pub horizontal: BmpImage,
    /// Response to the vertical kernel
    pub vertical: BmpImage,
    /// Euclidean magnitude of the two responses
    pub combined: BmpImage,
}

/// Runs both kernels of `operator` over `src` and combines them
///
/// The magnitude is taken over the already clamped directional responses, so negative
/// gradients count as zero.
///
/// # Errors
///
/// This function errors if an output buffer cannot be allocated
pub fn detect_edges(src: &BmpImage, operator: EdgeOperator) -> Result<EdgeImages, Error> {
    let (h, v) = operator.kernels();
    let horizontal = convolve(src, &h)?;
    let vertical = convolve(src, &v)?;
    let combined = combine_magnitude(&horizontal, &vertical)?;
    Ok(EdgeImages {
        horizontal,
        vertical,
        combined,
    })
}

/// Convolves `src` with each of the eight Robinson compass kernels
///
/// The responses are returned independently, in [`Compass`] declaration order.
///
/// # Errors
///
/// This function errors if an output buffer cannot be allocated
pub fn robinson(src: &BmpImage) -> Result<Vec<(Compass, BmpImage)>, Error> {
    use strum::IntoEnumIterator;

    Compass::iter()
        .map(|direction| -> Result<_, Error> {
            Ok((direction, convolve(src, &Kernel::robinson(direction))?))
        })
        .collect()
}
