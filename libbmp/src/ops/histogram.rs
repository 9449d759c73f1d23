use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::{debug, info};

use super::point::map;
use crate::{BmpImage, Depth, Error};

/// Normalized frequency of each of the 256 gray levels
pub type Histogram = [f32; 256];

fn require_gray(src: &BmpImage) -> Result<(), Error> {
    match src.depth() {
        Depth::Eight => Ok(()),
        depth => Err(Error::UnsupportedFormat {
            bit_count: depth.into(),
        }),
    }
}

/// Computes the histogram of an 8-bit image, normalized over `width * height` pixels
///
/// # Errors
///
/// This function errors if the image is not 8-bit
#[allow(clippy::cast_precision_loss)]
pub fn histogram(src: &BmpImage) -> Result<Histogram, Error> {
    require_gray(src)?;
    let mut counts = [0usize; 256];
    for &v in src.bitmap().rows().flatten() {
        counts[usize::from(v)] += 1;
    }
    let total = (src.width() * src.height()) as f32;
    Ok(counts.map(|count| count as f32 / total))
}

/// Writes one frequency per line with six decimals
///
/// # Errors
///
/// This will error if unable to create and/or write to the provided path
pub fn write_histogram(path: impl AsRef<Path>, histogram: &Histogram) -> Result<(), Error> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    for frequency in histogram {
        writeln!(w, "{frequency:.6}")?;
    }
    w.flush()?;
    info!("Wrote histogram to {}", path.display());
    Ok(())
}

/// Builds the gray level mapping `trunc(255 * cdf + 0.5)` of a histogram
///
/// The mapping is monotonic non-decreasing.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn equalization_map(histogram: &Histogram) -> [u8; 256] {
    let mut cdf = 0.0f32;
    histogram.map(|frequency| {
        cdf += frequency;
        (255.0 * cdf + 0.5).min(255.0) as u8
    })
}

/// Equalizes the histogram of an 8-bit image
///
/// # Errors
///
/// This function errors if the image is not 8-bit, or if the output buffer cannot be
/// allocated
pub fn equalize(src: &BmpImage) -> Result<BmpImage, Error> {
    let lut = equalization_map(&histogram(src)?);
    debug!("Equalization map: {:?}", lut);
    map(src, |v| lut[usize::from(v)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_levels() -> BmpImage {
        let mut image = BmpImage::grayscale(5, 2).unwrap();
        image.bitmap_mut().row_mut(0).unwrap().fill(0);
        image.bitmap_mut().row_mut(1).unwrap().fill(10);
        image
    }

    #[test]
    fn histogram_counts_pixels_not_padding() {
        let hist = histogram(&two_levels()).unwrap();
        assert_eq!(hist[0], 0.5);
        assert_eq!(hist[10], 0.5);
        assert!((hist.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_truecolor() {
        let image = BmpImage::bgr(2, 2).unwrap();
        assert!(matches!(
            histogram(&image),
            Err(Error::UnsupportedFormat { bit_count: 24 })
        ));
        assert!(equalize(&image).is_err());
    }

    #[test]
    fn equalization_map_is_monotonic() {
        let mut hist = [0.0f32; 256];
        for (i, h) in hist.iter_mut().enumerate() {
            *h = ((i * 31) % 7) as f32;
        }
        let total: f32 = hist.iter().sum();
        let hist = hist.map(|h| h / total);
        let lut = equalization_map(&hist);
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn equalize_spreads_levels() {
        let out = equalize(&two_levels()).unwrap();
        assert_eq!(out.bitmap().row(0), Some(&[128; 5][..]));
        assert_eq!(out.bitmap().row(1), Some(&[255; 5][..]));
        // a second pass is stable
        assert_eq!(equalize(&out).unwrap(), out);
    }
}
