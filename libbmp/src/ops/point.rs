use crate::{BmpImage, Error};

/// Adds `amount` to every sample, saturating at 255
///
/// # Errors
///
/// This function errors if the output buffer cannot be allocated
pub fn increase_brightness(src: &BmpImage, amount: u8) -> Result<BmpImage, Error> {
    map(src, |v| v.saturating_add(amount))
}

/// Subtracts `amount` from every sample, saturating at 0
///
/// # Errors
///
/// This function errors if the output buffer cannot be allocated
pub fn decrease_brightness(src: &BmpImage, amount: u8) -> Result<BmpImage, Error> {
    map(src, |v| v.saturating_sub(amount))
}

/// Shifts every sample by a signed amount, saturating at both ends
///
/// # Errors
///
/// This function errors if the output buffer cannot be allocated
pub fn adjust_brightness(src: &BmpImage, delta: i16) -> Result<BmpImage, Error> {
    let amount = u8::try_from(delta.unsigned_abs()).unwrap_or(u8::MAX);
    if delta < 0 {
        decrease_brightness(src, amount)
    } else {
        increase_brightness(src, amount)
    }
}

/// Inverts every sample: `255 - v`
///
/// # Errors
///
/// This function errors if the output buffer cannot be allocated
pub fn negative(src: &BmpImage) -> Result<BmpImage, Error> {
    map(src, |v| u8::MAX - v)
}

/// Maps samples above `threshold` to 255 and every other sample to 0
///
/// # Errors
///
/// This function errors if the output buffer cannot be allocated
pub fn binarize(src: &BmpImage, threshold: u8) -> Result<BmpImage, Error> {
    map(src, |v| if v > threshold { u8::MAX } else { 0 })
}

pub(crate) fn map(src: &BmpImage, f: impl FnMut(u8) -> u8) -> Result<BmpImage, Error> {
    Ok(src.derive(src.bitmap().map_samples(f)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(value: u8) -> BmpImage {
        let mut image = BmpImage::grayscale(8, 8).unwrap();
        for row in image.bitmap_mut().rows_mut() {
            row.fill(value);
        }
        image
    }

    fn all(image: &BmpImage, value: u8) -> bool {
        image.bitmap().rows().flatten().all(|&v| v == value)
    }

    #[test]
    fn brightness_saturates() {
        let image = filled(128);
        assert!(all(&increase_brightness(&image, 50).unwrap(), 178));
        assert!(all(&increase_brightness(&image, 200).unwrap(), 255));
        assert!(all(&decrease_brightness(&image, 200).unwrap(), 0));
        assert!(all(&adjust_brightness(&image, -28).unwrap(), 100));
        assert!(all(&adjust_brightness(&image, 1000).unwrap(), 255));
    }

    #[test]
    fn negative_inverts() {
        assert!(all(&negative(&filled(37)).unwrap(), 218));
        assert!(all(&negative(&filled(255)).unwrap(), 0));
    }

    #[test]
    fn binarize_is_strict() {
        assert!(all(&binarize(&filled(128), 128).unwrap(), 0));
        assert!(all(&binarize(&filled(129), 128).unwrap(), 255));
    }

    #[test]
    fn input_is_untouched() {
        let image = filled(10);
        let before = image.clone();
        let _ = negative(&image).unwrap();
        assert_eq!(image, before);
    }
}
