use rand::Rng;
use std::f64::consts::TAU;
use tracing::debug;

use super::point::map;
use crate::{BmpImage, Error};

/// Salt-and-pepper noise drawn from the thread-local generator
///
/// # Errors
///
/// See [`salt_and_pepper_with_rng`]
pub fn salt_and_pepper(src: &BmpImage, probability: f64) -> Result<BmpImage, Error> {
    let mut rng = rand::rng();
    salt_and_pepper_with_rng(src, probability, &mut rng)
}

/// Sets each sample to 0 with probability `p / 2` and to 255 with probability `p / 2`
///
/// One uniform draw `r` in `[0, 1)` is taken per sample: `r < p/2` gives pepper,
/// `r > 1 - p/2` gives salt, anything else keeps the sample.
///
/// # Errors
///
/// This function errors if `probability` is not within `[0, 1]`, or if the output
/// buffer cannot be allocated
pub fn salt_and_pepper_with_rng<R: Rng>(
    src: &BmpImage,
    probability: f64,
    rng: &mut R,
) -> Result<BmpImage, Error> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(Error::InvalidParameter(format!(
            "noise probability must be within [0, 1], got {probability}"
        )));
    }
    let half = probability / 2.0;
    debug!("Adding salt-and-pepper noise, p = {probability}");
    map(src, |v| {
        let r: f64 = rng.random();
        if r < half {
            0
        } else if r > 1.0 - half {
            u8::MAX
        } else {
            v
        }
    })
}

/// Additive Gaussian noise drawn from the thread-local generator
///
/// # Errors
///
/// See [`gaussian_with_rng`]
pub fn gaussian(src: &BmpImage, mean: f64, variance: f64) -> Result<BmpImage, Error> {
    let mut rng = rand::rng();
    gaussian_with_rng(src, mean, variance, &mut rng)
}

/// Adds normally distributed noise of the given mean and variance to every sample
///
/// Noise is generated with the Box-Muller transform, then added, clamped to `[0, 255]`
/// and truncated.
///
/// # Errors
///
/// This function errors if `variance` is negative or either parameter is not finite, or
/// if the output buffer cannot be allocated
pub fn gaussian_with_rng<R: Rng>(
    src: &BmpImage,
    mean: f64,
    variance: f64,
    rng: &mut R,
) -> Result<BmpImage, Error> {
    if !mean.is_finite() || !variance.is_finite() || variance < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "invalid gaussian noise parameters: mean {mean}, variance {variance}"
        )));
    }
    let sigma = variance.sqrt();
    debug!("Adding gaussian noise, mean = {mean}, sigma = {sigma}");
    map(src, |v| {
        let noise = mean + sigma * box_muller(rng);
        clamp_sample(f64::from(v) + noise)
    })
}

/// One standard normal draw, using `u1, u2` in `(0, 1]`
fn box_muller<R: Rng>(rng: &mut R) -> f64 {
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = 1.0 - rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_sample(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
