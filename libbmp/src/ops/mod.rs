mod color;
mod histogram;
mod noise;
mod point;
mod rotate;

pub use color::{grayscale, sepia};
pub use histogram::{equalization_map, equalize, histogram, write_histogram, Histogram};
pub use noise::{gaussian, gaussian_with_rng, salt_and_pepper, salt_and_pepper_with_rng};
pub use point::{adjust_brightness, binarize, decrease_brightness, increase_brightness, negative};
pub use rotate::{rotate, Rotation};
