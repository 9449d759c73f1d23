mod convolve;
mod kernel;
mod window;

pub use convolve::{
    add_clamped, blur, clamp_to_u8, combine_magnitude, convolve, detect_edges, laplacian,
    magnitude, robinson, sharpen, EdgeImages,
};
pub use kernel::{Compass, EdgeOperator, Kernel, Laplacian};
pub use window::{blur_bordered, max_filter};
