use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
/// Possible `libbmp` errors
pub enum Error {
    /// Error returned if a file cannot be opened, created, read or written
    #[error("i/o error")]
    Io(#[from] std::io::Error),
    /// Error returned if the fixed-size bitmap header cannot be decoded
    #[error("header parse error: {0}")]
    ParseError(String),
    /// Error returned if the bit depth is not one of (8, 24), or if an operation
    /// does not support the image's bit depth
    #[error("unsupported bit depth: {bit_count}. Only 8 and 24 bit uncompressed bitmaps are supported")]
    UnsupportedFormat {
        /// bit depth found in the header
        bit_count: u16,
    },
    /// Error returned if the header width/height are not strictly positive
    #[error("invalid image dimensions: width {width}, height {height}")]
    InvalidDimensions {
        /// header width
        width: i64,
        /// header height
        height: i64,
    },
    /// Error returned if a pixel buffer cannot be allocated
    #[error("unable to allocate {bytes} bytes of pixel data")]
    Allocation {
        /// requested buffer size
        bytes: usize,
    },
    /// Error returned if two sizes that must agree do not, e.g. a pixel buffer and
    /// the header-derived stride * height, or the dimensions of two combined images
    #[error("size mismatch: expected {expected}, got {actual}")]
    MismatchedDimensions {
        /// expected size
        expected: usize,
        /// provided size
        actual: usize,
    },
    /// Error returned if an operation parameter is out of its valid range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
