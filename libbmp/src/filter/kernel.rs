//! The kernel type for convolution, and the preset coefficient tables

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::Error;

/// A `rows x cols` matrix of coefficients in row-major order
///
/// Coefficients are used as given: a kernel that should average must be pre-divided,
/// as [`Kernel::box_blur`] is.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Kernel {
    /// Construct a kernel from row-major coefficients and its dimensions
    ///
    /// # Errors
    ///
    /// This function errors if `rows` or `cols` is zero, or if `data.len() != rows * cols`
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, Error> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidParameter(format!(
                "kernel dimensions must be non-zero, got {rows}x{cols}"
            )));
        }
        let cells = cell_count(rows, cols)?;
        if data.len() != cells {
            return Err(Error::MismatchedDimensions {
                expected: cells,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Construct a kernel from a fixed-size table
    ///
    /// # Panics
    ///
    /// If `R == 0 || C == 0`
    #[must_use]
    pub fn from_rows<const R: usize, const C: usize>(table: [[f32; C]; R]) -> Self {
        assert!(R > 0 && C > 0, "kernel dimensions must be non-zero");
        Self {
            rows: R,
            cols: C,
            data: table.into_iter().flatten().collect(),
        }
    }

    /// The 1x1 kernel `[1.0]`
    #[must_use]
    pub fn identity() -> Self {
        Self::from_rows([[1.0]])
    }

    /// Uniform averaging kernel of `size x size` coefficients, each `1 / size²`
    ///
    /// # Errors
    ///
    /// This function errors if `size` is zero or `size²` overflows, or if the
    /// coefficients cannot be allocated
    #[allow(clippy::cast_precision_loss)]
    pub fn box_blur(size: usize) -> Result<Self, Error> {
        let cells = cell_count(size, size)?;
        let weight = 1.0 / cells as f32;
        Self::new(size, size, filled(cells, weight)?)
    }

    /// High-pass kernel: center 8, the eight neighbors -1
    #[must_use]
    pub fn high_pass() -> Self {
        Self::from_rows([
            [-1.0, -1.0, -1.0],
            [-1.0, 8.0, -1.0],
            [-1.0, -1.0, -1.0],
        ])
    }

    /// Center-surround kernel: the anchor weighs `rows * cols - 1`, every other cell -1
    ///
    /// The coefficients sum to zero, so flat regions map to black.
    ///
    /// # Errors
    ///
    /// This function errors if `rows` or `cols` is zero, if `rows * cols` overflows, or if
    /// the coefficients cannot be allocated
    #[allow(clippy::cast_precision_loss)]
    pub fn center_surround(rows: usize, cols: usize) -> Result<Self, Error> {
        let cells = cell_count(rows, cols)?;
        let mut kernel = Self::new(rows, cols, filled(cells, -1.0)?)?;
        let (i, j) = kernel.anchor();
        kernel.data[i * cols + j] = cells as f32 - 1.0;
        Ok(kernel)
    }

    /// Laplacian kernels
    #[must_use]
    pub fn laplacian(variant: Laplacian) -> Self {
        match variant {
            Laplacian::FourNegative => Self::from_rows([
                [0.0, -1.0, 0.0],
                [-1.0, 4.0, -1.0],
                [0.0, -1.0, 0.0],
            ]),
            Laplacian::FourPositive => Self::from_rows([
                [0.0, 1.0, 0.0],
                [1.0, -4.0, 1.0],
                [0.0, 1.0, 0.0],
            ]),
            Laplacian::EightNegative => Self::from_rows([
                [-1.0, -1.0, -1.0],
                [-1.0, 8.0, -1.0],
                [-1.0, -1.0, -1.0],
            ]),
            Laplacian::EightPositive => Self::from_rows([
                [1.0, 1.0, 1.0],
                [1.0, -8.0, 1.0],
                [1.0, 1.0, 1.0],
            ]),
        }
    }

    /// Robinson compass kernel for one direction
    #[must_use]
    pub fn robinson(direction: Compass) -> Self {
        let table = match direction {
            Compass::North => [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]],
            Compass::NorthWest => [[0.0, 1.0, 2.0], [-1.0, 0.0, 1.0], [-2.0, -1.0, 0.0]],
            Compass::West => [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]],
            Compass::SouthWest => [[2.0, 1.0, 0.0], [1.0, 0.0, -1.0], [0.0, -1.0, -2.0]],
            Compass::South => [[1.0, 0.0, -1.0], [2.0, 0.0, -2.0], [1.0, 0.0, -1.0]],
            Compass::SouthEast => [[0.0, -1.0, -2.0], [1.0, 0.0, -1.0], [2.0, 1.0, 0.0]],
            Compass::East => [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]],
            Compass::NorthEast => [[-2.0, -1.0, 0.0], [-1.0, 0.0, 1.0], [0.0, 1.0, 2.0]],
        };
        Self::from_rows(table)
    }

    /// Returns the number of rows
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the coefficients in row-major order
    #[must_use]
    pub fn coefficients(&self) -> &[f32] {
        &self.data
    }

    /// Get the coefficient at row `i`, column `j`
    ///
    /// # Panics
    ///
    /// If `i` or `j` is outside of the kernel
    #[inline]
    #[must_use]
    pub fn at(&self, i: usize, j: usize) -> f32 {
        assert!(j < self.cols);
        self.data[i * self.cols + j]
    }

    /// Returns the `(row, col)` cell aligned with the output pixel: `(rows / 2, cols / 2)`
    ///
    /// Floor division is used for every parity, so a 2x2 kernel anchors at its
    /// bottom-right cell and reads the pixel itself, its left, upper and upper-left
    /// neighbors.
    // TODO: add a centered-anchor mode for even-sized kernels (2x2 Roberts output is shifted by half a pixel)
    #[must_use]
    pub const fn anchor(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }
}

fn cell_count(rows: usize, cols: usize) -> Result<usize, Error> {
    rows.checked_mul(cols).ok_or_else(|| {
        Error::InvalidParameter(format!("kernel of {rows}x{cols} coefficients is too large"))
    })
}

// same fallible allocation as the pixel buffers
fn filled(len: usize, value: f32) -> Result<Vec<f32>, Error> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| Error::Allocation {
        bytes: len.saturating_mul(std::mem::size_of::<f32>()),
    })?;
    data.resize(len, value);
    Ok(data)
}

/// Two-direction gradient operators, combined by Euclidean magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum EdgeOperator {
    /// 3x3 Prewitt operator
    Prewitt,
    /// 3x3 Sobel operator
    Sobel,
    /// 2x2 Roberts cross
    Roberts,
}

impl EdgeOperator {
    /// Returns the `(horizontal, vertical)` kernel pair
    ///
    /// Horizontal kernels respond to horizontal edges (intensity changing from one row
    /// to the next), vertical kernels to vertical edges.
    #[must_use]
    pub fn kernels(self) -> (Kernel, Kernel) {
        match self {
            Self::Prewitt => (
                Kernel::from_rows([[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]),
                Kernel::from_rows([[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]]),
            ),
            Self::Sobel => (
                Kernel::from_rows([[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]]),
                Kernel::from_rows([[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]]),
            ),
            Self::Roberts => (
                Kernel::from_rows([[1.0, 0.0], [0.0, -1.0]]),
                Kernel::from_rows([[0.0, 1.0], [-1.0, 0.0]]),
            ),
        }
    }
}

/// Sign and neighborhood of a Laplacian kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Laplacian {
    /// 4-neighbor, neighbors -1 and center +4
    FourNegative,
    /// 4-neighbor, neighbors +1 and center -4
    FourPositive,
    /// 8-neighbor, neighbors -1 and center +8
    EightNegative,
    /// 8-neighbor, neighbors +1 and center -8
    EightPositive,
}

/// The eight directions of the Robinson compass operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display, IntoStaticStr)]
pub enum Compass {
    /// North
    #[strum(serialize = "N")]
    North,
    /// North-west
    #[strum(serialize = "NW")]
    NorthWest,
    /// West
    #[strum(serialize = "W")]
    West,
    /// South-west
    #[strum(serialize = "SW")]
    SouthWest,
    /// South
    #[strum(serialize = "S")]
    South,
    /// South-east
    #[strum(serialize = "SE")]
    SouthEast,
    /// East
    #[strum(serialize = "E")]
    East,
    /// North-east
    #[strum(serialize = "NE")]
    NorthEast,
}
