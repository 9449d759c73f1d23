use crate::Error;

/// Returns the number of bytes one scanline occupies, padded to a multiple of 4
#[must_use]
pub const fn row_stride(width: usize, bytes_per_pixel: usize) -> usize {
    (width * bytes_per_pixel + 3) & !3
}

/// Allocates a zero-filled buffer, reporting allocation failure instead of aborting
pub(crate) fn allocate(len: usize) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { bytes: len })?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Padded pixel data of an uncompressed bitmap
///
/// Rows are kept in file order and each one occupies exactly [`BitMap::stride`] bytes,
/// of which only the first `width * channels` are meaningful.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BitMap {
    /// The width of the image
    width: usize,
    /// The height of the image
    height: usize,
    /// Bytes per pixel
    channels: usize,
    /// Image pixels, including row padding
    pixels: Vec<u8>,
}

impl BitMap {
    pub(crate) fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, Error> {
        let expected = buffer_len(width, height, channels)?;
        if data.len() != expected {
            return Err(Error::MismatchedDimensions {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            pixels: data,
        })
    }

    /// Creates a new [`BitMap`] with every byte, padding included, set to zero
    pub(crate) fn zeroed(width: usize, height: usize, channels: usize) -> Result<Self, Error> {
        Ok(Self {
            width,
            height,
            channels,
            pixels: allocate(buffer_len(width, height, channels)?)?,
        })
    }

    /// Creates a zeroed [`BitMap`] with the same dimensions as `self`
    pub(crate) fn zeroed_like(&self) -> Result<Self, Error> {
        Self::zeroed(self.width, self.height, self.channels)
    }

    /// Returns the width of the image
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the height of the image
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of bytes per pixel
    #[must_use]
    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the padded length of one row in bytes
    #[must_use]
    pub const fn stride(&self) -> usize {
        row_stride(self.width, self.channels)
    }

    /// Returns the whole pixel buffer, padding included
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Returns the value of one channel of one pixel
    ///
    /// # Panics
    ///
    /// If `x`, `y` or `channel` lie outside of the image
    #[must_use]
    pub fn sample(&self, x: usize, y: usize, channel: usize) -> u8 {
        assert!(x < self.width && channel < self.channels);
        self.pixels[y * self.stride() + x * self.channels + channel]
    }

    /// Sets the value of one channel of one pixel
    ///
    /// # Panics
    ///
    /// If `x`, `y` or `channel` lie outside of the image
    pub fn set_sample(&mut self, x: usize, y: usize, channel: usize, value: u8) {
        assert!(x < self.width && channel < self.channels);
        let stride = self.stride();
        self.pixels[y * stride + x * self.channels + channel] = value;
    }

    /// Returns all channels of one pixel
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        let start = x * self.channels;
        self.row(y)?.get(start..start + self.channels)
    }

    /// Returns the meaningful bytes of a row, without padding
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y < self.height {
            let start_index = y * self.stride();
            let end_index = start_index + self.width * self.channels;
            Some(&self.pixels[start_index..end_index])
        } else {
            None
        }
    }

    /// Returns the meaningful bytes of a row mutably, without padding
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y < self.height {
            let start_index = y * self.stride();
            let end_index = start_index + self.width * self.channels;
            Some(&mut self.pixels[start_index..end_index])
        } else {
            None
        }
    }

    /// Returns an iterator over the meaningful bytes of every row, in file order
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[u8]> + '_ {
        let used = self.width * self.channels;
        self.pixels
            .chunks_exact(self.stride())
            .map(move |row| &row[..used])
    }

    /// Returns a mutable iterator over the meaningful bytes of every row, in file order
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> + '_ {
        let used = self.width * self.channels;
        let stride = self.stride();
        self.pixels
            .chunks_exact_mut(stride)
            .map(move |row| &mut row[..used])
    }

    /// Applies `f` to every meaningful byte and returns the result in a fresh buffer with
    /// zeroed padding
    pub(crate) fn map_samples(&self, mut f: impl FnMut(u8) -> u8) -> Result<Self, Error> {
        let mut out = self.zeroed_like()?;
        for (dst, src) in out.rows_mut().zip(self.rows()) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = f(*s);
            }
        }
        Ok(out)
    }
}

fn buffer_len(width: usize, height: usize, channels: usize) -> Result<usize, Error> {
    width
        .checked_mul(channels)
        .and_then(|w| w.checked_add(3))
        .and_then(|w| (w & !3).checked_mul(height))
        .ok_or(Error::Allocation { bytes: usize::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_padded_to_four_bytes() {
        for width in 1..=64 {
            for bpp in [1, 3] {
                let stride = row_stride(width, bpp);
                assert_eq!(stride % 4, 0);
                assert!(stride >= width * bpp);
                assert_eq!(stride, (width * bpp).div_ceil(4) * 4);
            }
        }
        assert_eq!(row_stride(5, 1), 8);
        assert_eq!(row_stride(5, 3), 16);
        assert_eq!(row_stride(8, 1), 8);
    }

    #[test]
    fn rejects_buffer_of_wrong_length() {
        assert!(matches!(
            BitMap::new(5, 2, 1, vec![0; 10]),
            Err(Error::MismatchedDimensions {
                expected: 16,
                actual: 10
            })
        ));
    }

    #[test]
    fn rows_skip_padding() {
        let data = (0..16).collect::<Vec<u8>>();
        let bitmap = BitMap::new(5, 2, 1, data).unwrap();
        let rows: Vec<_> = bitmap.rows().collect();
        assert_eq!(rows, vec![&[0, 1, 2, 3, 4][..], &[8, 9, 10, 11, 12][..]]);
        assert_eq!(bitmap.sample(4, 1, 0), 12);
        assert_eq!(bitmap.row(2), None);
    }

    #[test]
    fn pixels_address_all_channels() {
        let mut bitmap = BitMap::zeroed(2, 2, 3).unwrap();
        assert_eq!(bitmap.stride(), 8);
        bitmap.set_sample(1, 1, 2, 99);
        assert_eq!(bitmap.pixel(1, 1), Some(&[0, 0, 99][..]));
        assert_eq!(bitmap.as_bytes()[8 + 3 + 2], 99);
    }

    #[test]
    fn mapped_samples_zero_the_padding() {
        let bitmap = BitMap::new(3, 1, 1, vec![1, 2, 3, 0xAA]).unwrap();
        let mapped = bitmap.map_samples(|v| v * 2).unwrap();
        assert_eq!(mapped.as_bytes(), &[2, 4, 6, 0]);
    }
}
