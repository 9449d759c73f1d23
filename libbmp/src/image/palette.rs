use crate::PALETTE_SIZE;

/// Number of entries in an 8-bit palette
pub const PALETTE_ENTRIES: usize = 256;

/// The color table of an 8-bit indexed bitmap
///
/// Entries are stored as they appear on disk: blue, green, red, reserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Palette {
    entries: [[u8; 4]; PALETTE_ENTRIES],
}

impl Palette {
    /// Creates the identity grayscale palette, where index `i` maps to `(i, i, i)`
    #[must_use]
    pub fn grayscale() -> Self {
        let mut entries = [[0; 4]; PALETTE_ENTRIES];
        for (i, entry) in (0..=u8::MAX).zip(entries.iter_mut()) {
            *entry = [i, i, i, 0];
        }
        Self { entries }
    }

    pub(crate) fn from_bytes(bytes: &[u8; PALETTE_SIZE]) -> Self {
        let mut entries = [[0; 4]; PALETTE_ENTRIES];
        for (entry, chunk) in entries.iter_mut().zip(bytes.chunks_exact(4)) {
            entry.copy_from_slice(chunk);
        }
        Self { entries }
    }

    /// Returns the palette in its on-disk layout
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.entries.iter().flatten().copied().collect()
    }

    /// Returns the raw (B, G, R, reserved) entry for an index
    #[must_use]
    pub const fn entry(&self, index: u8) -> [u8; 4] {
        self.entries[index as usize]
    }

    /// Returns the color of an index in (R, G, B) order
    #[must_use]
    pub const fn rgb(&self, index: u8) -> [u8; 3] {
        let [b, g, r, _] = self.entry(index);
        [r, g, b]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_is_identity() {
        let palette = Palette::grayscale();
        assert_eq!(palette.entry(0), [0, 0, 0, 0]);
        assert_eq!(palette.entry(37), [37, 37, 37, 0]);
        assert_eq!(palette.rgb(255), [255, 255, 255]);
    }

    #[test]
    fn bytes_keep_bgr_order() {
        let mut bytes = [0u8; PALETTE_SIZE];
        bytes[4..8].copy_from_slice(&[10, 20, 30, 40]);
        let palette = Palette::from_bytes(&bytes);
        assert_eq!(palette.entry(1), [10, 20, 30, 40]);
        assert_eq!(palette.rgb(1), [30, 20, 10]);
        assert_eq!(palette.to_bytes(), bytes.to_vec());
    }
}
