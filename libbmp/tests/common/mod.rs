#![allow(dead_code)]

use std::{fs, path::Path};

use mktemp::Temp;

/// Assembles a bitmap file by hand, independently of the crate's writer
///
/// `pixel` is called for every meaningful sample; padding bytes are filled with
/// `padding` so round trips can check that they survive.
pub fn bitmap_bytes(
    width: u32,
    height: u32,
    bit_count: u16,
    padding: u8,
    pixel: impl Fn(usize, usize, usize) -> u8,
) -> Vec<u8> {
    let channels = usize::from(bit_count / 8);
    let stride = (width as usize * channels + 3) & !3;
    let palette_len = if bit_count == 8 { 1024 } else { 0 };
    let offset = 54 + palette_len;
    let image_size = stride * height as usize;

    let mut bytes = Vec::with_capacity(offset + image_size);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&((offset + image_size) as u32).to_le_bytes());
    bytes.extend_from_slice(&[0; 4]);
    bytes.extend_from_slice(&(offset as u32).to_le_bytes());
    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&bit_count.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&(image_size as u32).to_le_bytes());
    bytes.extend_from_slice(&2835i32.to_le_bytes());
    bytes.extend_from_slice(&2835i32.to_le_bytes());
    bytes.extend_from_slice(&(if bit_count == 8 { 256u32 } else { 0 }).to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(bytes.len(), 54);

    if bit_count == 8 {
        for i in 0..=255u8 {
            bytes.extend_from_slice(&[i, i, i, 0]);
        }
    }
    for y in 0..height as usize {
        let start = bytes.len();
        for x in 0..width as usize {
            for c in 0..channels {
                bytes.push(pixel(x, y, c));
            }
        }
        bytes.resize(start + stride, padding);
    }
    bytes
}

/// A grayscale gradient with non-multiple-of-four width
pub fn gray_gradient() -> Vec<u8> {
    bitmap_bytes(13, 7, 8, 0xA5, |x, y, _| (x * 17 + y * 3) as u8)
}

/// A truecolor pattern with non-multiple-of-four row length
pub fn color_pattern() -> Vec<u8> {
    bitmap_bytes(5, 4, 24, 0x5A, |x, y, c| (x * 40 + y * 11 + c * 70) as u8)
}

/// Writes `bytes` to a fresh temporary file
pub fn temp_bitmap(bytes: &[u8]) -> anyhow::Result<Temp> {
    let path = Temp::new_file()?;
    fs::write(&path, bytes)?;
    Ok(path)
}

pub fn digest(path: impl AsRef<Path>) -> anyhow::Result<String> {
    Ok(sha256::try_digest(path.as_ref())?)
}
