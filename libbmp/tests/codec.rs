use std::{fs, path::Path};

mod common;
use common::{bitmap_bytes, color_pattern, digest, gray_gradient, temp_bitmap};
use libbmp::{BmpImage, Depth, Error};
use mktemp::Temp;

#[test]
fn gray_round_trip_is_byte_exact() -> anyhow::Result<()> {
    let source = temp_bitmap(&gray_gradient())?;
    let image = libbmp::load(&source)?;
    assert_eq!(image.depth(), Depth::Eight);
    assert_eq!((image.width(), image.height(), image.row_stride()), (13, 7, 16));

    let copy = Temp::new_file()?;
    libbmp::save(&copy, &image)?;
    assert_eq!(digest(&source)?, digest(&copy)?);
    Ok(())
}

#[test]
fn color_round_trip_is_byte_exact() -> anyhow::Result<()> {
    let source = temp_bitmap(&color_pattern())?;
    let image = libbmp::load(&source)?;
    assert_eq!(image.depth(), Depth::TwentyFour);
    assert!(image.palette().is_none());
    assert_eq!(image.row_stride(), 16);

    let copy = Temp::new_file()?;
    image.save(&copy)?;
    assert_eq!(digest(&source)?, digest(&copy)?);
    Ok(())
}

#[test]
fn strides_for_every_small_width() -> anyhow::Result<()> {
    for width in 1..=9 {
        for bit_count in [8, 24] {
            let bytes = bitmap_bytes(width, 2, bit_count, 0xFF, |x, _, _| x as u8);
            let image = BmpImage::from_reader(&bytes[..])?;
            let stride = image.row_stride();
            assert_eq!(stride % 4, 0);
            assert!(stride >= width as usize * usize::from(bit_count / 8));
            assert_eq!(image.bitmap().as_bytes().len(), stride * 2);

            let mut out = Vec::new();
            image.to_writer(&mut out)?;
            assert_eq!(out, bytes);
        }
    }
    Ok(())
}

#[test]
fn crate_and_image_decoder_agree() -> anyhow::Result<()> {
    for bytes in [gray_gradient(), color_pattern()] {
        let ours = BmpImage::from_reader(&bytes[..])?;
        let theirs = image::load_from_memory_with_format(&bytes, image::ImageFormat::Bmp)?;
        assert_eq!(theirs.width() as usize, ours.width());
        assert_eq!(theirs.height() as usize, ours.height());
        assert_eq!(theirs.to_rgb8().into_raw(), ours.to_rgb8());
    }
    Ok(())
}

#[test]
fn written_images_decode_elsewhere() -> anyhow::Result<()> {
    let mut image = BmpImage::grayscale(6, 3)?;
    image.bitmap_mut().set_sample(5, 0, 0, 200);
    let mut bytes = Vec::new();
    image.to_writer(&mut bytes)?;
    let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Bmp)?.to_rgb8();
    // file row 0 is the bottom row of the picture
    assert_eq!(decoded.get_pixel(5, 2).0, [200, 200, 200]);
    assert_eq!(decoded.get_pixel(5, 0).0, [0, 0, 0]);
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = Temp::new_dir().unwrap();
    let dir: &Path = dir.as_ref();
    let result = libbmp::load(dir.join("missing.bmp"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn truncated_palette_is_an_io_error() -> anyhow::Result<()> {
    let bytes = gray_gradient();
    let path = temp_bitmap(&bytes[..600])?;
    assert!(matches!(libbmp::load(&path), Err(Error::Io(_))));
    Ok(())
}

#[test]
fn truncated_pixels_are_zero_filled() -> anyhow::Result<()> {
    let bytes = gray_gradient();
    let cut = bytes.len() - 20;
    let path = temp_bitmap(&bytes[..cut])?;
    let image = libbmp::load(&path)?;
    let pixels = image.bitmap().as_bytes();
    assert_eq!(&pixels[..pixels.len() - 20], &bytes[1078..cut]);
    assert!(pixels[pixels.len() - 20..].iter().all(|&b| b == 0));
    Ok(())
}

#[test]
fn non_positive_dimensions_are_rejected() -> anyhow::Result<()> {
    let mut bytes = gray_gradient();
    bytes[22..26].copy_from_slice(&(-7i32).to_le_bytes());
    assert!(matches!(
        BmpImage::from_reader(&bytes[..]),
        Err(Error::InvalidDimensions { width: 13, height: -7 })
    ));
    bytes[18..22].copy_from_slice(&0i32.to_le_bytes());
    assert!(BmpImage::from_reader(&bytes[..]).is_err());
    Ok(())
}

#[test]
fn saving_overwrites_existing_files() -> anyhow::Result<()> {
    let path = temp_bitmap(&[0xFF; 4096])?;
    let image = BmpImage::from_reader(&color_pattern()[..])?;
    image.save(&path)?;
    assert_eq!(fs::read(&path)?, color_pattern());
    Ok(())
}
