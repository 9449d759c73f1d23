use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use image::{codecs::png::PngEncoder, ImageEncoder};
use libbmp::{
    filter::{self, EdgeOperator, Kernel, Laplacian},
    ops::{self, Rotation},
    BmpImage,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, instrument};

/// Builds `<dir>/<stem>_<suffix>.<extension>` next to `path`
///
/// # Errors
///
/// This function errors if `path` has no parent or no UTF-8 file stem
pub fn sibling_path(path: &Path, suffix: &str, extension: &str) -> Result<PathBuf> {
    let Some(dir) = path.parent() else {
        bail!("Invalid path {}", path.display());
    };
    let Some(Some(filename)) = path.file_stem().map(|os| os.to_str()) else {
        bail!("Invalid file name {}", path.display());
    };
    let mut output = PathBuf::new();
    output.push(dir);
    output.push(format!("{filename}_{suffix}.{extension}"));
    Ok(output)
}

fn load(input: &Path) -> Result<BmpImage> {
    let image =
        libbmp::load(input).with_context(|| format!("Failed to load {}", input.display()))?;
    debug!(
        "Loaded {}x{} {}-bit image",
        image.width(),
        image.height(),
        image.depth()
    );
    Ok(image)
}

fn save(output: &Path, image: &BmpImage) -> Result<()> {
    libbmp::save(output, image).with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {}", output.display());
    Ok(())
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[instrument]
pub fn copy(input: &Path, output: &Path) -> Result<()> {
    save(output, &load(input)?)
}

#[instrument]
pub fn center_surround(input: &Path, output: &Path, size: usize) -> Result<()> {
    let kernel = Kernel::center_surround(size, size)?;
    save(output, &filter::convolve(&load(input)?, &kernel)?)
}

#[instrument]
pub fn blur(input: &Path, output: &Path, size: usize, bordered: bool) -> Result<()> {
    let image = load(input)?;
    let blurred = if bordered {
        filter::blur_bordered(&image, size)?
    } else {
        filter::blur(&image, size)?
    };
    save(output, &blurred)
}

#[instrument]
pub fn sharpen(input: &Path, output: &Path) -> Result<()> {
    save(output, &filter::sharpen(&load(input)?)?)
}

/// Writes the combined magnitude to `output`, and the two directional responses next to
/// it with `_h` and `_v` suffixes
#[instrument]
pub fn edges(input: &Path, output: &Path, operator: EdgeOperator) -> Result<()> {
    let edges = filter::detect_edges(&load(input)?, operator)?;
    save(&sibling_path(output, "h", "bmp")?, &edges.horizontal)?;
    save(&sibling_path(output, "v", "bmp")?, &edges.vertical)?;
    save(output, &edges.combined)
}

#[instrument]
pub fn laplacian(input: &Path, output: &Path, variant: Laplacian) -> Result<()> {
    save(output, &filter::laplacian(&load(input)?, variant)?)
}

/// Writes one file per compass direction, suffixed with the direction name
#[instrument]
pub fn robinson(input: &Path, output: &Path) -> Result<()> {
    for (direction, image) in filter::robinson(&load(input)?)? {
        save(&sibling_path(output, &direction.to_string(), "bmp")?, &image)?;
    }
    Ok(())
}

#[instrument]
pub fn max(input: &Path, output: &Path, size: usize) -> Result<()> {
    save(output, &filter::max_filter(&load(input)?, size)?)
}

#[instrument]
pub fn brightness(input: &Path, output: &Path, delta: i16) -> Result<()> {
    save(output, &ops::adjust_brightness(&load(input)?, delta)?)
}

#[instrument]
pub fn negative(input: &Path, output: &Path) -> Result<()> {
    save(output, &ops::negative(&load(input)?)?)
}

#[instrument]
pub fn binarize(input: &Path, output: &Path, threshold: u8) -> Result<()> {
    save(output, &ops::binarize(&load(input)?, threshold)?)
}

#[instrument]
pub fn salt_and_pepper(
    input: &Path,
    output: &Path,
    probability: f64,
    seed: Option<u64>,
) -> Result<()> {
    let mut rng = seeded(seed);
    let noisy = ops::salt_and_pepper_with_rng(&load(input)?, probability, &mut rng)?;
    save(output, &noisy)
}

#[instrument]
pub fn gaussian(
    input: &Path,
    output: &Path,
    mean: f64,
    variance: f64,
    seed: Option<u64>,
) -> Result<()> {
    let mut rng = seeded(seed);
    let noisy = ops::gaussian_with_rng(&load(input)?, mean, variance, &mut rng)?;
    save(output, &noisy)
}

#[instrument]
pub fn histogram(input: &Path, output: &Path) -> Result<()> {
    let hist = ops::histogram(&load(input)?)?;
    ops::write_histogram(output, &hist)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

#[instrument]
pub fn equalize(input: &Path, output: &Path) -> Result<()> {
    save(output, &ops::equalize(&load(input)?)?)
}

#[instrument]
pub fn rotate(input: &Path, output: &Path, rotation: Rotation) -> Result<()> {
    save(output, &ops::rotate(&load(input)?, rotation)?)
}

#[instrument]
pub fn sepia(input: &Path, output: &Path) -> Result<()> {
    save(output, &ops::sepia(&load(input)?)?)
}

#[instrument]
pub fn grayscale(input: &Path, output: &Path) -> Result<()> {
    save(output, &ops::grayscale(&load(input)?)?)
}

#[instrument]
pub fn bmp_to_png(input: &Path, output_name: &Path) -> Result<()> {
    let bmp = load(input)?;

    let as_rgb = bmp.to_rgb8();
    debug!("Length of RGB data: {}", as_rgb.len());

    let output = File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(output_name)?;

    info!("Writing image to {}", output_name.display());
    let encoder = PngEncoder::new(output);
    encoder.write_image(
        &as_rgb,
        u32::try_from(bmp.width())?,
        u32::try_from(bmp.height())?,
        image::ExtendedColorType::Rgb8,
    )?;
    info!("Successfully wrote image to {}", output_name.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mktemp::Temp;

    fn fixture(dir: &Path) -> Result<PathBuf> {
        let mut image = BmpImage::grayscale(6, 4)?;
        for (y, row) in image.bitmap_mut().rows_mut().enumerate() {
            row.fill(u8::try_from(y * 60)?);
        }
        let path = dir.join("fixture.bmp");
        image.save(&path)?;
        Ok(path)
    }

    #[test]
    fn sibling_paths() -> Result<()> {
        let path = sibling_path(Path::new("/tmp/lena.bmp"), "sobel", "bmp")?;
        assert_eq!(path, PathBuf::from("/tmp/lena_sobel.bmp"));
        assert!(sibling_path(Path::new("/"), "x", "bmp").is_err());
        Ok(())
    }

    #[test]
    fn edges_write_three_files() -> Result<()> {
        let tmp = Temp::new_dir()?;
        let dir: &Path = tmp.as_ref();
        let input = fixture(dir)?;
        let output = sibling_path(&input, "prewitt", "bmp")?;
        edges(&input, &output, EdgeOperator::Prewitt)?;
        for path in [
            output.clone(),
            sibling_path(&output, "h", "bmp")?,
            sibling_path(&output, "v", "bmp")?,
        ] {
            assert_eq!(libbmp::load(&path)?.width(), 6);
        }
        Ok(())
    }

    #[test]
    fn robinson_writes_eight_files() -> Result<()> {
        let tmp = Temp::new_dir()?;
        let dir: &Path = tmp.as_ref();
        let input = fixture(dir)?;
        let output = sibling_path(&input, "robinson", "bmp")?;
        robinson(&input, &output)?;
        assert!(sibling_path(&output, "NW", "bmp")?.exists());
        assert_eq!(std::fs::read_dir(dir)?.count(), 9);
        Ok(())
    }

    #[test]
    fn seeded_noise_is_reproducible() -> Result<()> {
        let tmp = Temp::new_dir()?;
        let dir: &Path = tmp.as_ref();
        let input = fixture(dir)?;
        let (a, b) = (dir.join("a.bmp"), dir.join("b.bmp"));
        gaussian(&input, &a, 0.0, 100.0, Some(9))?;
        gaussian(&input, &b, 0.0, 100.0, Some(9))?;
        assert_eq!(std::fs::read(a)?, std::fs::read(b)?);
        Ok(())
    }

    #[test]
    fn png_export_decodes() -> Result<()> {
        let tmp = Temp::new_dir()?;
        let dir: &Path = tmp.as_ref();
        let input = fixture(dir)?;
        let output = sibling_path(&input, "export", "png")?;
        bmp_to_png(&input, &output)?;
        let png = image::open(&output)?.to_rgb8();
        assert_eq!(png.dimensions(), (6, 4));
        // the last file row is the top of the picture
        assert_eq!(png.get_pixel(0, 0).0, [180, 180, 180]);
        Ok(())
    }
}
