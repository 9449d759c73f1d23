use bmpfx::sibling_path;
use libbmp::{
    filter::{EdgeOperator, Laplacian},
    ops::Rotation,
};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use anyhow::Result;
use clap::{Parser, Subcommand};

#[cfg(not(debug_assertions))]
const DEFAULT_DEBUG_LEVEL: u8 = 1;
#[cfg(debug_assertions)]
const DEFAULT_DEBUG_LEVEL: u8 = 99;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, default_value_t = DEFAULT_DEBUG_LEVEL, action = clap::ArgAction::Count)]
    verbosity: u8,

    /// The input bitmap
    input: PathBuf,

    /// The output file name, derived from the input name when omitted
    #[arg(global = true, short, long)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// loads and re-saves a bitmap unchanged
    Copy,

    /// convolves with a center-surround kernel
    Convolve {
        #[arg(long, default_value_t = 3)]
        size: usize,
    },

    /// uniform box blur
    Blur {
        #[arg(long, default_value_t = 3)]
        size: usize,
        /// leave a border of original pixels instead of zero-padding
        #[arg(long)]
        bordered: bool,
    },

    /// high-pass sharpening
    Sharpen,

    /// two-direction edge detection, writes horizontal, vertical and combined images
    Edges {
        /// prewitt, sobel or roberts
        operator: EdgeOperator,
    },

    /// laplacian edge detection
    Laplacian {
        /// four-negative, four-positive, eight-negative or eight-positive
        #[arg(default_value = "four-negative")]
        variant: Laplacian,
    },

    /// robinson compass edge detection, writes one image per direction
    Robinson,

    /// maximum filter
    Max {
        #[arg(long, default_value_t = 3)]
        size: usize,
    },

    /// adds a signed amount to every sample
    Brightness {
        #[arg(allow_negative_numbers = true)]
        delta: i16,
    },

    /// inverts every sample
    Negative,

    /// thresholds every sample to black or white
    Binarize {
        #[arg(long, default_value_t = 128)]
        threshold: u8,
    },

    /// salt-and-pepper noise
    #[command(name = "salt-pepper")]
    SaltPepper {
        #[arg(long, default_value_t = 0.05)]
        probability: f64,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// additive gaussian noise
    Gaussian {
        #[arg(long, default_value_t = 0.0)]
        mean: f64,
        #[arg(long, default_value_t = 100.0)]
        variance: f64,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// writes the normalized histogram of an 8-bit image as text
    Histogram,

    /// histogram equalization of an 8-bit image
    Equalize,

    /// rotates by a multiple of 90 degrees
    Rotate {
        /// cw, ccw or 180
        rotation: Rotation,
    },

    /// sepia tone for 24-bit images
    Sepia,

    /// grayscale conversion for 24-bit images
    Grayscale,

    /// converts a bitmap to PNG
    Png,
}

impl Commands {
    // suffix and extension of the default output name
    fn output_suffix(&self) -> (String, &'static str) {
        let suffix = match self {
            Self::Copy => "copy".to_owned(),
            Self::Convolve { .. } => "convolved".to_owned(),
            Self::Blur { bordered: true, .. } => "blur_bordered".to_owned(),
            Self::Blur { .. } => "blur".to_owned(),
            Self::Sharpen => "sharpened".to_owned(),
            Self::Edges { operator } => operator.to_string(),
            Self::Laplacian { variant } => format!("laplacian_{variant}"),
            Self::Robinson => "robinson".to_owned(),
            Self::Max { .. } => "max".to_owned(),
            Self::Brightness { .. } => "brightness".to_owned(),
            Self::Negative => "negative".to_owned(),
            Self::Binarize { .. } => "binarized".to_owned(),
            Self::SaltPepper { .. } => "salt_pepper".to_owned(),
            Self::Gaussian { .. } => "gaussian".to_owned(),
            Self::Histogram => "histogram".to_owned(),
            Self::Equalize => "equalized".to_owned(),
            Self::Rotate { rotation } => format!("rotated_{rotation}"),
            Self::Sepia => "sepia".to_owned(),
            Self::Grayscale => "grayscale".to_owned(),
            Self::Png => return (String::new(), "png"),
        };
        let extension = match self {
            Self::Histogram => "txt",
            _ => "bmp",
        };
        (suffix, extension)
    }
}

fn output_path(input: &Path, output: Option<PathBuf>, command: &Commands) -> Result<PathBuf> {
    if let Some(output) = output {
        return Ok(output);
    }
    let output = match command.output_suffix() {
        (suffix, extension) if suffix.is_empty() => input.with_extension(extension),
        (suffix, extension) => sibling_path(input, &suffix, extension)?,
    };
    info!("output name: {}", output.display());
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .init();

    let output = output_path(&cli.input, cli.output, &cli.command)?;
    let (input, output) = (cli.input.as_path(), output.as_path());

    match cli.command {
        Commands::Copy => bmpfx::copy(input, output)?,
        Commands::Convolve { size } => bmpfx::center_surround(input, output, size)?,
        Commands::Blur { size, bordered } => bmpfx::blur(input, output, size, bordered)?,
        Commands::Sharpen => bmpfx::sharpen(input, output)?,
        Commands::Edges { operator } => bmpfx::edges(input, output, operator)?,
        Commands::Laplacian { variant } => bmpfx::laplacian(input, output, variant)?,
        Commands::Robinson => bmpfx::robinson(input, output)?,
        Commands::Max { size } => bmpfx::max(input, output, size)?,
        Commands::Brightness { delta } => bmpfx::brightness(input, output, delta)?,
        Commands::Negative => bmpfx::negative(input, output)?,
        Commands::Binarize { threshold } => bmpfx::binarize(input, output, threshold)?,
        Commands::SaltPepper { probability, seed } => {
            bmpfx::salt_and_pepper(input, output, probability, seed)?;
        }
        Commands::Gaussian {
            mean,
            variance,
            seed,
        } => bmpfx::gaussian(input, output, mean, variance, seed)?,
        Commands::Histogram => bmpfx::histogram(input, output)?,
        Commands::Equalize => bmpfx::equalize(input, output)?,
        Commands::Rotate { rotation } => bmpfx::rotate(input, output, rotation)?,
        Commands::Sepia => bmpfx::sepia(input, output)?,
        Commands::Grayscale => bmpfx::grayscale(input, output)?,
        Commands::Png => bmpfx::bmp_to_png(input, output)?,
    }
    Ok(())
}
