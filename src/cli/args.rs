use crate::config::{Config, DEFAULT_FORMAT, DEFAULT_QUALITY};
use crate::validator::ValidationMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "image_converter")]
#[command(about = "Convert a directory of images to WebP, JPEG, AVIF or PNG")]
#[command(version)]
pub struct Cli {
    /// Directory containing the images to convert
    pub input_dir: PathBuf,

    /// Target format (webp, jpeg, jpeg-xl, avif, png)
    #[arg(short, long, default_value = DEFAULT_FORMAT)]
    pub format: String,

    /// Encoder quality (0-100)
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub quality: u8,

    /// Use lossless encoding where the format supports it
    #[arg(long)]
    pub lossless: bool,

    /// Descend into subdirectories (default)
    #[arg(long, overrides_with = "no_recursive")]
    pub recursive: bool,

    /// Only convert images directly inside the input directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Output directory [default: ~/Downloads/ImageConverter_Output]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of workers (default: CPU count - 1)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// List the images that would be converted and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Output filename pattern (reserved)
    #[arg(long)]
    pub filename_pattern: Option<String>,

    /// Accept only PNG files, checked by signature
    #[arg(long)]
    pub strict_png: bool,

    /// Do not copy EXIF metadata into converted files
    #[arg(long)]
    pub strip_metadata: bool,

    /// Write the batch result as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Cli {
    pub fn is_recursive(&self) -> bool {
        !self.no_recursive
    }

    /// 引数から変換設定を組み立てる
    pub fn to_config(&self) -> Config {
        let mode = if self.strict_png {
            ValidationMode::StrictPng
        } else {
            ValidationMode::General
        };

        let mut config = Config::new()
            .with_format(self.format.as_str())
            .with_quality(self.quality)
            .with_lossless(self.lossless)
            .with_recursive(self.is_recursive())
            .with_preserve_metadata(!self.strip_metadata)
            .with_validation_mode(mode)
            .with_filename_pattern(self.filename_pattern.clone());

        if let Some(output) = &self.output {
            config = config.with_output_dir(output.clone());
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        config
    }
}
