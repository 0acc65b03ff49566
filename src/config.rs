// 変換設定のデフォルト値と設定構造体

use crate::core::ConversionOptions;
use crate::validator::ValidationMode;
use std::path::PathBuf;

pub const DEFAULT_FORMAT: &str = "webp";
pub const DEFAULT_QUALITY: u8 = 85;
pub const DEFAULT_LOSSLESS: bool = false;
pub const DEFAULT_RECURSIVE: bool = true;
pub const DEFAULT_PRESERVE_METADATA: bool = true;

/// 出力先ディレクトリ名（ホームの Downloads 配下）
const OUTPUT_DIR_NAME: &str = "ImageConverter_Output";

/// デフォルトの出力ディレクトリ
///
/// ホームディレクトリが取得できない環境ではカレントディレクトリ配下を使う
pub fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Downloads")
        .join(OUTPUT_DIR_NAME)
}

/// デフォルトのワーカー数（CPU数 - 1、最低1）
pub fn default_workers() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

/// アプリケーション全体の設定
#[derive(Debug, Clone)]
pub struct Config {
    pub format: String,
    pub quality: u8,
    pub lossless: bool,
    pub recursive: bool,
    pub preserve_metadata: bool,
    pub output_dir: PathBuf,
    pub workers: usize,
    pub validation_mode: ValidationMode,
    pub filename_pattern: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            quality: DEFAULT_QUALITY,
            lossless: DEFAULT_LOSSLESS,
            recursive: DEFAULT_RECURSIVE,
            preserve_metadata: DEFAULT_PRESERVE_METADATA,
            output_dir: default_output_dir(),
            workers: default_workers(),
            validation_mode: ValidationMode::General,
            filename_pattern: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_lossless(mut self, lossless: bool) -> Self {
        self.lossless = lossless;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_preserve_metadata(mut self, preserve: bool) -> Self {
        self.preserve_metadata = preserve;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// ワーカー数を設定（0は1に丸める）
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    pub fn with_filename_pattern(mut self, pattern: Option<String>) -> Self {
        self.filename_pattern = pattern;
        self
    }

    /// バッチ実行用の変換オプションを作成
    pub fn to_options(&self) -> ConversionOptions {
        ConversionOptions::new(self.format.clone(), self.output_dir.clone())
            .with_quality(self.quality)
            .with_lossless(self.lossless)
            .with_filename_pattern(self.filename_pattern.clone())
    }
}
