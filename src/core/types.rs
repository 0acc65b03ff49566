// 変換処理に関連するデータ型定義

use super::error::{ProcessingError, ProcessingResult, UnsupportedFormat};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutputFormat {
    #[serde(rename = "webp")]
    WebP,
    #[serde(rename = "jpeg")]
    Jpeg,
    #[serde(rename = "jpeg-xl")]
    JpegXl,
    #[serde(rename = "avif")]
    Avif,
    #[serde(rename = "png")]
    Png,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::WebP,
        OutputFormat::Jpeg,
        OutputFormat::JpegXl,
        OutputFormat::Avif,
        OutputFormat::Png,
    ];

    /// CLIやオプションで使われるフォーマット名
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Jpeg => "jpeg",
            Self::JpegXl => "jpeg-xl",
            Self::Avif => "avif",
            Self::Png => "png",
        }
    }

    /// 出力ファイルの拡張子（ドットなし）
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Jpeg => "jpg",
            Self::JpegXl => "jxl",
            Self::Avif => "avif",
            Self::Png => "png",
        }
    }

    /// `image`クレート側の対応フォーマット（JPEG-XLは存在しない）
    pub fn image_format(&self) -> Option<image::ImageFormat> {
        match self {
            Self::WebP => Some(image::ImageFormat::WebP),
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::JpegXl => None,
            Self::Avif => Some(image::ImageFormat::Avif),
            Self::Png => Some(image::ImageFormat::Png),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == lower)
            .ok_or_else(|| UnsupportedFormat(s.to_string()))
    }
}

/// 1回のバッチ実行に使う変換オプション
///
/// `format`は文字列のまま保持する。未知のフォーマットはファイル単位の
/// 変換失敗として記録される。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionOptions {
    pub format: String,
    pub quality: u8,
    pub lossless: bool,
    pub output_dir: PathBuf,
    /// 予約済み。出力ファイル名の生成には使われない
    pub filename_pattern: Option<String>,
}

impl ConversionOptions {
    pub fn new(format: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            format: format.into(),
            quality: crate::config::DEFAULT_QUALITY,
            lossless: false,
            output_dir: output_dir.into(),
            filename_pattern: None,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_lossless(mut self, lossless: bool) -> Self {
        self.lossless = lossless;
        self
    }

    pub fn with_filename_pattern(mut self, pattern: Option<String>) -> Self {
        self.filename_pattern = pattern;
        self
    }

    /// 品質値の範囲チェック
    pub fn validate(&self) -> ProcessingResult<()> {
        if self.quality > 100 {
            return Err(ProcessingError::configuration(format!(
                "品質は0から100の範囲である必要があります: {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// 変換失敗の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 未知のフォーマット名
    UnsupportedFormat,
    /// フォーマットは既知だがエンコーダが組み込まれていない
    FormatUnavailable,
    Decode,
    Encode,
    Io,
}

/// 1ファイル分の変換結果
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub success: bool,
    pub message: String,
    pub failure: Option<FailureKind>,
}

impl ConversionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            failure: None,
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            failure: Some(kind),
        }
    }
}

/// 失敗したファイルの記録
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    pub file: PathBuf,
    pub error: String,
    pub kind: FailureKind,
}

/// バッチ全体の集計結果
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    pub errors: Vec<ErrorRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for BatchResult {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchResult {
    pub fn new() -> Self {
        Self {
            total: 0,
            successes: 0,
            failures: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// 1ファイル分の結果を集計に反映
    pub fn record(&mut self, file: &Path, result: &ConversionResult) {
        self.total += 1;
        if result.success {
            self.successes += 1;
        } else {
            self.failures += 1;
            self.errors.push(ErrorRecord {
                file: file.to_path_buf(),
                error: result.message.clone(),
                kind: result.failure.unwrap_or(FailureKind::Encode),
            });
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// 指定した分類の失敗のみ取得
    pub fn errors_of_kind(&self, kind: FailureKind) -> Vec<&ErrorRecord> {
        self.errors.iter().filter(|e| e.kind == kind).collect()
    }

    /// 集計値の整合性
    pub fn is_consistent(&self) -> bool {
        self.total == self.successes + self.failures && self.failures == self.errors.len()
    }
}
