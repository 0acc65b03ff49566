use super::codecs::{self, CodecRegistry, EncodeParams};
use super::{metadata, transform, ConverterBackend};
use crate::core::{ConversionResult, FailureKind, OutputFormat};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 変換エラーを検証エラーと区別するための接頭辞
const CONVERSION_ERROR_PREFIX: &str = "Conversion error";

/// `image`クレートとlibwebpを使った標準の変換器
#[derive(Clone, Debug)]
pub struct StandardConverter {
    registry: CodecRegistry,
    preserve_metadata: bool,
}

impl Default for StandardConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardConverter {
    /// エンコーダの可用性を調べて変換器を作成
    pub fn new() -> Self {
        Self {
            registry: CodecRegistry::detect(),
            preserve_metadata: true,
        }
    }

    pub fn with_registry(registry: CodecRegistry) -> Self {
        Self {
            registry,
            preserve_metadata: true,
        }
    }

    /// EXIFの再付与を行うかどうか
    pub fn with_metadata(mut self, preserve: bool) -> Self {
        self.preserve_metadata = preserve;
        self
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }
}

#[async_trait]
impl ConverterBackend for StandardConverter {
    async fn convert(
        &self,
        input_path: &Path,
        output_path: &Path,
        format: &str,
        quality: u8,
        lossless: bool,
    ) -> ConversionResult {
        let target = match format.parse::<OutputFormat>() {
            Ok(target) => target,
            Err(e) => return ConversionResult::failure(FailureKind::UnsupportedFormat, e.to_string()),
        };

        if !self.registry.is_available(target) {
            return ConversionResult::failure(
                FailureKind::FormatUnavailable,
                format!("Format unavailable: {target} (no encoder available in this build)"),
            );
        }

        let job = ConversionJob {
            input: input_path.to_path_buf(),
            output: output_path.to_path_buf(),
            target,
            params: EncodeParams::for_format(target, quality, lossless),
            preserve_metadata: self.preserve_metadata,
        };

        tokio::task::spawn_blocking(move || job.run())
            .await
            .unwrap_or_else(|e| {
                ConversionResult::failure(
                    FailureKind::Encode,
                    format!("{CONVERSION_ERROR_PREFIX}: conversion task failed: {e}"),
                )
            })
    }

    fn strategy_name(&self) -> &'static str {
        if self.preserve_metadata {
            "Standard"
        } else {
            "Standard without metadata"
        }
    }
}

fn io_failure(error: std::io::Error) -> (FailureKind, anyhow::Error) {
    (FailureKind::Io, error.into())
}

/// ブロッキングスレッドで実行する1ファイル分の変換
struct ConversionJob {
    input: PathBuf,
    output: PathBuf,
    target: OutputFormat,
    params: EncodeParams,
    preserve_metadata: bool,
}

impl ConversionJob {
    fn run(self) -> ConversionResult {
        match self.write_converted() {
            Ok(bag) => {
                if self.preserve_metadata && !bag.is_empty() {
                    self.reapply_metadata(&bag);
                }
                ConversionResult::success(format!("Successfully converted to {}", self.target))
            }
            Err((kind, error)) => ConversionResult::failure(
                kind,
                format!("{CONVERSION_ERROR_PREFIX}: {error:#}"),
            ),
        }
    }

    fn write_converted(&self) -> Result<metadata::MetadataBag, (FailureKind, anyhow::Error)> {
        let data = std::fs::read(&self.input).map_err(io_failure)?;

        // メタデータは変換前に取り出す
        let (image, bag) =
            metadata::decode_with_metadata(&data).map_err(|e| (FailureKind::Decode, e))?;

        let prepared = transform::prepare_for(self.target, image);
        let encoded = codecs::encode(&prepared, &self.params).map_err(|e| (FailureKind::Encode, e))?;

        if let Some(parent) = self.output.parent() {
            std::fs::create_dir_all(parent).map_err(io_failure)?;
        }
        std::fs::write(&self.output, encoded).map_err(io_failure)?;

        Ok(bag)
    }

    /// 失敗しても変換結果には影響させない
    fn reapply_metadata(&self, bag: &metadata::MetadataBag) {
        let Some(exif) = bag.exif.as_deref() else {
            return;
        };
        if let Err(e) = metadata::apply_exif(&self.output, exif) {
            debug!(output = %self.output.display(), error = %e, "EXIF not carried over");
        }
    }
}
