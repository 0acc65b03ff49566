// BatchProcessor - 発見から変換・集計までを順次実行する

use crate::{
    config::default_workers,
    converter::ConverterBackend,
    core::{BatchResult, ConversionOptions, ProcessingError, ProcessingResult},
    file_scanner::FileScanner,
    naming::generate_output_path,
    validator::Validator,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 進捗コールバック `(完了数, 総数, 現在のファイル名)`
pub type ProgressCallback<'a> = &'a mut (dyn FnMut(usize, usize, &str) + Send);

/// バッチ変換の実行器
///
/// 変換は1ファイルずつ順番に行う。`workers`は並列実行用に予約された設定値で、
/// 現在の処理には影響しない。
pub struct BatchProcessor<C> {
    converter: C,
    validator: Validator,
    workers: usize,
}

impl<C> BatchProcessor<C>
where
    C: ConverterBackend,
{
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            validator: Validator::default(),
            workers: default_workers(),
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// ワーカー数を設定（`None`ならCPU数 - 1、最低1）
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers.map_or_else(default_workers, |w| w.max(1));
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// ディレクトリから変換対象の画像を発見
    ///
    /// 検証に通らないファイルは黙って除外する。
    pub fn discover(&self, root: &Path, recursive: bool) -> ProcessingResult<Vec<PathBuf>> {
        let candidates = FileScanner::scan_directory(
            root,
            recursive,
            self.validator.mode().supported_extensions(),
        )
        .map_err(|e| ProcessingError::file_discovery(root.display().to_string(), e))?;

        let found: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|path| match self.validator.validate(path) {
                Ok(()) => true,
                Err(reason) => {
                    debug!(path = %path.display(), %reason, "excluded from batch");
                    false
                }
            })
            .collect();

        info!(root = %root.display(), recursive, found = found.len(), "discovery finished");
        Ok(found)
    }

    /// ファイルリストを順番に変換して集計する
    ///
    /// 失敗はファイル単位で記録され、バッチは中断しない。コールバックは
    /// 成否にかかわらず各ファイルの処理後に1回ずつ呼ばれる。
    pub async fn process_batch(
        &self,
        paths: &[PathBuf],
        options: &ConversionOptions,
        mut progress: Option<ProgressCallback<'_>>,
    ) -> BatchResult {
        let total = paths.len();
        let mut result = BatchResult::new();

        info!(
            total,
            format = %options.format,
            quality = options.quality,
            lossless = options.lossless,
            converter = self.converter.strategy_name(),
            "starting batch"
        );
        if options.filename_pattern.is_some() {
            debug!("filename pattern is reserved and not applied to output names");
        }

        for (index, path) in paths.iter().enumerate() {
            let output_path = generate_output_path(path, &options.output_dir, &options.format);

            let outcome = self
                .converter
                .convert(
                    path,
                    &output_path,
                    &options.format,
                    options.quality,
                    options.lossless,
                )
                .await;

            if outcome.success {
                debug!(input = %path.display(), output = %output_path.display(), "converted");
            } else {
                warn!(input = %path.display(), error = %outcome.message, "conversion failed");
            }
            result.record(path, &outcome);

            if let Some(callback) = progress.as_deref_mut() {
                let filename = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                callback(index + 1, total, &filename);
            }
        }

        result.finish();
        info!(
            total = result.total,
            successes = result.successes,
            failures = result.failures,
            "batch finished"
        );
        result
    }
}
