use crate::cli::progress::ConversionProgress;
use crate::config::Config;
use crate::converter::standard::StandardConverter;
use crate::core::{BatchResult, OutputFormat};
use crate::processing::BatchProcessor;
use crate::validator::Validator;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// ドライランとエラーサマリーで表示する最大件数
pub const DISPLAY_LIMIT: usize = 10;

/// convertコマンドの入力
pub struct ConvertConfig {
    pub input_dir: PathBuf,
    pub config: Config,
    pub dry_run: bool,
    pub report: Option<PathBuf>,
    pub show_progress: bool,
}

/// convertコマンドの実行結果
#[derive(Debug)]
pub enum ConvertOutcome {
    /// ドライラン（発見したファイルのみ）
    DryRun(Vec<PathBuf>),
    Completed(BatchResult),
}

/// Execute convert command
pub async fn execute_convert(request: ConvertConfig) -> Result<ConvertOutcome> {
    if !request.input_dir.exists() {
        anyhow::bail!(
            "Input directory does not exist: {}",
            request.input_dir.display()
        );
    }
    if !request.input_dir.is_dir() {
        anyhow::bail!(
            "Input path is not a directory: {}",
            request.input_dir.display()
        );
    }

    let config = &request.config;
    let format: OutputFormat = config.format.parse()?;
    let options = config.to_options();
    options.validate()?;

    let converter = StandardConverter::new().with_metadata(config.preserve_metadata);
    if !converter.registry().is_available(format) {
        let available: Vec<&str> = converter
            .registry()
            .available_formats()
            .iter()
            .map(|f| f.as_str())
            .collect();
        anyhow::bail!(
            "Format unavailable: {format} (available: {})",
            available.join(", ")
        );
    }
    let processor = BatchProcessor::new(converter)
        .with_validator(Validator::new(config.validation_mode))
        .with_workers(Some(config.workers));

    let files = processor.discover(&request.input_dir, config.recursive)?;

    if request.dry_run {
        println!("🔍 ドライラン: {}件の画像が見つかりました", files.len());
        for line in dry_run_listing(&files, DISPLAY_LIMIT) {
            println!("   {line}");
        }
        return Ok(ConvertOutcome::DryRun(files));
    }

    println!("🖼️  画像変換開始");
    println!("   - 入力ディレクトリ: {}", request.input_dir.display());
    println!("   - 出力ディレクトリ: {}", options.output_dir.display());
    println!(
        "   - フォーマット: {} (品質: {}, ロスレス: {})",
        format, options.quality, options.lossless
    );
    println!("   - 対象ファイル: {}", files.len());

    std::fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            options.output_dir.display()
        )
    })?;

    let progress = if request.show_progress {
        ConversionProgress::new(files.len())
    } else {
        ConversionProgress::hidden(files.len())
    };
    let mut on_progress = |done: usize, total: usize, filename: &str| {
        progress.update(done, total, filename);
    };
    let result = processor
        .process_batch(&files, &options, Some(&mut on_progress))
        .await;
    progress.finish();

    print_summary(&result);

    if let Some(report_path) = &request.report {
        write_report(report_path, &result)?;
        println!("📄 レポートを {} に保存しました", report_path.display());
    }

    Ok(ConvertOutcome::Completed(result))
}

/// 先頭`limit`件のファイル名と残り件数
pub fn dry_run_listing(files: &[PathBuf], limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = files
        .iter()
        .take(limit)
        .map(|path| display_name(path))
        .collect();
    if files.len() > limit {
        lines.push(format!("... and {} more", files.len() - limit));
    }
    lines
}

/// 先頭`limit`件のエラーと残り件数
pub fn summarize_errors(result: &BatchResult, limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = result
        .errors
        .iter()
        .take(limit)
        .map(|record| format!("{}: {}", display_name(&record.file), record.error))
        .collect();
    if result.errors.len() > limit {
        lines.push(format!("... and {} more errors", result.errors.len() - limit));
    }
    lines
}

/// 集計結果をJSONで書き出す
pub fn write_report(path: &Path, result: &BatchResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

fn print_summary(result: &BatchResult) {
    if result.failures == 0 {
        println!("✅ 変換完了!");
    } else {
        println!("⚠️  変換完了（一部失敗）");
    }
    println!("   - 総ファイル数: {}", result.total);
    println!("   - 成功: {}", result.successes);
    println!("   - 失敗: {}", result.failures);
    if let Some(finished_at) = result.finished_at {
        let elapsed = finished_at - result.started_at;
        println!("   - 処理時間: {}ms", elapsed.num_milliseconds());
    }

    if !result.errors.is_empty() {
        println!("❌ エラー:");
        for line in summarize_errors(result, DISPLAY_LIMIT) {
            println!("   - {line}");
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
