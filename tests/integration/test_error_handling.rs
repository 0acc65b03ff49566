// エラーハンドリングの統合テスト
use image_converter::{
    converter::codecs::CodecRegistry, BatchProcessor, ConversionOptions, ConverterBackend,
    FailureKind, OutputFormat, ProcessingError, RejectionReason, StandardConverter, Validator,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[path = "../fixtures/mod.rs"]
mod fixtures;

use fixtures::*;

#[tokio::test]
async fn test_failures_do_not_stop_batch() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    // 発見を経由せず、壊れたファイルを直接バッチに渡す
    let files = vec![
        write_png(&input.path().join("first.png"), 4, 4),
        write_corrupt(&input.path().join("broken.png")),
        input.path().join("vanished.png"),
        write_png(&input.path().join("last.png"), 4, 4),
    ];

    let processor = BatchProcessor::new(StandardConverter::new());
    let options = ConversionOptions::new("webp", output.path());
    let result = processor.process_batch(&files, &options, None).await;

    assert_eq!(result.total, 4);
    assert_eq!(result.successes, 2);
    assert_eq!(result.failures, 2);
    assert!(result.is_consistent());

    // 失敗は入力順に記録される
    assert_eq!(result.errors[0].file, files[1]);
    assert_eq!(result.errors[0].kind, FailureKind::Decode);
    assert_eq!(result.errors[1].file, files[2]);
    assert_eq!(result.errors[1].kind, FailureKind::Io);
    assert!(result.errors.iter().all(|e| !e.error.is_empty()));
    assert_eq!(result.errors_of_kind(FailureKind::Decode).len(), 1);

    assert!(output.path().join("first.webp").exists());
    assert!(output.path().join("last.webp").exists());
    assert!(!output.path().join("broken.webp").exists());
}

#[tokio::test]
async fn test_unknown_format_fails_every_item() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let files = vec![
        write_png(&input.path().join("a.png"), 4, 4),
        write_png(&input.path().join("b.png"), 4, 4),
    ];

    let processor = BatchProcessor::new(StandardConverter::new());
    let options = ConversionOptions::new("tiff-legacy", output.path());
    let result = processor.process_batch(&files, &options, None).await;

    assert_eq!(result.failures, 2);
    assert!(result
        .errors
        .iter()
        .all(|e| e.kind == FailureKind::UnsupportedFormat && e.error.contains("tiff-legacy")));
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unavailable_encoder_reported_per_item() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let file = write_png(&input.path().join("a.png"), 4, 4);

    let converter = StandardConverter::with_registry(CodecRegistry::with_available(&[OutputFormat::Png]));
    let result = converter
        .convert(&file, &output.path().join("a.avif"), "avif", 85, false)
        .await;

    assert!(!result.success);
    assert_eq!(result.failure, Some(FailureKind::FormatUnavailable));
}

#[test]
fn test_validator_reasons() {
    let dir = TempDir::new().unwrap();
    let validator = Validator::default();

    let missing = dir.path().join("missing.png");
    assert_eq!(validator.validate(&missing), Err(RejectionReason::NotFound));

    let (ok, reason) = validator.is_valid(dir.path());
    assert!(!ok);
    assert_eq!(reason, "Path is not a file");

    let text = dir.path().join("notes.txt");
    fs::write(&text, "hello").unwrap();
    assert!(matches!(
        validator.validate(&text),
        Err(RejectionReason::UnsupportedExtension(_))
    ));

    let corrupt = write_corrupt(&dir.path().join("broken.jpg"));
    let (ok, reason) = validator.is_valid(&corrupt);
    assert!(!ok);
    assert!(!reason.is_empty());

    let good = write_png(&dir.path().join("good.png"), 2, 2);
    assert_eq!(validator.is_valid(&good), (true, String::new()));
}

#[test]
fn test_discover_missing_directory_errors() {
    let processor = BatchProcessor::new(StandardConverter::new());
    let result = processor.discover(&PathBuf::from("/definitely/not/here"), true);

    assert!(matches!(result, Err(ProcessingError::FileDiscoveryError { .. })));
}

#[test]
fn test_discover_file_instead_of_directory_errors() {
    let dir = TempDir::new().unwrap();
    let file = write_png(&dir.path().join("single.png"), 2, 2);
    let processor = BatchProcessor::new(StandardConverter::new());

    assert!(processor.discover(&file, true).is_err());
}
