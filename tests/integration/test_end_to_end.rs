// エンドツーエンド統合テスト
use image_converter::{
    cli::commands::convert::{execute_convert, ConvertConfig, ConvertOutcome},
    BatchProcessor, Config, ConversionOptions, StandardConverter, ValidationMode, Validator,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[path = "../fixtures/mod.rs"]
mod fixtures;

use fixtures::*;

#[tokio::test]
async fn test_full_directory_conversion_workflow() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    setup_image_tree(input.path());

    let processor = BatchProcessor::new(StandardConverter::new());
    let files = processor.discover(input.path(), true).unwrap();

    // 隠しディレクトリ・壊れたファイル・テキストは除外される
    assert_eq!(files.len(), 3);
    assert!(files.iter().all(|f| !f.to_string_lossy().contains(".cache")));

    let options = ConversionOptions::new("webp", output.path());
    let mut progress_calls = 0;
    let mut on_progress = |_: usize, _: usize, _: &str| progress_calls += 1;
    let result = processor
        .process_batch(&files, &options, Some(&mut on_progress))
        .await;

    assert_eq!(result.total, 3);
    assert_eq!(result.successes, 3);
    assert!(result.errors.is_empty());
    assert_eq!(progress_calls, 3);

    // 出力はフラットに配置される
    let mut names: Vec<String> = fs::read_dir(output.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["deep.webp", "photo1.webp", "photo2.webp"]);

    for name in &names {
        let bytes = fs::read(output.path().join(name)).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::WebP);
    }
}

#[tokio::test]
async fn test_same_stem_inputs_do_not_overwrite() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let a = write_png(&input.path().join("a").join("cover.png"), 4, 4);
    let b = write_png(&input.path().join("b").join("cover.png"), 6, 6);

    let processor = BatchProcessor::new(StandardConverter::new());
    let options = ConversionOptions::new("png", output.path());
    let result = processor.process_batch(&[a, b], &options, None).await;

    assert_eq!(result.successes, 2);
    let first = image::open(output.path().join("cover.png")).unwrap();
    let second = image::open(output.path().join("cover_1.png")).unwrap();
    assert_eq!(first.width(), 4);
    assert_eq!(second.width(), 6);
}

#[tokio::test]
async fn test_non_recursive_discovery() {
    let input = TempDir::new().unwrap();
    setup_image_tree(input.path());

    let processor = BatchProcessor::new(StandardConverter::new());
    let files = processor.discover(input.path(), false).unwrap();

    assert_eq!(files.len(), 2);
    assert!(!files.contains(&input.path().join("nested").join("deep.png")));
}

#[tokio::test]
async fn test_strict_png_mode_skips_jpeg() {
    let input = TempDir::new().unwrap();
    setup_image_tree(input.path());

    let processor = BatchProcessor::new(StandardConverter::new())
        .with_validator(Validator::new(ValidationMode::StrictPng));
    let files = processor.discover(input.path(), true).unwrap();

    let mut names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["deep.png", "photo1.png"]);
}

#[tokio::test]
async fn test_rgba_to_jpeg_through_batch() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let file = write_rgba_png(&input.path().join("overlay.png"));

    let processor = BatchProcessor::new(StandardConverter::new());
    let options = ConversionOptions::new("jpeg", output.path()).with_quality(95);
    let result = processor.process_batch(&[file], &options, None).await;

    assert_eq!(result.successes, 1, "{:?}", result.errors);
    let converted = image::open(output.path().join("overlay.jpg")).unwrap();
    assert!(!converted.color().has_alpha());
    let pixel = converted.to_rgb8().get_pixel(4, 8).0;
    assert!(pixel.iter().all(|&c| c > 240), "{pixel:?}");
}

#[tokio::test]
async fn test_convert_command_with_report() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    setup_image_tree(input.path());
    let report = output.path().join("report.json");

    let request = ConvertConfig {
        input_dir: input.path().to_path_buf(),
        config: Config::new()
            .with_format("png")
            .with_output_dir(output.path().join("converted")),
        dry_run: false,
        report: Some(report.clone()),
        show_progress: false,
    };

    let result = match execute_convert(request).await.unwrap() {
        ConvertOutcome::Completed(result) => result,
        ConvertOutcome::DryRun(_) => panic!("dry run not requested"),
    };
    assert_eq!(result.total, 3);
    assert_eq!(result.successes, 3);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["successes"], 3);
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_convert_command_dry_run() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    setup_image_tree(input.path());
    let out_dir: PathBuf = output.path().join("converted");

    let request = ConvertConfig {
        input_dir: input.path().to_path_buf(),
        config: Config::new().with_output_dir(out_dir.clone()),
        dry_run: true,
        report: None,
        show_progress: false,
    };

    match execute_convert(request).await.unwrap() {
        ConvertOutcome::DryRun(files) => assert_eq!(files.len(), 3),
        ConvertOutcome::Completed(_) => panic!("expected dry run"),
    }
    assert!(!out_dir.exists());
}
