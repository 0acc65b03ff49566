// 画像一括変換ライブラリ
// ディレクトリ内の画像を検証し、指定フォーマットに順次変換する

pub mod cli;
pub mod config;
pub mod converter;
pub mod core;
pub mod file_scanner;
pub mod logging;
pub mod naming;
pub mod processing;
pub mod validator;

pub use config::Config;
pub use converter::{standard::StandardConverter, ConverterBackend};
pub use core::{
    BatchResult, ConversionOptions, ConversionResult, ErrorRecord, FailureKind, OutputFormat,
    ProcessingError, ProcessingResult, RejectionReason,
};
pub use naming::generate_output_path;
pub use processing::BatchProcessor;
pub use validator::{ValidationMode, Validator};
