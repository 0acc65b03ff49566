// コアレイヤー - 基盤となる型とエラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod types;

// 公開API - 明示的にエクスポートして曖昧性を回避
pub use error::{
    ProcessingError, ProcessingResult, RejectionReason, UnsupportedFormat, ValidationResult,
};
pub use types::{
    BatchResult, ConversionOptions, ConversionResult, ErrorRecord, FailureKind, OutputFormat,
};
