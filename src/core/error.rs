// 変換処理のカスタムエラー型定義

use thiserror::Error;

/// バッチ処理固有のエラー型
///
/// ファイル単位の変換失敗はここに含まれない（`ConversionResult`として記録される）。
/// バッチ全体を開始できない場合のみ使用する。
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("ファイル発見エラー: {path} - {source}")]
    FileDiscoveryError {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },
}

impl ProcessingError {
    /// ファイル発見エラーの作成
    pub fn file_discovery(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::FileDiscoveryError {
            path: path.into(),
            source,
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }
}

/// バッチ処理の結果型
pub type ProcessingResult<T> = std::result::Result<T, ProcessingError>;

/// 検証結果 - バリデーション専用の結果型
pub type ValidationResult<T> = std::result::Result<T, RejectionReason>;

/// 未知の出力フォーマット名
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported format: {0}")]
pub struct UnsupportedFormat(pub String);

/// 画像ファイルが変換対象として受け入れられなかった理由
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("File does not exist")]
    NotFound,

    #[error("Path is not a file")]
    NotAFile,

    #[error("Unsupported extension: {0}")]
    UnsupportedExtension(String),

    #[error("File is not a PNG (bad signature)")]
    BadSignature,

    #[error("Content is {detected} but extension is .{extension}")]
    ExtensionMismatch { extension: String, detected: String },

    #[error("No decoder available for .{0}")]
    NoDecoder(String),

    #[error("Corrupt image: {0}")]
    Corrupt(String),
}
