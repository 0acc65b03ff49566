use crate::core::{RejectionReason, ValidationResult};
use image::{ImageFormat, ImageReader};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// PNGファイルの先頭8バイト
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// 対応する入力拡張子（宣言順が発見時の並び順になる）
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "avif", "jxl", "bmp", "tiff", "tif", "gif",
];

const PNG_ONLY_EXTENSIONS: &[&str] = &["png"];

/// 検証ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// PNGのみ。シグネチャ8バイトで判定
    StrictPng,
    /// 全対応拡張子。画像ライブラリでデコードして整合性を確認
    #[default]
    General,
}

impl ValidationMode {
    pub fn supported_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::StrictPng => PNG_ONLY_EXTENSIONS,
            Self::General => SUPPORTED_EXTENSIONS,
        }
    }
}

/// 画像ファイルの検証器
///
/// 副作用なし。判定は呼び出し時点のファイルシステムの状態に基づく。
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    mode: ValidationMode,
}

impl Validator {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// `(有効かどうか, 理由)`の形で結果を返す。有効なら理由は空文字列
    pub fn is_valid(&self, path: &Path) -> (bool, String) {
        match self.validate(path) {
            Ok(()) => (true, String::new()),
            Err(reason) => (false, reason.to_string()),
        }
    }

    pub fn validate(&self, path: &Path) -> ValidationResult<()> {
        if !path.exists() {
            return Err(RejectionReason::NotFound);
        }

        if !path.is_file() {
            return Err(RejectionReason::NotAFile);
        }

        let extension = lowercase_extension(path);
        if !self.mode.supported_extensions().contains(&extension.as_str()) {
            return Err(RejectionReason::UnsupportedExtension(extension));
        }

        match self.mode {
            ValidationMode::StrictPng => check_png_signature(path),
            ValidationMode::General => verify_with_decoder(path, &extension),
        }
        .inspect_err(|reason| debug!(path = %path.display(), %reason, "rejected"))
    }
}

/// 拡張子を小文字で取得（なければ空文字列）
pub(crate) fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn check_png_signature(path: &Path) -> ValidationResult<()> {
    let mut header = [0u8; 8];
    let read = File::open(path).and_then(|mut file| file.read_exact(&mut header));

    match read {
        Ok(()) if header == PNG_SIGNATURE => Ok(()),
        _ => Err(RejectionReason::BadSignature),
    }
}

fn verify_with_decoder(path: &Path, extension: &str) -> ValidationResult<()> {
    let expected = ImageFormat::from_extension(extension)
        .filter(|format| format.reading_enabled())
        .ok_or_else(|| RejectionReason::NoDecoder(extension.to_string()))?;

    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| RejectionReason::Corrupt(e.to_string()))?;

    match reader.format() {
        Some(detected) if detected == expected => {}
        Some(detected) => {
            return Err(RejectionReason::ExtensionMismatch {
                extension: extension.to_string(),
                detected: format!("{detected:?}"),
            });
        }
        None => {
            return Err(RejectionReason::Corrupt(
                "unrecognized image content".to_string(),
            ));
        }
    }

    // 全体をデコードして切り詰めや破損を検出する
    reader
        .decode()
        .map(|_| ())
        .map_err(|e| RejectionReason::Corrupt(e.to_string()))
}
