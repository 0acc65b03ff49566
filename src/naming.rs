use crate::core::OutputFormat;
use std::path::{Path, PathBuf};

/// 未知のフォーマット時に使う拡張子
const FALLBACK_EXTENSION: &str = "webp";

/// フォーマット名から出力拡張子を決定
pub fn extension_for(format: &str) -> &'static str {
    format
        .parse::<OutputFormat>()
        .map(|format| format.extension())
        .unwrap_or(FALLBACK_EXTENSION)
}

/// 変換後ファイルの出力パスを生成
///
/// ファイル名は入力ファイルのステム＋フォーマットの拡張子。既に存在する場合は
/// `_1`, `_2`, ... の連番を付与する。存在確認と書き込みは原子的ではない。
pub fn generate_output_path(input_path: &Path, output_dir: &Path, format: &str) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = extension_for(format);

    let candidate = output_dir.join(format!("{stem}.{extension}"));
    if !candidate.exists() {
        return candidate;
    }

    (1u64..)
        .map(|n| output_dir.join(format!("{stem}_{n}.{extension}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
