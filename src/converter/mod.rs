use crate::core::ConversionResult;
use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

pub mod codecs;
pub mod metadata;
pub mod standard;
pub mod transform;

/// 画像変換バックエンドのトレイト
///
/// 失敗は`ConversionResult`として返し、エラーを呼び出し側に伝播させない。
#[automock]
#[async_trait]
pub trait ConverterBackend: Send + Sync {
    /// 1ファイルを指定フォーマットに変換して`output_path`に書き出す
    async fn convert(
        &self,
        input_path: &Path,
        output_path: &Path,
        format: &str,
        quality: u8,
        lossless: bool,
    ) -> ConversionResult;

    /// 変換戦略の名前を取得
    fn strategy_name(&self) -> &'static str;
}
