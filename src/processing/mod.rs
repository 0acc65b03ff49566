// バッチ処理モジュール
// 発見・変換・集計のオーケストレーション

pub mod batch;

// 公開API
pub use batch::{BatchProcessor, ProgressCallback};
