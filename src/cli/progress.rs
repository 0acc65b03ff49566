// 進捗表示
// BatchProcessorの進捗コールバックをindicatifのバーに反映する

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner} [{bar:40}] {pos}/{len} {wide_msg}";

pub struct ConversionProgress {
    bar: ProgressBar,
}

impl ConversionProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("##-"));
        }
        Self { bar }
    }

    /// 表示なし（テストやパイプ出力用）
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);
        Self { bar }
    }

    /// `(完了数, 総数, ファイル名)`を受け取って表示を更新
    pub fn update(&self, done: usize, total: usize, filename: &str) {
        self.bar.set_length(total as u64);
        self.bar.set_position(done as u64);
        self.bar.set_message(filename.to_string());
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}
