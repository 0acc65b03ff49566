// ログ初期化
// tracing-subscriberでstderrに出力する（stdoutはサマリー表示用）

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG`が未設定のときのフィルタ
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "image_converter=debug"
    } else {
        "warn"
    }
}

/// グローバルサブスクライバを設定
///
/// 既に設定済みの場合は何もしない。
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_line_number(false);

    let initialized = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if initialized {
        tracing::debug!(verbose, "logging initialized");
    }
}
