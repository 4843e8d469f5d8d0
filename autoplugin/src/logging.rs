//! ログ初期化
//!
//! `AUTOPLUGIN_LOG_LEVEL`（代替: `RUST_LOG`、既定: `info`）でフィルタし、
//! `AUTOPLUGIN_LOG_DIR` が設定されていれば日次ローテーションのファイルにも出力する。

use crate::config::get_env_with_fallback;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "autoplugin.log";

fn env_filter() -> EnvFilter {
    let directives = get_env_with_fallback("AUTOPLUGIN_LOG_LEVEL", "RUST_LOG")
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// グローバルなsubscriberを設定する
///
/// ファイル出力を有効にした場合、返されたガードを保持している間だけ書き込まれる
pub fn init() -> Result<Option<WorkerGuard>, TryInitError> {
    let (file_layer, guard) = match std::env::var("AUTOPLUGIN_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().compact())
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
