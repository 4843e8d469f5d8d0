//! serve サブコマンド
//!
//! プラグインサーバーを起動します。

use clap::Args;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value = "8000", env = "AUTOPLUGIN_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "AUTOPLUGIN_HOST")]
    pub host: String,

    /// Directory served under /.well-known
    #[arg(long, default_value = ".well-known")]
    pub well_known_dir: std::path::PathBuf,
}

impl Default for ServeArgs {
    fn default() -> Self {
        let config = crate::config::server_config_from_env();
        Self {
            port: config.port,
            host: config.host,
            well_known_dir: std::path::PathBuf::from(".well-known"),
        }
    }
}
