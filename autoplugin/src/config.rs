//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to alternative variable names, and builds the server and generator
//! configuration from them.

use autoplugin_common::config::{GeneratorConfig, ServerConfig};

/// Get an environment variable with fallback to an alternative name
///
/// If the preferred variable is set, returns its value.
/// If only the fallback variable is set, returns its value and logs
/// which name was used.
///
/// # Example
/// ```
/// use autoplugin::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("AUTOPLUGIN_PORT", "PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::debug!(
            "Environment variable '{}' is not set, using '{}' instead",
            new_name,
            old_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// サーバー設定を環境変数から作成
///
/// `AUTOPLUGIN_HOST`（代替: `HOST`）と `AUTOPLUGIN_PORT`（代替: `PORT`）
pub fn server_config_from_env() -> ServerConfig {
    let defaults = ServerConfig::default();
    ServerConfig {
        host: get_env_with_fallback_or("AUTOPLUGIN_HOST", "HOST", &defaults.host),
        port: get_env_with_fallback_parse("AUTOPLUGIN_PORT", "PORT", defaults.port),
    }
}

/// 説明文生成の設定を環境変数から作成
///
/// `AUTOPLUGIN_OPENAI_BASE_URL`（代替: `OPENAI_BASE_URL`）と
/// `AUTOPLUGIN_OPENAI_MODEL`（代替: `OPENAI_MODEL`）。アクセスキーは生成時に読む。
pub fn generator_config_from_env() -> GeneratorConfig {
    let defaults = GeneratorConfig::default();
    GeneratorConfig {
        base_url: get_env_with_fallback_or(
            "AUTOPLUGIN_OPENAI_BASE_URL",
            "OPENAI_BASE_URL",
            &defaults.base_url,
        ),
        model: get_env_with_fallback_or("AUTOPLUGIN_OPENAI_MODEL", "OPENAI_MODEL", &defaults.model),
        ..defaults
    }
}
