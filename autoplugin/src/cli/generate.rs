//! generate サブコマンド
//!
//! API記述ドキュメントとプラグインマニフェストを書き出します。

use autoplugin_common::config::ManifestConfig;
use clap::Args;
use std::path::PathBuf;

/// generate サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Plugin name (used for both name_for_human and name_for_model)
    #[arg(long, default_value = "example")]
    pub name: String,

    /// Plugin description (used for both human and model descriptions)
    #[arg(long, default_value = "Adds numbers and greets users.")]
    pub description: String,

    /// Plugin version
    #[arg(long, default_value = "1.0.0")]
    pub version: String,

    /// URL of the API description document referenced by the manifest
    #[arg(long, default_value = "http://localhost:8000/openapi.yaml")]
    pub api_url: String,

    /// Output directory
    #[arg(long, default_value = ".well-known")]
    pub out_dir: PathBuf,

    /// Keep an existing openapi.yaml
    #[arg(long, default_value_t = false)]
    pub keep_openapi: bool,

    /// Keep an existing ai-plugin.json
    #[arg(long, default_value_t = false)]
    pub keep_plugin: bool,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            name: "example".to_string(),
            description: "Adds numbers and greets users.".to_string(),
            version: "1.0.0".to_string(),
            api_url: "http://localhost:8000/openapi.yaml".to_string(),
            out_dir: PathBuf::from(".well-known"),
            keep_openapi: false,
            keep_plugin: false,
        }
    }
}

impl GenerateArgs {
    /// マニフェスト設定に変換
    pub fn manifest_config(&self) -> ManifestConfig {
        ManifestConfig::new()
            .name(self.name.clone())
            .description(self.description.clone())
            .version(self.version.clone())
            .api_url(self.api_url.clone())
            .out_dir(self.out_dir.clone())
            .overwrite(!self.keep_openapi, !self.keep_plugin)
    }
}
