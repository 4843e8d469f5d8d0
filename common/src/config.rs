//! 設定管理
//!
//! ServerConfig, GeneratorConfig, ManifestConfig等の設定構造体

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// サーバー設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// ホストアドレス (デフォルト: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 8000)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// バインドアドレス（"host:port"）
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// クライアントから見たベースURL
    pub fn base_url(&self) -> String {
        let host = match self.host.as_str() {
            "0.0.0.0" | "::" | "[::]" => "127.0.0.1",
            other => other,
        };
        format!("http://{}:{}", host, self.port)
    }
}

/// 説明文生成（テキスト生成サービス）の設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    /// APIベースURL (デフォルト: "https://api.openai.com")
    #[serde(default = "default_generator_base_url")]
    pub base_url: String,

    /// 使用するモデル (デフォルト: "gpt-4o-mini")
    #[serde(default = "default_generator_model")]
    pub model: String,

    /// アクセスキーを読む環境変数名 (デフォルト: "OPENAI_API_KEY")
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// サンプリング温度 (デフォルト: 0.0)
    #[serde(default)]
    pub temperature: f32,

    /// 最大出力トークン数 (デフォルト: 100)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_generator_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_generator_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    100
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_generator_base_url(),
            model: default_generator_model(),
            api_key_env: default_api_key_env(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
        }
    }
}

/// マニフェスト生成設定
///
/// `generate` 呼び出しごとに新しく組み立てる。`extra` のキーは既定のフィールドより優先される。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestConfig {
    /// 人間向けの名前
    #[serde(default = "default_plugin_name")]
    pub name_for_human: String,

    /// モデル向けの名前
    #[serde(default = "default_plugin_name")]
    pub name_for_model: String,

    /// 人間向けの説明
    #[serde(default = "default_plugin_description")]
    pub description_for_human: String,

    /// モデル向けの説明
    #[serde(default = "default_plugin_description")]
    pub description_for_model: String,

    /// プラグインのバージョン
    #[serde(default = "default_plugin_version")]
    pub version: String,

    /// マニフェストが参照するAPI記述ドキュメントのURL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// 出力ディレクトリ (デフォルト: ".well-known")
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// 既存のAPI記述ドキュメントを上書きするか
    #[serde(default = "default_true")]
    pub overwrite_openapi_spec: bool,

    /// 既存のプラグインマニフェストを上書きするか
    #[serde(default = "default_true")]
    pub overwrite_plugin_spec: bool,

    /// 追加のマニフェストフィールド（そのままマージされる）
    #[serde(default)]
    pub extra: Map<String, Value>,
}

fn default_plugin_name() -> String {
    "Custom Plugin".to_string()
}

fn default_plugin_description() -> String {
    "Unspecified custom plugin. Add behavior here.".to_string()
}

fn default_plugin_version() -> String {
    "1.0.0".to_string()
}

fn default_api_url() -> String {
    "http://localhost:8000/openapi.yaml".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".well-known")
}

fn default_true() -> bool {
    true
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            name_for_human: default_plugin_name(),
            name_for_model: default_plugin_name(),
            description_for_human: default_plugin_description(),
            description_for_model: default_plugin_description(),
            version: default_plugin_version(),
            api_url: default_api_url(),
            out_dir: default_out_dir(),
            overwrite_openapi_spec: true,
            overwrite_plugin_spec: true,
            extra: Map::new(),
        }
    }
}

impl ManifestConfig {
    /// 既定値で作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 人間向け・モデル向けの名前を同時に設定
    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name_for_model = name.clone();
        self.name_for_human = name;
        self
    }

    /// 人間向け・モデル向けの説明を同時に設定
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description_for_model = description.clone();
        self.description_for_human = description;
        self
    }

    /// プラグインのバージョンを設定
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// 出力ディレクトリを設定
    pub fn out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// API記述ドキュメントのURLを設定
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// 既存ドキュメントの上書き可否を設定
    pub fn overwrite(mut self, openapi_spec: bool, plugin_spec: bool) -> Self {
        self.overwrite_openapi_spec = openapi_spec;
        self.overwrite_plugin_spec = plugin_spec;
        self
    }

    /// 追加のマニフェストフィールドを設定
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}
