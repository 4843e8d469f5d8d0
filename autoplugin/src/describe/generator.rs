//! 説明文生成器
//!
//! テキスト生成サービスにソーステキストを送り、一文の説明を得る。
//! 生成が利用可能かどうかは `availability()` で事前に問い合わせる。

use async_trait::async_trait;
use autoplugin_common::error::PluginResult;
#[cfg(feature = "gen")]
use autoplugin_common::{config::GeneratorConfig, error::PluginError};
#[cfg(feature = "gen")]
use serde_json::{json, Value};
use std::sync::Arc;
#[cfg(feature = "gen")]
use std::time::Instant;
#[cfg(feature = "gen")]
use tracing::{info, warn};
#[cfg(feature = "gen")]
use uuid::Uuid;

/// 生成機能の利用可否
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// 利用可能
    Available,
    /// 利用不可（不足しているもの）
    Unavailable {
        /// 不足している依存・認証情報
        missing: String,
    },
}

impl Availability {
    /// 利用可能か
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// 説明文生成器
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// 生成器名（ログ用）
    fn name(&self) -> &str;

    /// ネットワークに触れずに利用可否を判定する
    fn availability(&self) -> Availability;

    /// 関数名とソーステキストから説明文を生成する
    ///
    /// 返すのはサービスの生の応答テキスト。最初の行の切り出しは呼び出し側で行う。
    async fn generate(&self, function_name: &str, source_text: &str) -> PluginResult<String>;
}

const PROMPT_HEADER: &str = "Come up with a concise description for this function for the OpenAPI spec \
that would serve as a useful description for a ChatGPT plugin to know when to call it.
It should be at most one or two sentences, and must be less than 50 words.";

const PROMPT_EXAMPLES: &[(&str, &str)] = &[
    (
        "async fn add(a: i64, b: i64) -> i64 {\n    a + b\n}",
        "Adds two numbers",
    ),
    (
        "async fn hello(name: String) -> String {\n    format!(\"Hello, {}!\", name)\n}",
        "Greets person with specified name.",
    ),
    (
        "async fn pow(base: i64, power: u32 = 2) -> i64 {\n    base.pow(power)\n}",
        "Raises a number to a power.",
    ),
];

/// 説明文生成用のプロンプトを組み立てる
///
/// ドキュメントコメントは含めない
pub fn build_prompt(function_name: &str, source_text: &str) -> String {
    let mut prompt = String::from(PROMPT_HEADER);
    for (source, description) in PROMPT_EXAMPLES {
        prompt.push_str("\nFunction:\n```rust\n");
        prompt.push_str(source);
        prompt.push_str("\n```\nDescription:\n");
        prompt.push_str(description);
    }
    prompt.push_str(&format!(
        "\nFunction (`{}`):\n```rust\n{}\n```\nDescription:\n",
        function_name,
        source_text.trim()
    ));
    prompt
}

/// OpenAI chat completions API を使う生成器
#[cfg(feature = "gen")]
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    config: GeneratorConfig,
    http_client: reqwest::Client,
}

#[cfg(feature = "gen")]
impl OpenAiGenerator {
    /// 設定から作成
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// 環境変数の設定から作成
    pub fn from_env() -> Self {
        Self::new(crate::config::generator_config_from_env())
    }

    /// 設定
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/v1/chat/completions")
    }

    fn failure(&self, function_name: &str, reason: impl Into<String>) -> PluginError {
        PluginError::Generation {
            function: function_name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(feature = "gen")]
#[async_trait]
impl DescriptionGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    fn availability(&self) -> Availability {
        match self.api_key() {
            Some(_) => Availability::Available,
            None => Availability::Unavailable {
                missing: format!("environment variable {}", self.config.api_key_env),
            },
        }
    }

    async fn generate(&self, function_name: &str, source_text: &str) -> PluginResult<String> {
        let api_key = match self.api_key() {
            Some(key) => key,
            None => {
                return Err(PluginError::GenerationUnavailable {
                    function: function_name.to_string(),
                    missing: format!("environment variable {}", self.config.api_key_env),
                })
            }
        };

        let req_id = Uuid::new_v4();
        let started = Instant::now();
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "user", "content": build_prompt(function_name, source_text)}
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let res = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.failure(function_name, e.to_string()))?;

        let status = res.status();
        info!(
            generator = "openai",
            model = %self.config.model,
            function = function_name,
            request_id = %req_id,
            latency_ms = started.elapsed().as_millis(),
            status = %status,
            "description generation request"
        );

        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            warn!(function = function_name, status = %status, "description generation failed");
            return Err(self.failure(function_name, format!("HTTP {}: {}", status, text.trim())));
        }

        let data: Value = res
            .json()
            .await
            .map_err(|e| self.failure(function_name, format!("invalid response: {}", e)))?;

        data.get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(str::to_string)
            .ok_or_else(|| self.failure(function_name, "response has no message content"))
    }
}

/// 生成機能を持たないビルド用の生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGenerator;

#[async_trait]
impl DescriptionGenerator for NoGenerator {
    fn name(&self) -> &str {
        "none"
    }

    fn availability(&self) -> Availability {
        Availability::Unavailable {
            missing: "the `gen` cargo feature".to_string(),
        }
    }

    async fn generate(&self, function_name: &str, _source_text: &str) -> PluginResult<String> {
        Err(autoplugin_common::error::PluginError::GenerationUnavailable {
            function: function_name.to_string(),
            missing: "the `gen` cargo feature".to_string(),
        })
    }
}

/// ビルド構成に応じた既定の生成器
pub fn default_generator() -> Arc<dyn DescriptionGenerator> {
    #[cfg(feature = "gen")]
    {
        Arc::new(OpenAiGenerator::from_env())
    }
    #[cfg(not(feature = "gen"))]
    {
        Arc::new(NoGenerator)
    }
}
