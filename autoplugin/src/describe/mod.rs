//! エンドポイント説明文の解決
//!
//! 明示的な説明 → ドキュメントコメント → テキスト生成サービスによる合成、の順に
//! 説明文を決定する。どの規則を使うかは `ShouldGenerate` で切り替わる。

pub mod generator;

pub use generator::{build_prompt, default_generator, Availability, DescriptionGenerator, NoGenerator};
#[cfg(feature = "gen")]
pub use generator::OpenAiGenerator;

use autoplugin_common::error::{PluginError, PluginResult};
use autoplugin_common::types::ShouldGenerate;
use serde::Serialize;
use tracing::debug;

/// 説明文の解決に必要な関数の情報
#[derive(Debug, Clone)]
pub struct DescriptionRequest<'a> {
    /// 関数名
    pub function_name: &'a str,
    /// 呼び出し側が指定した説明
    pub explicit_description: Option<&'a str>,
    /// 生成フラグ
    pub should_generate: ShouldGenerate,
    /// ドキュメントコメント
    pub doc_comment: Option<&'a str>,
    /// ソーステキスト
    pub source_text: &'a str,
}

/// 採用された説明文の出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionSource {
    /// 呼び出し側の指定
    Explicit,
    /// ドキュメントコメント
    DocComment,
    /// テキスト生成サービス
    Generated,
}

/// 解決済みの説明文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDescription {
    /// 説明文（空でない）
    pub text: String,
    /// 出どころ
    pub source: DescriptionSource,
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

/// 説明文を解決する
///
/// 1. 明示的な説明があればそのまま使う
/// 2. `Enabled` なら合成する（ドキュメントコメントは無視）
/// 3. `Unset` か `Disabled` でドキュメントコメントがあればトリムして使う
/// 4. `Disabled` なら `MissingDescription`、それ以外は合成する
pub async fn resolve(
    request: &DescriptionRequest<'_>,
    generator: &dyn DescriptionGenerator,
) -> PluginResult<ResolvedDescription> {
    if let Some(explicit) = non_blank(request.explicit_description) {
        return Ok(ResolvedDescription {
            text: explicit.to_string(),
            source: DescriptionSource::Explicit,
        });
    }

    match (request.should_generate, non_blank(request.doc_comment)) {
        (ShouldGenerate::Enabled, _) => synthesize(request, generator).await,
        (ShouldGenerate::Unset | ShouldGenerate::Disabled, Some(doc)) => Ok(ResolvedDescription {
            text: doc.trim().to_string(),
            source: DescriptionSource::DocComment,
        }),
        (ShouldGenerate::Disabled, None) => Err(PluginError::MissingDescription {
            function: request.function_name.to_string(),
        }),
        (ShouldGenerate::Unset, None) => synthesize(request, generator).await,
    }
}

async fn synthesize(
    request: &DescriptionRequest<'_>,
    generator: &dyn DescriptionGenerator,
) -> PluginResult<ResolvedDescription> {
    if let Availability::Unavailable { missing } = generator.availability() {
        return Err(PluginError::GenerationUnavailable {
            function: request.function_name.to_string(),
            missing,
        });
    }

    debug!(
        function = request.function_name,
        generator = generator.name(),
        "Synthesizing endpoint description"
    );
    let raw = generator
        .generate(request.function_name, request.source_text)
        .await?;

    match first_line(&raw) {
        Some(line) => Ok(ResolvedDescription {
            text: line.to_string(),
            source: DescriptionSource::Generated,
        }),
        None => Err(PluginError::Generation {
            function: request.function_name.to_string(),
            reason: "empty response".to_string(),
        }),
    }
}

/// 最初の空でない行（トリム済み）
fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}
