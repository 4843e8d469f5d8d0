//! エンドポイント登録
//!
//! 関数をルートパスとHTTPメソッドに結び付け、説明文を解決してルートテーブルに記録する。
//! ルートテーブルは `PluginApp` だけが変更する。

use crate::describe::{self, DescriptionGenerator, DescriptionRequest, DescriptionSource};
use crate::function::{FunctionSpec, Handler};
use autoplugin_common::error::{PluginError, PluginResult};
use autoplugin_common::types::{HttpMethod, ParamDescriptor, ShouldGenerate, ValueType};
use std::collections::BTreeMap;
use tracing::info;

/// 予約済みのパス（アプリ自身が提供する）
const RESERVED_PATHS: &[&str] = &["/openapi.json", "/openapi.yaml", "/.well-known"];

/// 登録済みエンドポイント
#[derive(Clone)]
pub struct Endpoint {
    /// ルートパス（先頭に `/` が1つ）
    pub path: String,
    /// 受け付けるHTTPメソッド（空でない）
    pub methods: Vec<HttpMethod>,
    /// パラメータ記述子（宣言順）
    pub params: Vec<ParamDescriptor>,
    /// 戻り値の型
    pub return_type: ValueType,
    /// 解決済みの説明文（空でない）
    pub description: String,
    /// 説明文の出どころ
    pub description_source: DescriptionSource,
    /// ドキュメントコメント
    pub doc_comment: Option<String>,
    /// ソーステキスト
    pub source_text: String,
    /// 関数名
    pub function_name: String,
    /// ハンドラー
    pub handler: Handler,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("path", &self.path)
            .field("methods", &self.methods)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("description", &self.description)
            .field("description_source", &self.description_source)
            .field("function_name", &self.function_name)
            .finish_non_exhaustive()
    }
}

/// ルートテーブル（パス順）
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: BTreeMap<String, Endpoint>,
}

impl RouteTable {
    /// 空のテーブル
    pub fn new() -> Self {
        Self::default()
    }

    /// 同じパスのエントリは上書きする
    pub(crate) fn insert(&mut self, endpoint: Endpoint) -> &Endpoint {
        let path = endpoint.path.clone();
        self.entries.insert(path.clone(), endpoint);
        &self.entries[&path]
    }

    /// パスで検索
    pub fn get(&self, path: &str) -> Option<&Endpoint> {
        self.entries.get(path)
    }

    /// パス順に列挙
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.entries.values()
    }

    /// 登録数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空か
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 登録オプション
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    path: Option<String>,
    methods: Option<Vec<String>>,
    description: Option<String>,
    generate_description: ShouldGenerate,
}

impl RegisterOptions {
    /// 既定値（パスは関数名、メソッドはPOST、生成フラグは未指定）
    pub fn new() -> Self {
        Self::default()
    }

    /// ルートパスを指定
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// HTTPメソッドを指定（大文字小文字は区別しない）
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    /// 説明文を明示的に指定
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 説明文の自動生成フラグを指定
    pub fn generate_description(mut self, flag: impl Into<ShouldGenerate>) -> Self {
        self.generate_description = flag.into();
        self
    }
}

/// ルートパスを正規化する
///
/// 先頭の `/` を1つにそろえ、末尾の `/` を取り除く
pub fn normalize_path(hint: &str) -> PluginResult<String> {
    let trimmed = hint.trim_matches('/');
    if trimmed.is_empty() {
        return Err(PluginError::Configuration(format!(
            "invalid route path {:?}: must not be empty",
            hint
        )));
    }
    if let Some(bad) = trimmed
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '{' | '}' | '?' | '#' | ':' | '*'))
    {
        return Err(PluginError::Configuration(format!(
            "invalid route path {:?}: contains {:?}",
            hint, bad
        )));
    }
    if trimmed.split('/').any(str::is_empty) {
        return Err(PluginError::Configuration(format!(
            "invalid route path {:?}: contains an empty segment",
            hint
        )));
    }

    let path = format!("/{}", trimmed);
    if RESERVED_PATHS
        .iter()
        .any(|reserved| path == *reserved || path.starts_with(&format!("{}/", reserved)))
    {
        return Err(PluginError::Configuration(format!(
            "route path {} is reserved",
            path
        )));
    }
    Ok(path)
}

/// HTTPメソッド名を解釈する
///
/// 未指定なら `POST`。重複は1つにまとめ、指定順を保つ。
pub fn parse_methods(methods: Option<&[String]>) -> PluginResult<Vec<HttpMethod>> {
    let Some(methods) = methods else {
        return Ok(vec![HttpMethod::Post]);
    };
    if methods.is_empty() {
        return Err(PluginError::Configuration(
            "methods must not be empty".to_string(),
        ));
    }

    let mut parsed = Vec::with_capacity(methods.len());
    for name in methods {
        let method: HttpMethod = name.parse().map_err(|e| {
            let supported = HttpMethod::ALL
                .iter()
                .map(HttpMethod::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            PluginError::Configuration(format!("{} (supported: {})", e, supported))
        })?;
        if !parsed.contains(&method) {
            parsed.push(method);
        }
    }
    Ok(parsed)
}

/// 関数をエンドポイントとして登録する
///
/// 設定の検証は説明文の解決より前に行う。説明文の解決は1回だけ。
pub(crate) async fn register<'t>(
    table: &'t mut RouteTable,
    generator: &dyn DescriptionGenerator,
    function: FunctionSpec,
    options: RegisterOptions,
) -> PluginResult<&'t Endpoint> {
    let path = normalize_path(options.path.as_deref().unwrap_or(function.name()))?;
    let methods = parse_methods(options.methods.as_deref())?;

    let source_text = function.source_text();
    let resolved = describe::resolve(
        &DescriptionRequest {
            function_name: function.name(),
            explicit_description: options.description.as_deref(),
            should_generate: options.generate_description,
            doc_comment: function.doc_comment(),
            source_text: &source_text,
        },
        generator,
    )
    .await?;

    info!(
        function = function.name(),
        path = %path,
        methods = ?methods,
        description_source = ?resolved.source,
        "Registered endpoint"
    );

    let endpoint = Endpoint {
        path,
        methods,
        params: function.params().to_vec(),
        return_type: function.return_type(),
        description: resolved.text,
        description_source: resolved.source,
        doc_comment: function.doc_comment().map(str::to_string),
        source_text,
        function_name: function.name().to_string(),
        handler: function.handler(),
    };
    Ok(table.insert(endpoint))
}
