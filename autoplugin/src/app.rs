//! プラグインアプリケーション
//!
//! ルートテーブルと説明文生成器を所有する。登録・マニフェスト生成・起動の起点。

use crate::describe::{default_generator, DescriptionGenerator};
use crate::function::FunctionSpec;
use crate::registry::{self, Endpoint, RegisterOptions, RouteTable};
use autoplugin_common::error::PluginResult;
use axum::Router;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 既定のAPIタイトル
pub const DEFAULT_TITLE: &str = "Custom ChatGPT Plugin";

/// 既定のAPIバージョン
pub const DEFAULT_VERSION: &str = "1.0.0";

/// 関数をHTTPエンドポイントとして公開するアプリケーション
#[derive(Clone)]
pub struct PluginApp {
    routes: RouteTable,
    generator: Arc<dyn DescriptionGenerator>,
    title: String,
    version: String,
    well_known_dir: Option<PathBuf>,
}

impl Default for PluginApp {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginApp {
    /// 既定の説明文生成器で作成
    pub fn new() -> Self {
        Self::with_generator(default_generator())
    }

    /// 説明文生成器を指定して作成
    pub fn with_generator(generator: Arc<dyn DescriptionGenerator>) -> Self {
        Self {
            routes: RouteTable::new(),
            generator,
            title: DEFAULT_TITLE.to_string(),
            version: DEFAULT_VERSION.to_string(),
            well_known_dir: None,
        }
    }

    /// APIタイトルを設定
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// APIバージョンを設定
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// `/.well-known` で配信するディレクトリを設定
    pub fn serve_well_known(mut self, dir: impl Into<PathBuf>) -> Self {
        self.well_known_dir = Some(dir.into());
        self
    }

    /// 関数を登録する
    ///
    /// 同じパスへの再登録は上書き。失敗した場合ルートテーブルは変更されない。
    pub async fn register(
        &mut self,
        function: FunctionSpec,
        options: RegisterOptions,
    ) -> PluginResult<&Endpoint> {
        registry::register(&mut self.routes, self.generator.as_ref(), function, options).await
    }

    /// ルートテーブル
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// 説明文生成器
    pub fn generator(&self) -> &dyn DescriptionGenerator {
        self.generator.as_ref()
    }

    /// APIタイトル
    pub fn api_title(&self) -> &str {
        &self.title
    }

    /// APIバージョン
    pub fn api_version(&self) -> &str {
        &self.version
    }

    /// `/.well-known` で配信するディレクトリ
    pub fn well_known_dir(&self) -> Option<&Path> {
        self.well_known_dir.as_deref()
    }

    /// 現在のルートテーブルのOpenAPIドキュメント
    pub fn openapi(&self) -> Value {
        crate::openapi::build_document(&self.routes, &self.title, &self.version)
    }

    /// axumルーターを作成する
    pub fn router(&self) -> Router {
        crate::api::create_router(self)
    }
}

impl std::fmt::Debug for PluginApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginApp")
            .field("routes", &self.routes)
            .field("generator", &self.generator.name())
            .field("title", &self.title)
            .field("version", &self.version)
            .field("well_known_dir", &self.well_known_dir)
            .finish()
    }
}
