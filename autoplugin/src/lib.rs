//! autoplugin
//!
//! 関数をHTTPエンドポイントとして公開し、OpenAPIドキュメントと
//! ChatGPTプラグインマニフェストを生成する

#![warn(missing_docs)]

/// `plugin_fn!` マクロ
#[macro_use]
mod macros;

/// HTTPハンドラー・リクエストバインド・エラーレスポンス
pub mod api;

/// プラグインアプリケーション
pub mod app;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// エンドポイント説明文の解決・生成
pub mod describe;

/// 登録対象の関数
pub mod function;

/// ロギング初期化ユーティリティ
pub mod logging;

/// マニフェスト生成
pub mod manifest;

/// OpenAPIドキュメント生成
pub mod openapi;

/// エンドポイント登録・ルートテーブル
pub mod registry;

/// サーバー起動
pub mod server;

/// 協調的シャットダウン
pub mod shutdown;

/// テスト用サーバー
pub mod testing;

pub use api::error::HandlerError;
pub use app::PluginApp;
pub use autoplugin_common::config::{GeneratorConfig, ManifestConfig, ServerConfig};
pub use autoplugin_common::error::{DocumentWriteError, PluginError, PluginResult};
pub use autoplugin_common::types::{HttpMethod, ParamDescriptor, ShouldGenerate, ValueType};
pub use describe::{Availability, DescriptionGenerator, DescriptionSource};
pub use function::{FunctionSpec, Handler, HandlerFuture, TypeDescriptor};
pub use manifest::{generate, GenerateReport};
pub use registry::{Endpoint, RegisterOptions, RouteTable};
pub use server::launch;
pub use shutdown::ShutdownController;

#[doc(hidden)]
pub use function::__private;
