//! マニフェスト生成
//!
//! ルートテーブルからAPI記述ドキュメント（`openapi.yaml`）と
//! プラグインマニフェスト（`ai-plugin.json`）を出力ディレクトリに書き出す。
//! 2つのドキュメントは独立に処理し、失敗はまとめて報告する。

use crate::app::PluginApp;
use crate::openapi;
use autoplugin_common::config::ManifestConfig;
use autoplugin_common::error::{DocumentWriteError, PluginError, PluginResult};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// API記述ドキュメントのファイル名
pub const OPENAPI_FILE: &str = "openapi.yaml";

/// プラグインマニフェストのファイル名
pub const PLUGIN_FILE: &str = "ai-plugin.json";

/// マニフェストのフィールド長の上限（文字数）
const FIELD_LIMITS: &[(&str, usize)] = &[
    ("name_for_human", 50),
    ("name_for_model", 50),
    ("description_for_human", 120),
    ("description_for_model", 8000),
];

/// 生成結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// 書き込んだドキュメント
    pub written: Vec<PathBuf>,
    /// 上書きしなかった既存のドキュメント
    pub skipped: Vec<PathBuf>,
}

/// アプリのルートテーブルからドキュメントを生成する
///
/// API記述ドキュメントは `/openapi.json` で配信するものと同じ（タイトルとバージョンはアプリのもの）
pub fn generate(app: &PluginApp, config: &ManifestConfig) -> PluginResult<GenerateReport> {
    write_documents(&app.openapi(), config)
}

/// 組み立て済みのAPI記述ドキュメントとプラグインマニフェストを書き出す
pub fn write_documents(document: &Value, config: &ManifestConfig) -> PluginResult<GenerateReport> {
    let manifest = build_plugin_manifest(config)?;

    let openapi_text = openapi::to_yaml(document)?;
    let plugin_text = serde_json::to_string_pretty(&Value::Object(manifest))?;

    if let Err(source) = fs::create_dir_all(&config.out_dir) {
        warn!(dir = %config.out_dir.display(), error = %source, "Failed to create output directory");
        return Err(PluginError::ManifestWrite(vec![DocumentWriteError {
            path: config.out_dir.clone(),
            source,
        }]));
    }

    let documents = [
        (OPENAPI_FILE, openapi_text, config.overwrite_openapi_spec),
        (PLUGIN_FILE, plugin_text, config.overwrite_plugin_spec),
    ];

    let mut report = GenerateReport::default();
    let mut failures = Vec::new();
    for (file, contents, overwrite) in documents {
        let path = config.out_dir.join(file);
        if path.exists() && !overwrite {
            info!(path = %path.display(), "Keeping existing document");
            report.skipped.push(path);
            continue;
        }
        match write_atomic(&path, contents.as_bytes()) {
            Ok(()) => {
                info!(path = %path.display(), "Wrote document");
                report.written.push(path);
            }
            Err(source) => {
                warn!(path = %path.display(), error = %source, "Failed to write document");
                failures.push(DocumentWriteError { path, source });
            }
        }
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(PluginError::ManifestWrite(failures))
    }
}

/// 一時ファイルに書いてからリネームする
fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

/// プラグインマニフェストを組み立てる
///
/// `extra` のフィールドは既定のフィールドより優先される。長さの検証はマージ後に行う。
pub fn build_plugin_manifest(config: &ManifestConfig) -> PluginResult<Map<String, Value>> {
    let base = json!({
        "schema_version": "v1",
        "name_for_human": config.name_for_human,
        "name_for_model": config.name_for_model,
        "description_for_human": config.description_for_human,
        "description_for_model": config.description_for_model,
        "version": config.version,
        "auth": { "type": "none" },
        "api": {
            "type": "openapi",
            "url": config.api_url,
            "is_user_authenticated": false,
        },
        "logo_url": "http://example.com/logo.png",
        "contact_email": "support@example.com",
        "legal_info_url": "http://www.example.com/legal",
    });

    let mut manifest = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in &config.extra {
        manifest.insert(key.clone(), value.clone());
    }

    validate_fields(&manifest)?;
    Ok(manifest)
}

fn validate_fields(manifest: &Map<String, Value>) -> PluginResult<()> {
    for (field, limit) in FIELD_LIMITS {
        let Some(value) = manifest.get(*field) else {
            continue;
        };
        let Some(text) = value.as_str() else {
            return Err(PluginError::Configuration(format!(
                "{} must be a string",
                field
            )));
        };
        let len = text.chars().count();
        if len > *limit {
            return Err(PluginError::Configuration(format!(
                "{} must be at most {} characters (got {})",
                field, limit, len
            )));
        }
    }
    Ok(())
}
