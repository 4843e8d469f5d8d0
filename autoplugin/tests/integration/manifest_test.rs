//! Integration Test: マニフェスト生成
//!
//! 出力ディレクトリへの書き込みと上書きフラグの扱いを確認する。

use autoplugin::manifest::{OPENAPI_FILE, PLUGIN_FILE};
use autoplugin::{generate, ManifestConfig, PluginApp, PluginError, RegisterOptions};
use serde_json::Value;
use tempfile::tempdir;

use crate::support::functions::{add, hello};
use crate::support::generator::RecordingGenerator;

async fn demo_app() -> PluginApp {
    let mut app = PluginApp::with_generator(RecordingGenerator::new("Greets a person."));
    app.register(add::spec(), RegisterOptions::new().methods(["GET"]))
        .await
        .unwrap();
    app.register(hello::spec(), RegisterOptions::new())
        .await
        .unwrap();
    app
}

fn read_manifest(dir: &std::path::Path) -> Value {
    let text = std::fs::read_to_string(dir.join(PLUGIN_FILE)).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn read_openapi(dir: &std::path::Path) -> Value {
    let text = std::fs::read_to_string(dir.join(OPENAPI_FILE)).unwrap();
    serde_yaml::from_str(&text).unwrap()
}

/// 名前を1つ指定すると人間向け・モデル向けの両方に入る
#[tokio::test]
async fn test_generate_writes_both_documents() {
    let dir = tempdir().unwrap();
    let out_dir = dir.path().join(".well-known");
    let app = demo_app().await;

    let report = generate(
        &app,
        &ManifestConfig::new().name("Example").out_dir(&out_dir),
    )
    .unwrap();
    assert_eq!(report.written.len(), 2);
    assert!(report.skipped.is_empty());

    let manifest = read_manifest(&out_dir);
    assert_eq!(manifest["name_for_human"], "Example");
    assert_eq!(manifest["name_for_model"], "Example");
    assert_eq!(manifest["schema_version"], "v1");
    assert_eq!(manifest["api"]["url"], "http://localhost:8000/openapi.yaml");

    let document = read_openapi(&out_dir);
    assert_eq!(document["paths"]["/add"]["get"]["description"], "Adds two numbers");
    assert_eq!(document["paths"]["/hello"]["post"]["description"], "Greets a person.");
}

/// 書き出すドキュメントは配信中のものと同じタイトル・バージョンを持つ
#[tokio::test]
async fn test_written_document_matches_served_info() {
    let dir = tempdir().unwrap();
    let app = demo_app().await.title("Example Plugin").version("2.0.0");

    generate(&app, &ManifestConfig::new().version("0.3.0").out_dir(dir.path())).unwrap();

    let document = read_openapi(dir.path());
    assert_eq!(document["info"], app.openapi()["info"]);
    assert_eq!(document["info"]["title"], "Example Plugin");
    assert_eq!(document["info"]["version"], "2.0.0");
    assert_eq!(read_manifest(dir.path())["version"], "0.3.0");
}

/// 上書きしない設定のドキュメントは残り、もう一方だけ更新される
#[tokio::test]
async fn test_overwrite_flags_are_independent() {
    let dir = tempdir().unwrap();
    let app = demo_app().await;

    std::fs::write(dir.path().join(OPENAPI_FILE), "openapi: keep-me\n").unwrap();
    std::fs::write(dir.path().join(PLUGIN_FILE), "{}").unwrap();

    let report = generate(
        &app,
        &ManifestConfig::new()
            .name("Updated")
            .out_dir(dir.path())
            .overwrite(false, true),
    )
    .unwrap();

    assert_eq!(report.skipped, vec![dir.path().join(OPENAPI_FILE)]);
    assert_eq!(report.written, vec![dir.path().join(PLUGIN_FILE)]);
    assert_eq!(
        std::fs::read_to_string(dir.path().join(OPENAPI_FILE)).unwrap(),
        "openapi: keep-me\n"
    );
    assert_eq!(read_manifest(dir.path())["name_for_human"], "Updated");
}

/// 上書きしない設定でもファイルがなければ書き込む
#[tokio::test]
async fn test_missing_documents_are_written_without_overwrite() {
    let dir = tempdir().unwrap();
    let app = demo_app().await;

    let report = generate(
        &app,
        &ManifestConfig::new()
            .out_dir(dir.path())
            .overwrite(false, false),
    )
    .unwrap();
    assert_eq!(report.written.len(), 2);
    assert_eq!(read_manifest(dir.path())["name_for_human"], "Custom Plugin");
}

/// 追加フィールドが既定値を上書きし、長さ検証はマージ後に行われる
#[tokio::test]
async fn test_extra_fields_are_merged_and_validated() {
    let dir = tempdir().unwrap();
    let app = demo_app().await;

    generate(
        &app,
        &ManifestConfig::new()
            .out_dir(dir.path())
            .field("contact_email", "plugins@example.org"),
    )
    .unwrap();
    assert_eq!(
        read_manifest(dir.path())["contact_email"],
        "plugins@example.org"
    );

    let err = generate(
        &app,
        &ManifestConfig::new()
            .out_dir(dir.path())
            .field("name_for_model", "x".repeat(51)),
    )
    .unwrap_err();
    assert!(matches!(err, PluginError::Configuration(_)));
    // 検証エラーでは何も書き換えない
    assert_eq!(read_manifest(dir.path())["name_for_model"], "Custom Plugin");
}

/// ルートを再登録して再生成すると最新の説明が反映される
#[tokio::test]
async fn test_regeneration_reflects_latest_routes() {
    let dir = tempdir().unwrap();
    let mut app = demo_app().await;
    let config = ManifestConfig::new().out_dir(dir.path());

    generate(&app, &config).unwrap();
    app.register(
        add::spec(),
        RegisterOptions::new().methods(["GET"]).description("Sums a and b."),
    )
    .await
    .unwrap();
    generate(&app, &config).unwrap();

    let document = read_openapi(dir.path());
    assert_eq!(document["paths"]["/add"]["get"]["description"], "Sums a and b.");
}
