//! Integration Test: エンドポイント登録と説明文の解決
//!
//! 明示的な説明・ドキュメントコメント・合成の優先順位と、ルートテーブルの上書きを確認する。

use autoplugin::{
    DescriptionSource, HttpMethod, PluginApp, PluginError, RegisterOptions, ShouldGenerate,
    ValueType,
};
use autoplugin::describe::NoGenerator;
use serde_json::json;

use crate::support::functions::{add, hello, mean, pow};
use crate::support::generator::RecordingGenerator;

/// 明示的な説明は生成フラグやドキュメントコメントに関係なくそのまま使われる
#[tokio::test]
async fn test_explicit_description_is_used_verbatim() {
    let generator = RecordingGenerator::new("Generated.");

    for flag in [None, Some(true), Some(false)] {
        let mut app = PluginApp::with_generator(generator.clone());
        let endpoint = app
            .register(
                add::spec(),
                RegisterOptions::new()
                    .description("Sums a and b.")
                    .generate_description(flag),
            )
            .await
            .unwrap();
        assert_eq!(endpoint.description, "Sums a and b.");
        assert_eq!(endpoint.description_source, DescriptionSource::Explicit);
    }
    assert_eq!(generator.calls(), 0);
}

/// 生成フラグ未指定ならトリムしたドキュメントコメントを使う
#[tokio::test]
async fn test_doc_comment_is_trimmed() {
    let generator = RecordingGenerator::new("Generated.");
    let mut app = PluginApp::with_generator(generator.clone());

    let endpoint = app
        .register(pow::spec(), RegisterOptions::new())
        .await
        .unwrap();
    assert_eq!(endpoint.description, "Raise a number to a power.");
    assert_eq!(endpoint.description_source, DescriptionSource::DocComment);
    assert_eq!(generator.calls(), 0);
}

/// 生成無効・説明なし・ドキュメントコメントなしは MissingDescription
#[tokio::test]
async fn test_disabled_generation_without_doc_fails() {
    let generator = RecordingGenerator::new("Generated.");
    let mut app = PluginApp::with_generator(generator.clone());

    let err = app
        .register(
            hello::spec(),
            RegisterOptions::new().generate_description(false),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PluginError::MissingDescription { ref function } if function == "hello"));
    assert!(app.routes().is_empty());
    assert_eq!(generator.calls(), 0);
}

/// 生成無効でもドキュメントコメントがあればそれを使う（生成器は使えなくてよい）
#[tokio::test]
async fn test_disabled_generation_uses_doc_comment() {
    let mut app = PluginApp::with_generator(std::sync::Arc::new(NoGenerator));

    let endpoint = app
        .register(add::spec(), RegisterOptions::new().generate_description(false))
        .await
        .unwrap();
    assert_eq!(endpoint.description, "Adds two numbers");
    assert_eq!(endpoint.description_source, DescriptionSource::DocComment);
}

/// 生成有効ならドキュメントコメントがあっても合成を1回だけ呼ぶ
#[tokio::test]
async fn test_enabled_generation_calls_generator_once() {
    let generator = RecordingGenerator::new("Adds two integers and returns the sum.\nIgnored.");
    let mut app = PluginApp::with_generator(generator.clone());

    let endpoint = app
        .register(
            add::spec(),
            RegisterOptions::new().generate_description(ShouldGenerate::Enabled),
        )
        .await
        .unwrap();

    assert_eq!(endpoint.description, "Adds two integers and returns the sum.");
    assert_eq!(endpoint.description_source, DescriptionSource::Generated);
    assert_eq!(generator.calls(), 1);

    let requests = generator.requests();
    assert_eq!(requests[0].0, "add");
    assert!(requests[0].1.contains("a + b"));
    assert!(!requests[0].1.contains("Adds two numbers"));
}

/// ドキュメントコメントがなく生成フラグ未指定なら合成する
#[tokio::test]
async fn test_unset_without_doc_synthesizes() {
    let generator = RecordingGenerator::new("Greets a person.");
    let mut app = PluginApp::with_generator(generator.clone());

    let endpoint = app
        .register(hello::spec(), RegisterOptions::new().methods(["GET", "POST"]))
        .await
        .unwrap();
    assert_eq!(endpoint.description, "Greets a person.");
    assert_eq!(generator.calls(), 1);
}

/// 同じパスへの再登録は上書きされ、ドキュメントにも最新のものだけが出る
#[tokio::test]
async fn test_reregistration_overwrites_route() {
    let generator = RecordingGenerator::new("Generated.");
    let mut app = PluginApp::with_generator(generator);

    app.register(
        add::spec(),
        RegisterOptions::new().path("calc").description("First."),
    )
    .await
    .unwrap();
    app.register(
        pow::spec(),
        RegisterOptions::new()
            .path("/calc")
            .methods(["GET"])
            .description("Second."),
    )
    .await
    .unwrap();

    assert_eq!(app.routes().len(), 1);
    let endpoint = app.routes().get("/calc").unwrap();
    assert_eq!(endpoint.function_name, "pow");
    assert_eq!(endpoint.methods, vec![HttpMethod::Get]);

    let doc = app.openapi();
    let item = doc["paths"]["/calc"].as_object().unwrap();
    assert_eq!(item.len(), 1);
    assert_eq!(item["get"]["description"], "Second.");
}

/// 設定エラーは説明文の解決より前に検出される
#[tokio::test]
async fn test_configuration_errors_precede_resolution() {
    let generator = RecordingGenerator::new("Generated.");
    let mut app = PluginApp::with_generator(generator.clone());

    let empty: [&str; 0] = [];
    let err = app
        .register(hello::spec(), RegisterOptions::new().methods(empty))
        .await
        .unwrap_err();
    assert!(matches!(err, PluginError::Configuration(_)));

    let err = app
        .register(hello::spec(), RegisterOptions::new().methods(["FETCH"]))
        .await
        .unwrap_err();
    assert!(matches!(err, PluginError::Configuration(_)));

    let err = app
        .register(hello::spec(), RegisterOptions::new().path("greet/{name}"))
        .await
        .unwrap_err();
    assert!(matches!(err, PluginError::Configuration(_)));

    assert_eq!(generator.calls(), 0);
    assert!(app.routes().is_empty());
}

/// パラメータ記述子は宣言順・宣言名を保つ
#[tokio::test]
async fn test_parameter_descriptors_follow_signature() {
    let generator = RecordingGenerator::new("Generated.");
    let mut app = PluginApp::with_generator(generator);

    let endpoint = app
        .register(hello::spec(), RegisterOptions::new().description("Greets."))
        .await
        .unwrap();
    assert_eq!(endpoint.path, "/hello");
    assert_eq!(endpoint.methods, vec![HttpMethod::Post]);
    assert_eq!(endpoint.params[0].name, "name");
    assert!(endpoint.params[0].is_required());
    assert_eq!(endpoint.params[1].name, "age");
    assert_eq!(endpoint.params[1].default, Some(json!(5)));
    assert_eq!(endpoint.return_type, ValueType::String);

    let endpoint = app
        .register(mean::spec(), RegisterOptions::new().description("Averages."))
        .await
        .unwrap();
    assert_eq!(endpoint.params[0].value_type, ValueType::Array);
    assert_eq!(endpoint.params[0].items, Some(ValueType::Number));
    assert_eq!(endpoint.return_type, ValueType::Number);
}
