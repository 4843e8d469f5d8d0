//! Integration Test: ルーター
//!
//! パラメータのバインド、`result` での包み込み、エラーレスポンス、OpenAPIの配信を確認する。

use autoplugin::{PluginApp, RegisterOptions};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::support::functions::{add, hello, mean, pow};
use crate::support::generator::RecordingGenerator;

async fn demo_router() -> Router {
    let mut app = PluginApp::with_generator(RecordingGenerator::new("Greets a person."));
    app.register(add::spec(), RegisterOptions::new().methods(["GET"]))
        .await
        .unwrap();
    app.register(hello::spec(), RegisterOptions::new().methods(["GET", "POST"]))
        .await
        .unwrap();
    app.register(pow::spec(), RegisterOptions::new().path("math/pow"))
        .await
        .unwrap();
    app.register(mean::spec(), RegisterOptions::new().methods(["get"]))
        .await
        .unwrap();
    app.router()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// GETはクエリ文字列から型変換してバインドする
#[tokio::test]
async fn test_get_binds_query_parameters() {
    let (status, body) = send(demo_router().await, get("/add?a=6&b=8")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 14}));
}

/// POSTはJSONボディからバインドし、省略したパラメータはデフォルト値になる
#[tokio::test]
async fn test_post_binds_json_body_with_defaults() {
    let (status, body) = send(
        demo_router().await,
        post_json("/math/pow", r#"{"base": 3}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 9}));

    let (_, body) = send(
        demo_router().await,
        post_json("/hello", r#"{"name": "John Doe", "age": 31}"#),
    )
    .await;
    assert_eq!(body, json!({"result": "Hello, John Doe! Age 31."}));
}

/// 配列パラメータは繰り返しキーで渡せる
#[tokio::test]
async fn test_array_query_parameter() {
    let (status, body) = send(demo_router().await, get("/mean?values=1&values=2.5&values=3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 2.1666666666666665}));

    let (_, body) = send(demo_router().await, get("/mean")).await;
    assert_eq!(body["error"], "Missing required parameter: values");
}

/// 必須パラメータの欠落と型変換の失敗は422
#[tokio::test]
async fn test_missing_or_invalid_parameters_are_422() {
    let (status, body) = send(demo_router().await, get("/add?a=6")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Missing required parameter: b");

    let (status, body) = send(demo_router().await, get("/add?a=6&b=eight")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("`b`"));

    let (status, _) = send(
        demo_router().await,
        post_json("/hello", r#"{"name": "Jane", "age": "old"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

/// 不正なJSONボディは400
#[tokio::test]
async fn test_malformed_body_is_400() {
    let (status, body) = send(demo_router().await, post_json("/hello", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));

    let (status, _) = send(demo_router().await, post_json("/hello", "[\"Jane\"]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// 登録していないメソッドは405
#[tokio::test]
async fn test_unregistered_method_is_rejected() {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/add?a=1&b=2")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(demo_router().await, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(demo_router().await, post_json("/add", r#"{"a": 1, "b": 2}"#)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

/// OpenAPIドキュメントをJSONとYAMLで配信する
#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, doc) = send(demo_router().await, get("/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["paths"]["/add"]["get"]["description"], "Adds two numbers");
    assert_eq!(doc["paths"]["/hello"]["post"]["description"], "Greets a person.");
    assert!(doc["paths"]["/math/pow"].get("post").is_some());

    let response = demo_router()
        .await
        .oneshot(get("/openapi.yaml"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/yaml"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let yaml: Value = serde_yaml::from_slice(&bytes).unwrap();
    assert_eq!(yaml, doc);
}

/// `/.well-known` を設定したディレクトリから配信する
#[tokio::test]
async fn test_well_known_directory_is_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ai-plugin.json"), r#"{"schema_version": "v1"}"#).unwrap();

    let app = PluginApp::with_generator(RecordingGenerator::new("unused"))
        .serve_well_known(dir.path());
    let (status, body) = send(app.router(), get("/.well-known/ai-plugin.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"schema_version": "v1"}));
}
