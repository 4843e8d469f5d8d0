//! HTTP API
//!
//! 登録済みエンドポイントをaxumのルーターに変換する。
//! 戻り値は `{"result": ...}` で包んで返す。

pub mod binding;
pub mod error;

use crate::app::PluginApp;
use crate::openapi;
use crate::registry::Endpoint;
use autoplugin_common::types::HttpMethod;
use axum::{
    body::Bytes,
    extract::RawQuery,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, MethodFilter, MethodRouter},
    Json, Router,
};
use error::HandlerError;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::debug;

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
        HttpMethod::Head => MethodFilter::HEAD,
        HttpMethod::Options => MethodFilter::OPTIONS,
    }
}

/// 関数を呼び出し、戻り値を `result` キーで包む
async fn call_endpoint(
    endpoint: Arc<Endpoint>,
    args: Map<String, Value>,
) -> Result<Json<Value>, HandlerError> {
    if let Some(missing) = endpoint
        .params
        .iter()
        .find(|p| p.is_required() && !args.contains_key(&p.name))
    {
        return Err(HandlerError::MissingParameter(missing.name.clone()));
    }

    debug!(path = %endpoint.path, function = %endpoint.function_name, "Calling function");
    let result = (endpoint.handler)(args).await?;
    Ok(Json(json!({ "result": result })))
}

async fn query_handler(
    endpoint: Arc<Endpoint>,
    query: Option<String>,
) -> Result<Json<Value>, HandlerError> {
    let args = binding::bind_query(query.as_deref(), &endpoint.params)?;
    call_endpoint(endpoint, args).await
}

async fn body_handler(endpoint: Arc<Endpoint>, body: Bytes) -> Result<Json<Value>, HandlerError> {
    let args = binding::bind_body(&body)?;
    call_endpoint(endpoint, args).await
}

fn endpoint_routes(endpoint: Arc<Endpoint>) -> MethodRouter {
    let mut routes = MethodRouter::new();
    for method in endpoint.methods.iter().copied() {
        let endpoint = endpoint.clone();
        routes = if method.has_body() {
            routes.on(method_filter(method), move |body: Bytes| {
                body_handler(endpoint.clone(), body)
            })
        } else {
            routes.on(method_filter(method), move |RawQuery(query): RawQuery| {
                query_handler(endpoint.clone(), query)
            })
        };
    }
    routes
}

/// アプリからルーターを作成する
///
/// ルート情報はこの時点で固定され、以降の登録はルーターに反映されない
pub fn create_router(app: &PluginApp) -> Router {
    let mut router = Router::new();
    for endpoint in app.routes().iter() {
        router = router.route(&endpoint.path, endpoint_routes(Arc::new(endpoint.clone())));
    }

    let document = Arc::new(app.openapi());
    let json_document = document.clone();
    router = router
        .route(
            "/openapi.json",
            get(move || async move { Json(json_document.as_ref().clone()) }),
        )
        .route(
            "/openapi.yaml",
            get(move || async move { openapi_yaml(&document) }),
        );

    if let Some(dir) = app.well_known_dir() {
        router = router.nest_service("/.well-known", ServeDir::new(dir));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

fn openapi_yaml(document: &Value) -> Response {
    match openapi::to_yaml(document) {
        Ok(yaml) => ([(header::CONTENT_TYPE, "application/yaml")], yaml).into_response(),
        Err(e) => HandlerError::Internal(e.to_string()).into_response(),
    }
}
