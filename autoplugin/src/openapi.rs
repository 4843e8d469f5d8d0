//! OpenAPI 3.0 ドキュメント生成
//!
//! ルートテーブルから (パス, メソッド) ごとに1オペレーションを組み立てる。
//! パスはテーブル順、メソッドは `HttpMethod` の順で並べるので出力は決定的。

use crate::registry::{Endpoint, RouteTable};
use autoplugin_common::error::{PluginError, PluginResult};
use autoplugin_common::types::{HttpMethod, ParamDescriptor, ValueType};
use serde_json::{json, Map, Value};

/// OpenAPIバージョン
pub const OPENAPI_VERSION: &str = "3.0.2";

/// エラーレスポンスのスキーマ名
const ERROR_SCHEMA: &str = "ErrorResponse";

/// 値の型からJSON Schemaを作る
pub fn value_schema(value_type: ValueType, items: Option<ValueType>) -> Value {
    match value_type {
        ValueType::Null => json!({ "nullable": true }),
        ValueType::Array => json!({
            "type": "array",
            "items": items.map(|t| value_schema(t, None)).unwrap_or_else(|| json!({})),
        }),
        other => json!({ "type": other.as_str() }),
    }
}

fn param_schema(param: &ParamDescriptor) -> Value {
    let mut schema = value_schema(param.value_type, param.items);
    if let (Some(default), Value::Object(map)) = (&param.default, &mut schema) {
        map.insert("default".to_string(), default.clone());
    }
    schema
}

/// `/math/add` → `MathAdd`
fn schema_prefix(path: &str) -> String {
    path.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `/math/add` + GET → `math_add_get`
fn operation_id(path: &str, method: HttpMethod) -> String {
    let ident = path
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    format!("{}_{}", ident, method.openapi_key())
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn request_schema(endpoint: &Endpoint) -> Value {
    let properties: Map<String, Value> = endpoint
        .params
        .iter()
        .map(|p| (p.name.clone(), param_schema(p)))
        .collect();
    let required: Vec<&str> = endpoint
        .params
        .iter()
        .filter(|p| p.is_required())
        .map(|p| p.name.as_str())
        .collect();

    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

fn response_schema(endpoint: &Endpoint) -> Value {
    json!({
        "type": "object",
        "properties": { "result": value_schema(endpoint.return_type, None) },
        "required": ["result"],
    })
}

fn operation(endpoint: &Endpoint, method: HttpMethod) -> Value {
    let prefix = schema_prefix(&endpoint.path);
    let mut op = json!({
        "summary": endpoint.function_name,
        "description": endpoint.description,
        "operationId": operation_id(&endpoint.path, method),
    });

    let mut responses = Map::new();
    responses.insert(
        "200".to_string(),
        json!({
            "description": "Successful Response",
            "content": json_content(schema_ref(&format!("{}Response", prefix))),
        }),
    );

    if method.has_body() {
        op["requestBody"] = json!({
            "required": endpoint.params.iter().any(ParamDescriptor::is_required),
            "content": json_content(schema_ref(&format!("{}Request", prefix))),
        });
        responses.insert(
            "400".to_string(),
            json!({
                "description": "Malformed Request Body",
                "content": json_content(schema_ref(ERROR_SCHEMA)),
            }),
        );
    } else if !endpoint.params.is_empty() {
        let parameters: Vec<Value> = endpoint
            .params
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "in": "query",
                    "required": p.is_required(),
                    "schema": param_schema(p),
                })
            })
            .collect();
        op["parameters"] = Value::Array(parameters);
    }

    responses.insert(
        "422".to_string(),
        json!({
            "description": "Validation Error",
            "content": json_content(schema_ref(ERROR_SCHEMA)),
        }),
    );
    op["responses"] = Value::Object(responses);
    op
}

/// ルートテーブルからOpenAPIドキュメントを組み立てる
pub fn build_document(routes: &RouteTable, title: &str, version: &str) -> Value {
    let mut paths = Map::new();
    let mut schemas = Map::new();

    for endpoint in routes.iter() {
        let prefix = schema_prefix(&endpoint.path);
        let mut methods = endpoint.methods.clone();
        methods.sort();

        let mut item = Map::new();
        for method in methods.iter().copied() {
            item.insert(method.openapi_key().to_string(), operation(endpoint, method));
        }
        paths.insert(endpoint.path.clone(), Value::Object(item));

        if methods.iter().any(HttpMethod::has_body) {
            schemas.insert(format!("{}Request", prefix), request_schema(endpoint));
        }
        schemas.insert(format!("{}Response", prefix), response_schema(endpoint));
    }

    schemas.insert(
        ERROR_SCHEMA.to_string(),
        json!({
            "type": "object",
            "properties": { "error": { "type": "string" } },
            "required": ["error"],
        }),
    );

    json!({
        "openapi": OPENAPI_VERSION,
        "info": { "title": title, "version": version },
        "paths": paths,
        "components": { "schemas": schemas },
    })
}

/// YAMLに変換する
pub fn to_yaml(document: &Value) -> PluginResult<String> {
    serde_yaml::to_string(document).map_err(|e| PluginError::Serialization(e.to_string()))
}
