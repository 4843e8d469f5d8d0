//! リクエストパラメータのバインド
//!
//! GET/DELETE/HEAD/OPTIONS はクエリ文字列、POST/PUT/PATCH はJSONボディから
//! パラメータ名をキーとするJSONオブジェクトを組み立てる。
//! 省略されたパラメータはここでは補わない（デフォルト値の適用はハンドラー側）。

use super::error::HandlerError;
use autoplugin_common::types::{ParamDescriptor, ValueType};
use serde_json::{Map, Value};

/// クエリ文字列をパラメータ記述子に従ってJSONオブジェクトに変換する
///
/// 同じキーが繰り返された場合、配列パラメータなら全要素を、それ以外は最後の値を使う
pub fn bind_query(
    query: Option<&str>,
    params: &[ParamDescriptor],
) -> Result<Map<String, Value>, HandlerError> {
    let pairs: Vec<(String, String)> = match query {
        Some(query) if !query.is_empty() => serde_urlencoded::from_str(query)
            .map_err(|e| HandlerError::BadRequest(format!("invalid query string: {}", e)))?,
        _ => Vec::new(),
    };

    let mut args = Map::new();
    for param in params {
        let values: Vec<&str> = pairs
            .iter()
            .filter(|(key, _)| key == &param.name)
            .map(|(_, value)| value.as_str())
            .collect();
        if values.is_empty() {
            continue;
        }

        let value = if param.value_type == ValueType::Array {
            coerce_array(param, &values)?
        } else {
            let raw = values[values.len() - 1];
            coerce(&param.name, param.value_type, raw)?
        };
        args.insert(param.name.clone(), value);
    }
    Ok(args)
}

/// JSONボディを引数オブジェクトとして解釈する
///
/// 空のボディは引数なしとして扱う
pub fn bind_body(body: &[u8]) -> Result<Map<String, Value>, HandlerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(HandlerError::BadRequest(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(HandlerError::BadRequest(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid(name: &str, raw: &str, expected: &str) -> HandlerError {
    HandlerError::InvalidParameter {
        name: name.to_string(),
        reason: format!("{:?} is not a valid {}", raw, expected),
    }
}

fn coerce_array(param: &ParamDescriptor, values: &[&str]) -> Result<Value, HandlerError> {
    // `?xs=[1,2]` 形式
    if let [single] = values {
        if single.trim_start().starts_with('[') {
            return serde_json::from_str::<Vec<Value>>(single)
                .map(Value::Array)
                .map_err(|_| invalid(&param.name, single, "array"));
        }
    }

    let item_type = param.items.unwrap_or(ValueType::String);
    values
        .iter()
        .map(|raw| coerce(&param.name, item_type, raw))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// テキストを宣言された型の値に変換する
pub fn coerce(name: &str, value_type: ValueType, raw: &str) -> Result<Value, HandlerError> {
    let text = raw.trim();
    match value_type {
        ValueType::Integer => {
            if let Ok(n) = text.parse::<i64>() {
                Ok(Value::from(n))
            } else if let Ok(n) = text.parse::<u64>() {
                Ok(Value::from(n))
            } else {
                Err(invalid(name, raw, "integer"))
            }
        }
        ValueType::Number => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid(name, raw, "number")),
        ValueType::Boolean => match text.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(invalid(name, raw, "boolean")),
        },
        ValueType::String => Ok(Value::String(raw.to_string())),
        ValueType::Object | ValueType::Array => {
            serde_json::from_str(text).map_err(|_| invalid(name, raw, value_type.as_str()))
        }
        ValueType::Null => Ok(Value::Null),
    }
}
