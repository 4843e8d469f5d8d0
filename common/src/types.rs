//! 共通型定義
//!
//! HTTPメソッド、パラメータ記述子、説明生成フラグ等のコアデータ型

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// エンドポイントが受け付けるHTTPメソッド
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET（クエリ文字列でパラメータを受け取る）
    Get,
    /// POST（JSONボディでパラメータを受け取る）
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl HttpMethod {
    /// 全メソッド（標準語彙）
    pub const ALL: [HttpMethod; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Head,
        Self::Options,
    ];

    /// 大文字のメソッド名
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// OpenAPIのパスアイテムで使うキー（小文字）
    pub fn openapi_key(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
        }
    }

    /// パラメータをJSONボディで受け取るメソッドか
    ///
    /// それ以外はクエリ文字列からバインドする
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

/// HTTPメソッド名のパースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseHttpMethodError(pub String);

impl std::fmt::Display for ParseHttpMethodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported HTTP method: {:?}", self.0)
    }
}

impl std::error::Error for ParseHttpMethodError {}

impl FromStr for HttpMethod {
    type Err = ParseHttpMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(ParseHttpMethodError(s.to_string())),
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// パラメータ・戻り値の意味的な型
///
/// JSON Schemaの `type` に対応する
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// 整数
    Integer,
    /// 浮動小数点数
    Number,
    /// 文字列
    String,
    /// 真偽値
    Boolean,
    /// 配列
    Array,
    /// オブジェクト
    Object,
    /// 値なし（`()` を返す関数）
    Null,
}

impl ValueType {
    /// JSON Schemaの型名
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 関数パラメータの記述子
///
/// 関数の宣言順・宣言名をそのまま保持する
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParamDescriptor {
    /// パラメータ名
    pub name: String,
    /// 意味的な型
    pub value_type: ValueType,
    /// 配列要素の型（`value_type` が配列の場合）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ValueType>,
    /// 省略時のデフォルト値（Someなら省略可能）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamDescriptor {
    /// 必須パラメータを作成
    pub fn required(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            items: None,
            default: None,
        }
    }

    /// デフォルト値付きの省略可能パラメータを作成
    pub fn optional(name: impl Into<String>, value_type: ValueType, default: Value) -> Self {
        Self {
            name: name.into(),
            value_type,
            items: None,
            default: Some(default),
        }
    }

    /// 配列要素の型を設定
    pub fn with_items(mut self, items: Option<ValueType>) -> Self {
        self.items = items;
        self
    }

    /// 必須パラメータか
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// 説明文を自動生成するかどうかの三値フラグ
///
/// 「未指定」と「明示的に無効」は解決規則で異なる分岐をとるため、boolにはしない
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShouldGenerate {
    /// 未指定（ドキュメントコメントがなければ生成する）
    #[default]
    Unset,
    /// 常に生成する
    Enabled,
    /// 生成しない
    Disabled,
}

impl From<Option<bool>> for ShouldGenerate {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unset,
            Some(true) => Self::Enabled,
            Some(false) => Self::Disabled,
        }
    }
}

impl From<bool> for ShouldGenerate {
    fn from(value: bool) -> Self {
        Self::from(Some(value))
    }
}
