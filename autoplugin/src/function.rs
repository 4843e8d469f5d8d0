//! 登録対象の関数
//!
//! `FunctionSpec` は関数の識別情報（名前・パラメータ・戻り値の型・ドキュメントコメント・
//! ソーステキスト）と、JSON引数を受け取る型消去済みハンドラーをまとめたもの。
//! 通常は `plugin_fn!` マクロで生成する。

use crate::api::error::HandlerError;
use autoplugin_common::types::{ParamDescriptor, ValueType};
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;

/// ハンドラーが返すFuture
pub type HandlerFuture = BoxFuture<'static, Result<Value, HandlerError>>;

/// 型消去済みハンドラー
///
/// パラメータ名をキーとするJSONオブジェクトを受け取り、戻り値をJSONで返す
pub type Handler = Arc<dyn Fn(Map<String, Value>) -> HandlerFuture + Send + Sync>;

/// Rustの型から意味的な型（JSON Schemaの型）を得る
pub trait TypeDescriptor {
    /// 値の型
    fn value_type() -> ValueType;

    /// 配列要素の型（配列でなければ `None`）
    fn item_type() -> Option<ValueType> {
        None
    }
}

macro_rules! impl_type_descriptor {
    ($value_type:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl TypeDescriptor for $ty {
                fn value_type() -> ValueType {
                    $value_type
                }
            }
        )+
    };
}

impl_type_descriptor!(ValueType::Integer => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_type_descriptor!(ValueType::Number => f32, f64);
impl_type_descriptor!(ValueType::String => String, &str, char);
impl_type_descriptor!(ValueType::Boolean => bool);
impl_type_descriptor!(ValueType::Object => Value, Map<String, Value>);
impl_type_descriptor!(ValueType::Null => ());

impl<T: TypeDescriptor> TypeDescriptor for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::Array
    }

    fn item_type() -> Option<ValueType> {
        Some(T::value_type())
    }
}

impl<T: TypeDescriptor> TypeDescriptor for Option<T> {
    fn value_type() -> ValueType {
        T::value_type()
    }

    fn item_type() -> Option<ValueType> {
        T::item_type()
    }
}

impl<T> TypeDescriptor for HashMap<String, T> {
    fn value_type() -> ValueType {
        ValueType::Object
    }
}

impl<T> TypeDescriptor for BTreeMap<String, T> {
    fn value_type() -> ValueType {
        ValueType::Object
    }
}

/// 登録対象の関数
#[derive(Clone)]
pub struct FunctionSpec {
    name: String,
    params: Vec<ParamDescriptor>,
    return_type: ValueType,
    doc_comment: Option<String>,
    source_text: Option<String>,
    handler: Handler,
}

impl FunctionSpec {
    /// 関数名とハンドラーから作成
    ///
    /// パラメータ・戻り値の型・ドキュメントコメント・ソーステキストはビルダーで追加する
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |args| -> HandlerFuture { Box::pin(handler(args)) });
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: ValueType::Object,
            doc_comment: None,
            source_text: None,
            handler,
        }
    }

    /// パラメータを宣言順に追加
    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// 戻り値の型を設定
    pub fn returns(mut self, return_type: ValueType) -> Self {
        self.return_type = return_type;
        self
    }

    /// ドキュメントコメントを設定
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        let doc = doc.into();
        self.doc_comment = if doc.trim().is_empty() {
            None
        } else {
            Some(doc)
        };
        self
    }

    /// `#[doc = "..."]` 属性の行からドキュメントコメントを設定
    ///
    /// rustdocと同じく各行の先頭の空白1文字を取り除いて改行で連結する
    pub fn doc_lines(self, lines: &[&str]) -> Self {
        let doc = lines
            .iter()
            .map(|line| line.strip_prefix(' ').unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n");
        self.doc(doc)
    }

    /// ソーステキストを設定
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source_text = Some(source.into());
        self
    }

    /// 関数名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// パラメータ記述子（宣言順）
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// 戻り値の型
    pub fn return_type(&self) -> ValueType {
        self.return_type
    }

    /// ドキュメントコメント（未設定なら `None`）
    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    /// ソーステキスト（ドキュメントコメントは含まない）
    ///
    /// 未設定の場合はシグネチャから組み立てる
    pub fn source_text(&self) -> String {
        match &self.source_text {
            Some(source) => source.clone(),
            None => self.signature_text(),
        }
    }

    /// `name(a: integer, b: integer) -> integer` 形式のシグネチャ
    pub fn signature_text(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("{}: {} = {}", p.name, p.value_type, default),
                None => format!("{}: {}", p.name, p.value_type),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({}) -> {}", self.name, params, self.return_type)
    }

    /// ハンドラー
    pub fn handler(&self) -> Handler {
        self.handler.clone()
    }

    /// ハンドラーを呼び出す
    pub async fn call(&self, args: Map<String, Value>) -> Result<Value, HandlerError> {
        (self.handler)(args).await
    }
}

impl std::fmt::Debug for FunctionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("doc_comment", &self.doc_comment)
            .finish_non_exhaustive()
    }
}

/// `plugin_fn!` マクロ展開用のヘルパー
#[doc(hidden)]
pub mod __private {
    use super::TypeDescriptor;
    use crate::api::error::HandlerError;
    use autoplugin_common::types::{ParamDescriptor, ValueType};
    use serde::{de::DeserializeOwned, Serialize};
    pub use serde_json::{Map, Value};

    /// 型からパラメータ記述子を作成する
    pub fn param<T: TypeDescriptor>(name: &str, default: Option<Value>) -> ParamDescriptor {
        let descriptor = match default {
            Some(default) => ParamDescriptor::optional(name, T::value_type(), default),
            None => ParamDescriptor::required(name, T::value_type()),
        };
        descriptor.with_items(T::item_type())
    }

    /// 戻り値の型
    pub fn return_type<T: TypeDescriptor>() -> ValueType {
        T::value_type()
    }

    /// 引数オブジェクトからパラメータを取り出してデシリアライズする
    pub fn take_arg<T: DeserializeOwned>(
        args: &mut Map<String, Value>,
        name: &str,
    ) -> Result<Option<T>, HandlerError> {
        match args.remove(name) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                HandlerError::InvalidParameter {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }

    /// デフォルト値をJSONに変換する
    pub fn default_value<T: Serialize>(value: T) -> Value {
        serde_json::to_value(value).unwrap_or(Value::Null)
    }

    /// 戻り値をJSONに変換する
    pub fn result_value<T: Serialize>(value: &T) -> Result<Value, HandlerError> {
        serde_json::to_value(value).map_err(|e| HandlerError::Internal(e.to_string()))
    }
}
