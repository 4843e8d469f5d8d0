//! `plugin_fn!` マクロ
//!
//! 通常の関数定義をそのまま残しつつ、同名のモジュールに `spec()` を生成する。
//! `spec()` はパラメータ記述子・戻り値の型・ドキュメントコメント・ソーステキスト（ドキュメントコメントを除く）と
//! JSON引数用のハンドラーをまとめた [`FunctionSpec`](crate::FunctionSpec) を返す。

/// 関数を登録可能な [`FunctionSpec`](crate::FunctionSpec) として宣言する
///
/// パラメータに `= 式` を付けるとデフォルト値付きの省略可能パラメータになる。
/// 戻り値は `Serialize` を実装している必要がある。
/// 生成されるモジュールは `super::` で関数を参照するため、モジュールのトップレベルで使うこと。
///
/// ```ignore
/// autoplugin::plugin_fn! {
///     /// Add two numbers together.
///     pub fn add(a: i64, b: i64) -> i64 {
///         a + b
///     }
/// }
///
/// let spec = add::spec();
/// assert_eq!(spec.name(), "add");
/// ```
#[macro_export]
macro_rules! plugin_fn {
    (
        $(#[doc = $doc:literal])*
        $vis:vis async fn $name:ident ( $( $param:ident : $ty:ty $(= $default:expr)? ),* $(,)? )
            $(-> $ret:ty)? $body:block
    ) => {
        $(#[doc = $doc])*
        $vis async fn $name( $( $param : $ty ),* ) $(-> $ret)? $body

        #[allow(dead_code)]
        $vis mod $name {
            #[allow(unused_imports)]
            use super::*;

            /// 登録用の関数記述
            #[allow(unused_mut)]
            pub fn spec() -> $crate::FunctionSpec {
                $crate::FunctionSpec::new(
                    stringify!($name),
                    |mut args: $crate::__private::Map<::std::string::String, $crate::__private::Value>| async move {
                        $( let $param: $ty = $crate::plugin_fn!(@arg args, $param : $ty $(= $default)?); )*
                        let output = super::$name( $( $param ),* ).await;
                        $crate::__private::result_value(&output)
                    },
                )
                $( .param($crate::__private::param::<$ty>(
                    stringify!($param),
                    $crate::plugin_fn!(@default $ty $(= $default)?),
                )) )*
                .returns($crate::plugin_fn!(@return_type $($ret)?))
                .doc_lines(&[$($doc),*])
                .source(stringify!($vis async fn $name( $( $param : $ty ),* ) $(-> $ret)? $body))
            }
        }
    };

    (
        $(#[doc = $doc:literal])*
        $vis:vis fn $name:ident ( $( $param:ident : $ty:ty $(= $default:expr)? ),* $(,)? )
            $(-> $ret:ty)? $body:block
    ) => {
        $(#[doc = $doc])*
        $vis fn $name( $( $param : $ty ),* ) $(-> $ret)? $body

        #[allow(dead_code)]
        $vis mod $name {
            #[allow(unused_imports)]
            use super::*;

            /// 登録用の関数記述
            #[allow(unused_mut)]
            pub fn spec() -> $crate::FunctionSpec {
                $crate::FunctionSpec::new(
                    stringify!($name),
                    |mut args: $crate::__private::Map<::std::string::String, $crate::__private::Value>| async move {
                        $( let $param: $ty = $crate::plugin_fn!(@arg args, $param : $ty $(= $default)?); )*
                        let output = super::$name( $( $param ),* );
                        $crate::__private::result_value(&output)
                    },
                )
                $( .param($crate::__private::param::<$ty>(
                    stringify!($param),
                    $crate::plugin_fn!(@default $ty $(= $default)?),
                )) )*
                .returns($crate::plugin_fn!(@return_type $($ret)?))
                .doc_lines(&[$($doc),*])
                .source(stringify!($vis fn $name( $( $param : $ty ),* ) $(-> $ret)? $body))
            }
        }
    };

    (@arg $args:ident, $param:ident : $ty:ty = $default:expr) => {
        match $crate::__private::take_arg::<$ty>(&mut $args, stringify!($param))? {
            Some(value) => value,
            None => $default,
        }
    };

    (@arg $args:ident, $param:ident : $ty:ty) => {
        match $crate::__private::take_arg::<$ty>(&mut $args, stringify!($param))? {
            Some(value) => value,
            None => {
                return Err($crate::HandlerError::MissingParameter(
                    stringify!($param).to_string(),
                ))
            }
        }
    };

    (@default $ty:ty = $default:expr) => {
        Some($crate::__private::default_value::<$ty>($default))
    };

    (@default $ty:ty) => {
        None
    };

    (@return_type $ret:ty) => {
        $crate::__private::return_type::<$ret>()
    };

    (@return_type) => {
        $crate::ValueType::Null
    };
}
