//! autoplugin 共通型
//!
//! エラー型・設定・エンドポイント記述に使うデータ型

#![warn(missing_docs)]

/// 設定構造体
pub mod config;

/// エラー型
pub mod error;

/// コアデータ型
pub mod types;
