//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! 登録・説明文解決・マニフェスト生成で発生するエラーはすべて呼び出し元へ伝播する。
//! 失敗した登録を部分的に成功扱いにすることはない。

use std::path::PathBuf;
use thiserror::Error;

/// A single manifest document that could not be written.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct DocumentWriteError {
    /// Target path of the document (or the output directory)
    pub path: PathBuf,
    /// Underlying I/O failure
    #[source]
    pub source: std::io::Error,
}

/// Plugin error type
#[derive(Debug, Error)]
pub enum PluginError {
    /// Invalid registration or manifest arguments
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Description generation was disabled and no other description exists
    #[error(
        "No description available for `{function}`: pass a description, add a doc comment, \
         or allow description generation"
    )]
    MissingDescription {
        /// Function identifier
        function: String,
    },

    /// Description generation is required but the capability is missing
    #[error(
        "Description generation unavailable for `{function}`: {missing} is missing. \
         Otherwise, disable generation when registering the function"
    )]
    GenerationUnavailable {
        /// Function identifier
        function: String,
        /// Missing dependency or credential
        missing: String,
    },

    /// The text-generation call failed
    #[error("Description generation failed for `{function}`: {reason}")]
    Generation {
        /// Function identifier
        function: String,
        /// Failure detail
        reason: String,
    },

    /// One or more manifest documents could not be written
    #[error("Failed to write manifest documents: {}", format_write_errors(.0))]
    ManifestWrite(Vec<DocumentWriteError>),

    /// Document encoding error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Listener or socket error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_write_errors(errors: &[DocumentWriteError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for PluginError {
    fn from(err: serde_json::Error) -> Self {
        PluginError::Serialization(err.to_string())
    }
}

/// Result type alias (Plugin)
pub type PluginResult<T> = Result<T, PluginError>;
