//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// 関数呼び出しの失敗
#[derive(Debug, Error)]
pub enum HandlerError {
    /// リクエストボディがJSONオブジェクトとして解釈できない
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    /// 必須パラメータが与えられていない
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// パラメータを宣言された型に変換できない
    #[error("Invalid value for parameter `{name}`: {reason}")]
    InvalidParameter {
        /// パラメータ名
        name: String,
        /// 変換に失敗した理由
        reason: String,
    },

    /// 関数本体または戻り値のエンコードで発生したエラー
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// HTTPステータスコード
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::MissingParameter(_) | HandlerError::InvalidParameter { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 外部に返すメッセージ（内部エラーの詳細は含めない）
    pub fn external_message(&self) -> String {
        match self {
            HandlerError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        if let HandlerError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Function call failed");
        }

        let payload = json!({
            "error": self.external_message()
        });

        (self.status(), Json(payload)).into_response()
    }
}
