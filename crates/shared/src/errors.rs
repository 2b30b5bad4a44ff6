use crate::config::ConfigError;
use domain::{ErrorKind, TodoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// リクエスト処理境界で使用されるエラー型
#[derive(Debug, Clone, Error)]
pub enum AppError {
    // ドメインエラー
    #[error("Domain error: {0}")]
    Domain(#[from] TodoError),

    // 認証エラー
    #[error("Authentication failed: {0}")]
    Authentication(String),

    // 入力エラー
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Route not found: {0}")]
    RouteNotFound(String),

    // システムエラー
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Configuration(error.to_string())
    }
}

impl AppError {
    /// エラーコードを取得
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Domain(error) => match error.kind() {
                ErrorKind::NotFound => "NOT_FOUND",
                ErrorKind::Forbidden => "FORBIDDEN",
                ErrorKind::Backend => "BACKEND_ERROR",
            },
            AppError::Authentication(_) => "AUTHENTICATION_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Deserialization(_) => "INVALID_REQUEST_BODY",
            AppError::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// HTTPステータスコードを取得
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Domain(error) => match error.kind() {
                ErrorKind::NotFound => 404,
                ErrorKind::Forbidden => 403,
                ErrorKind::Backend => 500,
            },
            AppError::Authentication(_) => 401,
            AppError::Validation(_) | AppError::Deserialization(_) => 400,
            AppError::RouteNotFound(_) => 404,
            AppError::Configuration(_) | AppError::Serialization(_) => 500,
        }
    }

    /// サーバー側の障害かどうか（詳細はログにのみ出す）
    pub fn is_server_error(&self) -> bool {
        self.http_status_code() >= 500
    }

    /// クライアント向けメッセージを取得
    pub fn user_message(&self) -> String {
        match self {
            AppError::Domain(error) if !self.is_server_error() => error.message().to_string(),
            AppError::Authentication(_) => "Unauthorized".to_string(),
            AppError::Validation(msg) | AppError::Deserialization(msg) => msg.clone(),
            AppError::RouteNotFound(_) => "Not found".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

/// 標準化されたエラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// エラーコード
    pub code: String,
    /// クライアント向けメッセージ
    pub message: String,
    /// リクエストID
    pub request_id: String,
    /// タイムスタンプ
    pub timestamp: String,
}

impl ErrorResponse {
    /// AppErrorからErrorResponseを作成
    pub fn from_app_error(error: &AppError, request_id: Option<String>) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.user_message(),
            request_id: request_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self).map_err(|e| AppError::Serialization(e.to_string()))
    }
}
