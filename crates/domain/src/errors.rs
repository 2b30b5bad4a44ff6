use thiserror::Error;

/// 境界層（HTTP など）がステータスコードへ写像するためのエラー種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 対象の ToDo が存在しない（404 相当）
    NotFound,
    /// 所有者以外による操作（403 相当）
    Forbidden,
    /// DynamoDB / S3 などバックエンド起因の失敗
    Backend,
}

#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("S3 error: {0}")]
    Storage(String),
}

impl TodoError {
    pub const NOT_FOUND_MESSAGE: &'static str = "Todo item not found!";

    /// 存在しない ToDo に対するエラー
    pub fn not_found() -> Self {
        TodoError::NotFound(Self::NOT_FOUND_MESSAGE.to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        TodoError::Forbidden(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TodoError::NotFound(_) => ErrorKind::NotFound,
            TodoError::Forbidden(_) => ErrorKind::Forbidden,
            TodoError::DynamoDb(_) | TodoError::Storage(_) => ErrorKind::Backend,
        }
    }

    /// エラーメッセージ本体（Display のプレフィックスを含まない）
    pub fn message(&self) -> &str {
        match self {
            TodoError::NotFound(msg)
            | TodoError::Forbidden(msg)
            | TodoError::DynamoDb(msg)
            | TodoError::Storage(msg) => msg,
        }
    }
}
