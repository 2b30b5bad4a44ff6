use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ToDo の識別子（UUID v4）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 永続化される ToDo レコード
///
/// `(user_id, todo_id)` が主キー。`user_id` と `todo_id` は作成後に変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub user_id: String,
    pub todo_id: String,
    pub created_at: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub done: bool,
    pub attachment_url: String,
}

impl TodoItem {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// ToDo 作成リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub name: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// ToDo の部分更新（name / dueDate / done のみ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    pub name: String,
    #[serde(default)]
    pub due_date: Option<String>,
    pub done: bool,
}

/// ISO-8601（ミリ秒精度・UTC `Z` 表記）の現在時刻
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_todo_id_is_uuid_v4() {
        let todo_id = TodoId::new();
        let parsed = uuid::Uuid::parse_str(todo_id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_ne!(TodoId::new(), todo_id);
    }

    #[test]
    fn test_todo_item_serializes_camel_case() {
        let item = TodoItem {
            user_id: "u1".to_string(),
            todo_id: "t1".to_string(),
            created_at: "2024-05-01T10:00:00.000Z".to_string(),
            name: "Buy milk".to_string(),
            due_date: None,
            done: false,
            attachment_url: "https://bucket.s3.amazonaws.com/t1".to_string(),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["todoId"], "t1");
        assert_eq!(json["createdAt"], "2024-05-01T10:00:00.000Z");
        assert_eq!(json["attachmentUrl"], "https://bucket.s3.amazonaws.com/t1");
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn test_update_without_due_date_deserializes() {
        let update: TodoUpdate = serde_json::from_str(r#"{"name":"X","done":true}"#).unwrap();
        assert_eq!(update.name, "X");
        assert_eq!(update.due_date, None);
        assert!(update.done);
    }

    #[test]
    fn test_current_timestamp_is_iso8601() {
        let timestamp = current_timestamp();
        assert!(timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&timestamp).is_ok());
    }
}
