//! プロセス内で完結する `TodoStore` / `AttachmentLinker` の実装（ローカル実行・テスト用）

use crate::attachment::object_url;
use crate::{AttachmentLinker, TodoError, TodoItem, TodoStore, TodoUpdate};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

type Key = (String, String);

/// HashMap ベースの簡易ストア
#[derive(Default)]
pub struct InMemoryTodoStore {
    items: Mutex<HashMap<Key, TodoItem>>,
    // 設定されている間は全操作がこのエラーで失敗する
    failure: Mutex<Option<TodoError>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// バックエンド障害を模擬する（`None` で解除）
    pub fn set_failure(&self, failure: Option<TodoError>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = failure;
    }

    /// 保存済みレコード数
    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // テスト中の panic でロックが汚染されても中身はそのまま使う
    fn items(&self) -> MutexGuard<'_, HashMap<Key, TodoItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_failure(&self) -> Result<(), TodoError> {
        let failure = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        failure.map_or(Ok(()), Err)
    }

    fn key(user_id: &str, todo_id: &str) -> Key {
        (user_id.to_string(), todo_id.to_string())
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn get_item(&self, user_id: &str, todo_id: &str) -> Result<Option<TodoItem>, TodoError> {
        self.check_failure()?;
        let items = self.items();
        Ok(items.get(&Self::key(user_id, todo_id)).cloned())
    }

    async fn list_items(&self, user_id: &str) -> Result<Vec<TodoItem>, TodoError> {
        self.check_failure()?;
        let items = self.items();
        Ok(items
            .values()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_item(&self, item: TodoItem) -> Result<TodoItem, TodoError> {
        self.check_failure()?;
        let key = Self::key(&item.user_id, &item.todo_id);
        self.items().insert(key, item.clone());
        Ok(item)
    }

    async fn update_item(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> Result<(), TodoError> {
        self.check_failure()?;
        let mut items = self.items();
        if let Some(item) = items.get_mut(&Self::key(user_id, todo_id)) {
            item.name = update.name.clone();
            item.due_date = update.due_date.clone();
            item.done = update.done;
        }
        Ok(())
    }

    async fn delete_item(&self, user_id: &str, todo_id: &str) -> Result<(), TodoError> {
        self.check_failure()?;
        self.items().remove(&Self::key(user_id, todo_id));
        Ok(())
    }

    async fn update_attachment_url(
        &self,
        user_id: &str,
        todo_id: &str,
        attachment_url: &str,
    ) -> Result<(), TodoError> {
        self.check_failure()?;
        let mut items = self.items();
        if let Some(item) = items.get_mut(&Self::key(user_id, todo_id)) {
            item.attachment_url = attachment_url.to_string();
        }
        Ok(())
    }
}

/// 署名を行わず決定的な URL を返すリンカー
#[derive(Debug, Clone)]
pub struct StaticAttachmentLinker {
    bucket: String,
    expiration_secs: u64,
}

impl StaticAttachmentLinker {
    pub fn new(bucket: impl Into<String>, expiration_secs: u64) -> Self {
        Self {
            bucket: bucket.into(),
            expiration_secs,
        }
    }
}

#[async_trait]
impl AttachmentLinker for StaticAttachmentLinker {
    fn attachment_url(&self, attachment_id: &str) -> String {
        object_url(&self.bucket, attachment_id)
    }

    async fn upload_url(&self, attachment_id: &str) -> Result<String, TodoError> {
        Ok(format!(
            "{}?X-Amz-Expires={}",
            object_url(&self.bucket, attachment_id),
            self.expiration_secs
        ))
    }
}
