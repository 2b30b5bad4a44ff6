use crate::{TodoError, TodoItem, TodoUpdate};
use async_trait::async_trait;

/// ToDo テーブルへのアクセス抽象
///
/// 実装はバックエンドのエラーをリトライせずそのまま返す。
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn item_exists(&self, user_id: &str, todo_id: &str) -> Result<bool, TodoError> {
        Ok(self.get_item(user_id, todo_id).await?.is_some())
    }

    /// 主キーで 1 件取得（存在しなければ `None`）
    async fn get_item(&self, user_id: &str, todo_id: &str) -> Result<Option<TodoItem>, TodoError>;

    /// ユーザーの ToDo をセカンダリインデックス経由で全件取得（順序は不定）
    async fn list_items(&self, user_id: &str) -> Result<Vec<TodoItem>, TodoError>;

    /// 無条件に保存する。同じキーのレコードは上書きされる。
    async fn create_item(&self, item: TodoItem) -> Result<TodoItem, TodoError>;

    /// name / dueDate / done を更新する。キーが存在しなければ何もしない。
    async fn update_item(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> Result<(), TodoError>;

    /// 削除する。存在しなくてもエラーにしない。
    async fn delete_item(&self, user_id: &str, todo_id: &str) -> Result<(), TodoError>;

    /// attachmentUrl のみ更新する。キーが存在しなければ何もしない。
    async fn update_attachment_url(
        &self,
        user_id: &str,
        todo_id: &str,
        attachment_url: &str,
    ) -> Result<(), TodoError>;
}
