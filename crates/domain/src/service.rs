use crate::{
    current_timestamp, AttachmentLinker, CreateTodoRequest, TodoError, TodoId, TodoItem,
    TodoStore, TodoUpdate,
};
use std::sync::Arc;
use tracing::{info, warn};

/// ToDo のユースケース層
/// 所有者チェックを行い、ストアと添付リンカーを組み合わせる
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    linker: Arc<dyn AttachmentLinker>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, linker: Arc<dyn AttachmentLinker>) -> Self {
        Self { store, linker }
    }

    /// ユーザーの ToDo 一覧を取得する
    pub async fn get_todos_for_user(&self, user_id: &str) -> Result<Vec<TodoItem>, TodoError> {
        info!("ToDo一覧を取得中: user_id={}", user_id);

        self.store.list_items(user_id).await
    }

    /// ToDo を作成する
    ///
    /// ID は UUID v4 で採番し、衝突チェックは行わない。
    /// 添付 URL は ToDo の ID 自体をキーとして導出する。
    pub async fn create_todo(
        &self,
        request: CreateTodoRequest,
        user_id: &str,
    ) -> Result<TodoItem, TodoError> {
        let todo_id = TodoId::new().into_string();
        info!("ToDoを作成中: user_id={}, todo_id={}", user_id, todo_id);

        let item = TodoItem {
            user_id: user_id.to_string(),
            attachment_url: self.linker.attachment_url(&todo_id),
            todo_id,
            created_at: current_timestamp(),
            name: request.name,
            due_date: request.due_date,
            done: false,
        };

        self.store.create_item(item).await
    }

    /// ToDo を更新する（name / dueDate / done）
    pub async fn update_todo(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> Result<(), TodoError> {
        info!(
            "ToDoを更新中: user_id={}, todo_id={}, update={:?}",
            user_id, todo_id, update
        );

        self.ensure_owner(user_id, todo_id, "User is not authorized to update item")
            .await?;

        self.store.update_item(user_id, todo_id, update).await
    }

    /// ToDo を削除する
    pub async fn delete_todo(&self, user_id: &str, todo_id: &str) -> Result<(), TodoError> {
        info!("ToDoを削除中: user_id={}, todo_id={}", user_id, todo_id);

        self.ensure_owner(user_id, todo_id, "User is not authorized to delete item!")
            .await?;

        self.store.delete_item(user_id, todo_id).await
    }

    /// アップロード済みの添付ファイルを ToDo に紐付ける
    pub async fn update_attachment_url(
        &self,
        user_id: &str,
        todo_id: &str,
        attachment_id: &str,
    ) -> Result<(), TodoError> {
        let attachment_url = self.linker.attachment_url(attachment_id);
        info!(
            "添付URLを更新中: user_id={}, todo_id={}, attachment_url={}",
            user_id, todo_id, attachment_url
        );

        self.ensure_owner(user_id, todo_id, "User is not authorized to update item!")
            .await?;

        self.store
            .update_attachment_url(user_id, todo_id, &attachment_url)
            .await
    }

    /// 添付ファイルのアップロード用署名 URL を発行する
    ///
    /// この層では認可を行わない。ToDo との紐付けは呼び出し側が
    /// `update_attachment_url` で行う。
    pub async fn create_attachment_presigned_url(
        &self,
        attachment_id: &str,
    ) -> Result<String, TodoError> {
        info!("アップロードURLを発行中: attachment_id={}", attachment_id);

        self.linker.upload_url(attachment_id).await
    }

    /// 存在確認 → 所有者確認の順にチェックする
    async fn ensure_owner(
        &self,
        user_id: &str,
        todo_id: &str,
        forbidden_message: &str,
    ) -> Result<TodoItem, TodoError> {
        let item = self
            .store
            .get_item(user_id, todo_id)
            .await?
            .ok_or_else(TodoError::not_found)?;

        if !item.is_owned_by(user_id) {
            warn!(
                "所有者以外による操作を拒否: user_id={}, todo_id={}, owner={}",
                user_id, todo_id, item.user_id
            );
            return Err(TodoError::forbidden(forbidden_message));
        }

        Ok(item)
    }
}
