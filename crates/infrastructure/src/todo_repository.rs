use crate::models::{attributes, item_to_todo, todo_key, todo_to_item, DynamoItem};
use crate::{dynamodb_error, DynamoDbClient};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use domain::{TodoError, TodoItem, TodoStore, TodoUpdate};
use tracing::{debug, error, info};

/// 更新系の条件式。存在しないキーへの更新でレコードを作らないため。
const ITEM_EXISTS_CONDITION: &str = "attribute_exists(todoId)";

/// DynamoDB 上の ToDo テーブル
///
/// 主キーは `(userId, todoId)`、一覧取得は `userId` をキーとするセカンダリインデックスを使う。
#[derive(Clone)]
pub struct DynamoTodoStore {
    db: DynamoDbClient,
    page_limit: Option<i32>,
}

impl DynamoTodoStore {
    pub fn new(db: DynamoDbClient) -> Self {
        Self {
            db,
            page_limit: None,
        }
    }

    /// 一覧取得の 1 ページあたりの最大件数（未指定なら DynamoDB の既定値）
    pub fn with_page_limit(mut self, limit: i32) -> Self {
        self.page_limit = Some(limit);
        self
    }
}

#[async_trait]
impl TodoStore for DynamoTodoStore {
    async fn get_item(&self, user_id: &str, todo_id: &str) -> Result<Option<TodoItem>, TodoError> {
        info!(
            "ToDoを取得中: table={}, user_id={}, todo_id={}",
            self.db.table_name(),
            user_id,
            todo_id
        );

        let result = self
            .db
            .client()
            .get_item()
            .table_name(self.db.table_name())
            .set_key(Some(todo_key(user_id, todo_id)))
            .send()
            .await
            .map_err(dynamodb_error)?;

        match result.item {
            Some(item) => match item_to_todo(&item) {
                Some(todo) => Ok(Some(todo)),
                None => {
                    error!("ToDoデータが無効です: todo_id={}", todo_id);
                    Err(TodoError::DynamoDb(format!(
                        "Invalid todo item: {user_id}/{todo_id}"
                    )))
                }
            },
            None => {
                debug!("ToDoが見つかりません: todo_id={}", todo_id);
                Ok(None)
            }
        }
    }

    async fn list_items(&self, user_id: &str) -> Result<Vec<TodoItem>, TodoError> {
        info!(
            "ToDo一覧を取得中: index={}, user_id={}",
            self.db.index_name(),
            user_id
        );

        let mut todos = Vec::new();
        let mut start_key: Option<DynamoItem> = None;

        loop {
            let result = self
                .db
                .client()
                .query()
                .table_name(self.db.table_name())
                .index_name(self.db.index_name())
                .key_condition_expression("userId = :userId")
                .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
                .set_exclusive_start_key(start_key.take())
                .set_limit(self.page_limit)
                .send()
                .await
                .map_err(dynamodb_error)?;

            for item in result.items.unwrap_or_default() {
                match item_to_todo(&item) {
                    Some(todo) => todos.push(todo),
                    None => error!("ToDo変換エラー: user_id={}", user_id),
                }
            }

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!("ToDo一覧取得完了: {} 件", todos.len());
        Ok(todos)
    }

    async fn create_item(&self, item: TodoItem) -> Result<TodoItem, TodoError> {
        info!(
            "ToDoを保存中: user_id={}, todo_id={}",
            item.user_id, item.todo_id
        );

        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(todo_to_item(&item)))
            .send()
            .await
            .map_err(dynamodb_error)?;

        debug!("ToDo保存完了: {}", item.todo_id);
        Ok(item)
    }

    async fn update_item(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> Result<(), TodoError> {
        info!("ToDoを更新中: user_id={}, todo_id={}", user_id, todo_id);

        let mut request = self
            .db
            .client()
            .update_item()
            .table_name(self.db.table_name())
            .set_key(Some(todo_key(user_id, todo_id)))
            .condition_expression(ITEM_EXISTS_CONDITION)
            .expression_attribute_names("#name", attributes::NAME)
            .expression_attribute_values(":name", AttributeValue::S(update.name.clone()))
            .expression_attribute_values(":done", AttributeValue::Bool(update.done));

        let expression = match &update.due_date {
            Some(due_date) => {
                request = request
                    .expression_attribute_values(":dueDate", AttributeValue::S(due_date.clone()));
                "SET #name = :name, dueDate = :dueDate, done = :done"
            }
            None => "SET #name = :name, done = :done REMOVE dueDate",
        };

        match request.update_expression(expression).send().await {
            Ok(_) => {
                debug!("ToDo更新完了: {}", todo_id);
                Ok(())
            }
            Err(SdkError::ServiceError(e)) if e.err().is_conditional_check_failed_exception() => {
                debug!("更新対象のToDoが存在しません: todo_id={}", todo_id);
                Ok(())
            }
            Err(e) => Err(dynamodb_error(e)),
        }
    }

    async fn delete_item(&self, user_id: &str, todo_id: &str) -> Result<(), TodoError> {
        info!(
            "ToDoを削除中: table={}, user_id={}, todo_id={}",
            self.db.table_name(),
            user_id,
            todo_id
        );

        self.db
            .client()
            .delete_item()
            .table_name(self.db.table_name())
            .set_key(Some(todo_key(user_id, todo_id)))
            .send()
            .await
            .map_err(dynamodb_error)?;

        debug!("ToDo削除完了: {}", todo_id);
        Ok(())
    }

    async fn update_attachment_url(
        &self,
        user_id: &str,
        todo_id: &str,
        attachment_url: &str,
    ) -> Result<(), TodoError> {
        info!(
            "添付URLを更新中: table={}, todo_id={}",
            self.db.table_name(),
            todo_id
        );

        let result = self
            .db
            .client()
            .update_item()
            .table_name(self.db.table_name())
            .set_key(Some(todo_key(user_id, todo_id)))
            .condition_expression(ITEM_EXISTS_CONDITION)
            .update_expression("SET attachmentUrl = :attachmentUrl")
            .expression_attribute_values(
                ":attachmentUrl",
                AttributeValue::S(attachment_url.to_string()),
            )
            .send()
            .await;

        match result {
            Ok(_) => {
                debug!("添付URL更新完了: {}", todo_id);
                Ok(())
            }
            Err(SdkError::ServiceError(e)) if e.err().is_conditional_check_failed_exception() => {
                debug!("更新対象のToDoが存在しません: todo_id={}", todo_id);
                Ok(())
            }
            Err(e) => Err(dynamodb_error(e)),
        }
    }
}
