use aws_sdk_dynamodb::types::AttributeValue;
use domain::TodoItem;
use std::collections::HashMap;

/// ToDo テーブルの属性名
pub mod attributes {
    pub const USER_ID: &str = "userId";
    pub const TODO_ID: &str = "todoId";
    pub const CREATED_AT: &str = "createdAt";
    pub const NAME: &str = "name";
    pub const DUE_DATE: &str = "dueDate";
    pub const DONE: &str = "done";
    pub const ATTACHMENT_URL: &str = "attachmentUrl";
}

pub type DynamoItem = HashMap<String, AttributeValue>;

/// 主キー `(userId, todoId)`
pub fn todo_key(user_id: &str, todo_id: &str) -> DynamoItem {
    HashMap::from([
        (
            attributes::USER_ID.to_string(),
            AttributeValue::S(user_id.to_string()),
        ),
        (
            attributes::TODO_ID.to_string(),
            AttributeValue::S(todo_id.to_string()),
        ),
    ])
}

/// TodoItem を DynamoDB アイテムに変換（dueDate が無ければ属性を持たない）
pub fn todo_to_item(todo: &TodoItem) -> DynamoItem {
    let mut item = todo_key(&todo.user_id, &todo.todo_id);
    item.insert(
        attributes::CREATED_AT.to_string(),
        AttributeValue::S(todo.created_at.clone()),
    );
    item.insert(
        attributes::NAME.to_string(),
        AttributeValue::S(todo.name.clone()),
    );
    if let Some(due_date) = &todo.due_date {
        item.insert(
            attributes::DUE_DATE.to_string(),
            AttributeValue::S(due_date.clone()),
        );
    }
    item.insert(attributes::DONE.to_string(), AttributeValue::Bool(todo.done));
    item.insert(
        attributes::ATTACHMENT_URL.to_string(),
        AttributeValue::S(todo.attachment_url.clone()),
    );
    item
}

/// DynamoDB アイテムを TodoItem に変換（必須属性が欠けていれば `None`）
pub fn item_to_todo(item: &DynamoItem) -> Option<TodoItem> {
    let string = |name: &str| item.get(name)?.as_s().ok().cloned();

    Some(TodoItem {
        user_id: string(attributes::USER_ID)?,
        todo_id: string(attributes::TODO_ID)?,
        created_at: string(attributes::CREATED_AT)?,
        name: string(attributes::NAME)?,
        due_date: string(attributes::DUE_DATE),
        done: item
            .get(attributes::DONE)
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        attachment_url: string(attributes::ATTACHMENT_URL).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_todo(due_date: Option<&str>) -> TodoItem {
        TodoItem {
            user_id: "u1".to_string(),
            todo_id: "t1".to_string(),
            created_at: "2024-05-01T10:00:00.000Z".to_string(),
            name: "Buy milk".to_string(),
            due_date: due_date.map(str::to_string),
            done: true,
            attachment_url: "https://bucket.s3.amazonaws.com/t1".to_string(),
        }
    }

    #[test]
    fn test_todo_to_item_attribute_names() {
        let item = todo_to_item(&sample_todo(Some("2024-05-10")));

        assert_eq!(item.get("userId"), Some(&AttributeValue::S("u1".to_string())));
        assert_eq!(item.get("todoId"), Some(&AttributeValue::S("t1".to_string())));
        assert_eq!(
            item.get("dueDate"),
            Some(&AttributeValue::S("2024-05-10".to_string()))
        );
        assert_eq!(item.get("done"), Some(&AttributeValue::Bool(true)));
        assert_eq!(
            item.get("attachmentUrl"),
            Some(&AttributeValue::S("https://bucket.s3.amazonaws.com/t1".to_string()))
        );
        assert_eq!(item.len(), 7);
    }

    #[test]
    fn test_todo_without_due_date_omits_attribute() {
        let todo = sample_todo(None);
        let item = todo_to_item(&todo);

        assert!(!item.contains_key("dueDate"));
        assert_eq!(item_to_todo(&item), Some(todo));
    }

    #[test]
    fn test_item_missing_required_attribute() {
        let mut item = todo_to_item(&sample_todo(None));
        item.remove("name");

        assert_eq!(item_to_todo(&item), None);
    }

    #[test]
    fn test_item_with_wrong_type_is_rejected() {
        let mut item = todo_to_item(&sample_todo(None));
        item.insert("userId".to_string(), AttributeValue::N("1".to_string()));

        assert_eq!(item_to_todo(&item), None);
    }
}
