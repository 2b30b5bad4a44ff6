use crate::TodoError;
use async_trait::async_trait;

/// 添付ファイルの URL を扱う抽象
#[async_trait]
pub trait AttachmentLinker: Send + Sync {
    /// 公開ダウンロード URL（副作用なし）
    fn attachment_url(&self, attachment_id: &str) -> String;

    /// 期限付きのアップロード（PUT）用署名 URL
    async fn upload_url(&self, attachment_id: &str) -> Result<String, TodoError>;
}

/// バケット内オブジェクトの公開 URL
pub fn object_url(bucket: &str, key: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_format() {
        assert_eq!(
            object_url("todo-attachments", "a1"),
            "https://todo-attachments.s3.amazonaws.com/a1"
        );
    }
}
