use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use domain::{object_url, AttachmentLinker, TodoError};
use shared::Config;
use std::time::Duration;
use tracing::{debug, error};

/// S3 バケットの添付ファイル URL を発行する
#[derive(Clone)]
pub struct S3AttachmentLinker {
    client: Client,
    bucket: String,
    expiration: Duration,
}

impl S3AttachmentLinker {
    pub fn new(client: Client, bucket: impl Into<String>, expiration_secs: u64) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            expiration: Duration::from_secs(expiration_secs),
        }
    }

    pub fn from_sdk_config(aws_config: &SdkConfig, config: &Config) -> Self {
        Self::new(
            Client::new(aws_config),
            &config.attachment_bucket,
            config.signed_url_expiration,
        )
    }
}

#[async_trait]
impl AttachmentLinker for S3AttachmentLinker {
    fn attachment_url(&self, attachment_id: &str) -> String {
        object_url(&self.bucket, attachment_id)
    }

    async fn upload_url(&self, attachment_id: &str) -> Result<String, TodoError> {
        let presigning = PresigningConfig::expires_in(self.expiration).map_err(|e| {
            error!("署名設定エラー: expiration={:?}, error={}", self.expiration, e);
            TodoError::Storage(e.to_string())
        })?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(attachment_id)
            .presigned(presigning)
            .await
            .map_err(|e| TodoError::Storage(DisplayErrorContext(&e).to_string()))?;

        debug!("アップロードURL発行完了: attachment_id={}", attachment_id);
        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

    fn offline_linker(expiration_secs: u64) -> S3AttachmentLinker {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new(
                "AKIDEXAMPLE",
                "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
                None,
                None,
                "test",
            ))
            .build();
        S3AttachmentLinker::new(
            Client::from_conf(config),
            "todo-attachments",
            expiration_secs,
        )
    }

    #[test]
    fn test_attachment_url_is_public_object_url() {
        let linker = offline_linker(300);

        assert_eq!(
            linker.attachment_url("t1"),
            "https://todo-attachments.s3.amazonaws.com/t1"
        );
    }

    #[tokio::test]
    async fn test_upload_url_is_signed_put() {
        let linker = offline_linker(300);

        let url = linker.upload_url("a1").await.unwrap();

        assert!(url.starts_with("https://"));
        assert!(url.contains("todo-attachments"));
        assert!(url.contains("/a1?"));
        assert!(url.contains("X-Amz-Expires=300"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn test_upload_url_rejects_expiration_over_one_week() {
        let linker = offline_linker(8 * 24 * 60 * 60);

        let error = linker.upload_url("a1").await.unwrap_err();

        assert!(matches!(error, TodoError::Storage(_)));
    }
}
