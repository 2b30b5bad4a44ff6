use aws_config::SdkConfig;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::Client;
use domain::TodoError;
use shared::Config;
use tracing::info;

/// DynamoDB クライアントと ToDo テーブルの設定
#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DynamoDbClient {
    /// 読み込み済みの SdkConfig から作成（DYNAMODB_ENDPOINT があれば上書き）
    pub fn from_sdk_config(aws_config: &SdkConfig, config: &Config) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(aws_config);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            info!("DynamoDBエンドポイントを上書き: {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }

        Self::with_client(
            Client::from_conf(builder.build()),
            &config.todos_table,
            &config.todos_index,
        )
    }

    pub fn with_client(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }
}

/// SDK のエラーを詳細付きで `TodoError::DynamoDb` に変換
pub fn dynamodb_error<E, R>(err: SdkError<E, R>) -> TodoError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    TodoError::DynamoDb(DisplayErrorContext(&err).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::{BehaviorVersion, Region};

    fn sample_config(endpoint: Option<&str>) -> Config {
        Config {
            todos_table: "Todos-dev".to_string(),
            todos_index: "UserIdIndex".to_string(),
            attachment_bucket: "todo-attachments".to_string(),
            signed_url_expiration: 300,
            environment: "dev".to_string(),
            aws_region: "ap-northeast-1".to_string(),
            dynamodb_endpoint: endpoint.map(str::to_string),
        }
    }

    #[test]
    fn test_client_uses_shared_sdk_config_region() {
        let aws_config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("ap-northeast-1"))
            .build();

        let db = DynamoDbClient::from_sdk_config(
            &aws_config,
            &sample_config(Some("http://localhost:8000")),
        );

        assert_eq!(db.table_name(), "Todos-dev");
        assert_eq!(db.index_name(), "UserIdIndex");
        assert_eq!(
            db.client().config().region(),
            Some(&Region::new("ap-northeast-1"))
        );
    }
}
