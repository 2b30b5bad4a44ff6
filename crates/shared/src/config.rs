use std::env;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub todos_table: String,
    pub todos_index: String,
    pub attachment_bucket: String,
    /// アップロード用署名 URL の有効期間（秒）
    pub signed_url_expiration: u64,
    pub environment: String,
    pub aws_region: String,
    /// DynamoDB Local などを使う場合のエンドポイント
    pub dynamodb_endpoint: Option<String>,
}

impl Config {
    pub const DEFAULT_SIGNED_URL_EXPIRATION: u64 = 300;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の取得関数から設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let todos_index = match lookup("TODOS_INDEX").filter(|v| !v.trim().is_empty()) {
            Some(index) => index,
            None => required("INDEX_NAME").map_err(|_| ConfigError::Missing("TODOS_INDEX"))?,
        };

        let signed_url_expiration = match lookup("SIGNED_URL_EXPIRATION") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SIGNED_URL_EXPIRATION",
                        value: raw,
                    })
                }
            },
            None => Self::DEFAULT_SIGNED_URL_EXPIRATION,
        };

        Ok(Config {
            todos_table: required("TODOS_TABLE")?,
            todos_index,
            attachment_bucket: required("ATTACHMENT_S3_BUCKET")?,
            signed_url_expiration,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|v| !v.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const BASE: [(&str, &str); 3] = [
        ("TODOS_TABLE", "Todos-dev"),
        ("TODOS_INDEX", "CreatedAtIndex"),
        ("ATTACHMENT_S3_BUCKET", "todo-attachments-dev"),
    ];

    #[test]
    fn test_from_lookup_with_defaults() {
        let config = Config::from_lookup(lookup_from(&BASE)).unwrap();

        assert_eq!(config.todos_table, "Todos-dev");
        assert_eq!(config.todos_index, "CreatedAtIndex");
        assert_eq!(config.attachment_bucket, "todo-attachments-dev");
        assert_eq!(
            config.signed_url_expiration,
            Config::DEFAULT_SIGNED_URL_EXPIRATION
        );
        assert_eq!(config.environment, "dev");
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.dynamodb_endpoint, None);
    }

    #[test]
    fn test_index_name_alias() {
        let config = Config::from_lookup(lookup_from(&[
            ("TODOS_TABLE", "Todos-dev"),
            ("INDEX_NAME", "UserIdIndex"),
            ("ATTACHMENT_S3_BUCKET", "bucket"),
        ]))
        .unwrap();

        assert_eq!(config.todos_index, "UserIdIndex");
    }

    #[test]
    fn test_overrides() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SIGNED_URL_EXPIRATION", "900"));
        pairs.push(("ENVIRONMENT", "prod"));
        pairs.push(("AWS_REGION", "ap-northeast-1"));
        pairs.push(("DYNAMODB_ENDPOINT", "http://localhost:8000"));

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.signed_url_expiration, 900);
        assert_eq!(config.environment, "prod");
        assert_eq!(config.aws_region, "ap-northeast-1");
        assert_eq!(
            config.dynamodb_endpoint,
            Some("http://localhost:8000".to_string())
        );
    }

    #[test]
    fn test_missing_required_variable() {
        let result = Config::from_lookup(lookup_from(&[
            ("TODOS_TABLE", "Todos-dev"),
            ("TODOS_INDEX", "CreatedAtIndex"),
        ]));

        assert_eq!(result, Err(ConfigError::Missing("ATTACHMENT_S3_BUCKET")));
    }

    #[test]
    fn test_missing_index() {
        let result = Config::from_lookup(lookup_from(&[
            ("TODOS_TABLE", "Todos-dev"),
            ("ATTACHMENT_S3_BUCKET", "bucket"),
        ]));

        assert_eq!(result, Err(ConfigError::Missing("TODOS_INDEX")));
    }

    #[test]
    fn test_invalid_expiration() {
        for raw in ["abc", "0", "-5"] {
            let mut pairs = BASE.to_vec();
            pairs.push(("SIGNED_URL_EXPIRATION", raw));

            let result = Config::from_lookup(lookup_from(&pairs));
            assert_eq!(
                result,
                Err(ConfigError::Invalid {
                    name: "SIGNED_URL_EXPIRATION",
                    value: raw.to_string(),
                })
            );
        }
    }
}
