mod api;

use anyhow::Context;
use api::{handle_request, ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_config::{BehaviorVersion, Region};
use domain::TodoService;
use infrastructure::{DynamoDbClient, DynamoTodoStore, S3AttachmentLinker};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use shared::{init_tracing, Config};
use std::sync::Arc;
use tracing::info;

/// コールドスタート時に一度だけ SDK クライアントとサービスを組み立てる
async fn build_service() -> anyhow::Result<TodoService> {
    let config = Config::from_env().context("設定の読み込みに失敗しました")?;
    info!(
        "設定読み込み完了: environment={}, table={}, index={}, bucket={}",
        config.environment, config.todos_table, config.todos_index, config.attachment_bucket
    );

    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .load()
        .await;

    let store = DynamoTodoStore::new(DynamoDbClient::from_sdk_config(&aws_config, &config));
    let linker = S3AttachmentLinker::from_sdk_config(&aws_config, &config);

    Ok(TodoService::new(Arc::new(store), Arc::new(linker)))
}

async fn function_handler(
    event: LambdaEvent<ApiGatewayProxyRequest>,
    service: &TodoService,
) -> Result<ApiGatewayProxyResponse, Error> {
    let (payload, _context) = event.into_parts();
    Ok(handle_request(&payload, service).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    if let Err(e) = init_tracing() {
        eprintln!("トレーシング初期化エラー: {e}");
    }

    let service = build_service()
        .await
        .context("ToDoサービスの初期化に失敗しました")?;

    run(service_fn(|event| function_handler(event, &service))).await
}
