use domain::{CreateTodoRequest, TodoItem, TodoService, TodoUpdate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{AppError, ErrorResponse};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// API Gateway プロキシリクエスト構造体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyRequest {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub request_context: RequestContext,
}

/// リクエストコンテキスト構造体
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

/// カスタムオーソライザーが渡すコンテキスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorizer {
    pub principal_id: Option<String>,
}

/// API Gateway プロキシレスポンス構造体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Serialize)]
struct ItemsBody<'a> {
    items: &'a [TodoItem],
}

#[derive(Serialize)]
struct ItemBody<'a> {
    item: &'a TodoItem,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlBody<'a> {
    upload_url: &'a str,
}

/// ルーティング結果
#[derive(Debug, PartialEq, Eq)]
pub enum Route {
    Preflight,
    ListTodos,
    CreateTodo,
    UpdateTodo { todo_id: String },
    DeleteTodo { todo_id: String },
    CreateAttachment { todo_id: String },
}

/// メソッドとパスからルートを決定
pub fn parse_route(method: &str, path: &str) -> Result<Route, AppError> {
    if method.eq_ignore_ascii_case("OPTIONS") {
        return Ok(Route::Preflight);
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let route = match (method.to_ascii_uppercase().as_str(), segments.as_slice()) {
        ("GET", ["todos"]) => Some(Route::ListTodos),
        ("POST", ["todos"]) => Some(Route::CreateTodo),
        ("PATCH", ["todos", todo_id]) if !todo_id.is_empty() => Some(Route::UpdateTodo {
            todo_id: todo_id.to_string(),
        }),
        ("DELETE", ["todos", todo_id]) if !todo_id.is_empty() => Some(Route::DeleteTodo {
            todo_id: todo_id.to_string(),
        }),
        ("POST", ["todos", todo_id, "attachment"]) if !todo_id.is_empty() => {
            Some(Route::CreateAttachment {
                todo_id: todo_id.to_string(),
            })
        }
        _ => None,
    };

    route.ok_or_else(|| AppError::RouteNotFound(format!("{method} {path}")))
}

/// リクエストを処理し、失敗時はエラーレスポンスに変換する
pub async fn handle_request(
    request: &ApiGatewayProxyRequest,
    service: &TodoService,
) -> ApiGatewayProxyResponse {
    info!(
        "リクエスト受信: method={}, path={}",
        request.http_method, request.path
    );

    match dispatch(request, service).await {
        Ok(response) => {
            info!("リクエスト完了: status={}", response.status_code);
            response
        }
        Err(err) => {
            if err.is_server_error() {
                error!("リクエスト処理エラー: code={}, error={}", err.code(), err);
            } else {
                warn!("リクエスト拒否: code={}, error={}", err.code(), err);
            }
            error_response(&err, request.request_context.request_id.clone())
        }
    }
}

async fn dispatch(
    request: &ApiGatewayProxyRequest,
    service: &TodoService,
) -> Result<ApiGatewayProxyResponse, AppError> {
    let route = parse_route(&request.http_method, &request.path)?;
    if route == Route::Preflight {
        return Ok(empty_response(204));
    }

    let user_id = extract_user_id(request)?;

    match route {
        Route::Preflight => Ok(empty_response(204)),
        Route::ListTodos => {
            let items = service.get_todos_for_user(user_id).await?;
            json_response(200, &ItemsBody { items: &items })
        }
        Route::CreateTodo => {
            let create_req: CreateTodoRequest = parse_body(request.body.as_deref())?;
            validate_name(&create_req.name)?;

            let item = service.create_todo(create_req, user_id).await?;
            json_response(201, &ItemBody { item: &item })
        }
        Route::UpdateTodo { todo_id } => {
            let update: TodoUpdate = parse_body(request.body.as_deref())?;
            validate_name(&update.name)?;

            service.update_todo(user_id, &todo_id, &update).await?;
            Ok(empty_response(204))
        }
        Route::DeleteTodo { todo_id } => {
            service.delete_todo(user_id, &todo_id).await?;
            Ok(empty_response(204))
        }
        Route::CreateAttachment { todo_id } => {
            let attachment_id = uuid::Uuid::new_v4().to_string();
            let upload_url = service
                .create_attachment_presigned_url(&attachment_id)
                .await?;
            service
                .update_attachment_url(user_id, &todo_id, &attachment_id)
                .await?;

            json_response(
                201,
                &UploadUrlBody {
                    upload_url: &upload_url,
                },
            )
        }
    }
}

/// オーソライザーのコンテキストからユーザーIDを抽出
fn extract_user_id(request: &ApiGatewayProxyRequest) -> Result<&str, AppError> {
    request
        .request_context
        .authorizer
        .as_ref()
        .and_then(|authorizer| authorizer.principal_id.as_deref())
        .filter(|user_id| !user_id.is_empty())
        .ok_or_else(|| AppError::Authentication("ユーザーIDが見つかりません".to_string()))
}

fn parse_body<T: DeserializeOwned>(body: Option<&str>) -> Result<T, AppError> {
    let body = body
        .filter(|body| !body.trim().is_empty())
        .ok_or_else(|| AppError::Validation("リクエストボディが必要です".to_string()))?;

    serde_json::from_str(body)
        .map_err(|e| AppError::Deserialization(format!("リクエストボディのパースエラー: {e}")))
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name は必須です".to_string()));
    }
    Ok(())
}

fn cors_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        (
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type,Authorization".to_string(),
        ),
        (
            "Access-Control-Allow-Methods".to_string(),
            "GET,POST,PATCH,DELETE,OPTIONS".to_string(),
        ),
    ])
}

fn json_response<T: Serialize>(
    status_code: u16,
    body: &T,
) -> Result<ApiGatewayProxyResponse, AppError> {
    let body = serde_json::to_string(body).map_err(|e| AppError::Serialization(e.to_string()))?;
    let mut headers = cors_headers();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    Ok(ApiGatewayProxyResponse {
        status_code,
        headers,
        body,
    })
}

fn empty_response(status_code: u16) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code,
        headers: cors_headers(),
        body: String::new(),
    }
}

fn error_response(err: &AppError, request_id: Option<String>) -> ApiGatewayProxyResponse {
    let response = ErrorResponse::from_app_error(err, request_id);
    let mut headers = cors_headers();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    // ErrorResponse は文字列だけなので直列化は失敗しない想定
    let body = response
        .to_json()
        .unwrap_or_else(|_| format!(r#"{{"code":"{}"}}"#, response.code));

    ApiGatewayProxyResponse {
        status_code: err.http_status_code(),
        headers,
        body,
    }
}
