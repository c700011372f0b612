use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use kanboard::api::{self, AppState};
use kanboard::board::BoardService;
use kanboard::chat::{ChatCompletion, ChatError, ChatProvider, ChatService, CompletionRequest, TokenUsage};
use kanboard::config::ChatConfig;
use kanboard::storage::LocalStorage;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Provider double that echoes the last message or fails with a fixed message.
#[derive(Default)]
struct StubProvider {
    calls: AtomicUsize,
    failure: Option<String>,
}

#[async_trait]
impl ChatProvider for StubProvider {
    fn provider_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<ChatCompletion, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(ChatError::Provider(message.clone()));
        }
        let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(ChatCompletion {
            content: format!("echo: {last}"),
            usage: TokenUsage {
                prompt_tokens: 3,
                completion_tokens: 2,
                total_tokens: 5,
            },
        })
    }
}

async fn app_with(provider: Arc<StubProvider>) -> Router {
    let storage = LocalStorage::connect("sqlite::memory:")
        .await
        .expect("in-memory storage should open");
    let board = BoardService::new(Arc::new(storage));
    let chat = ChatService::new(provider, ChatConfig::default());
    api::router(AppState::new(board, chat), "/api/v1")
}

async fn app() -> Router {
    app_with(Arc::new(StubProvider::default())).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_label_replace_scenario() {
    let app = app().await;

    let (status, column) = send(&app, "POST", "/api/v1/columns", Some(json!({"title": "To Do", "order": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    let column_id = column["id"].as_i64().unwrap();

    let (status, task) = send(
        &app,
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "Design UI", "column_id": column_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["completed"], json!(false));
    assert_eq!(task["labels"], json!([]));
    let task_id = task["id"].as_i64().unwrap();
    let labels_uri = format!("/api/v1/tasks/{task_id}/labels");

    let (status, labels) = send(&app, "GET", &labels_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(labels, json!([]));

    let body = json!({"labels": [{"text": "urgent", "color": "#f00"}]});
    let (status, first) = send(&app, "POST", &labels_uri, Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first[0]["text"], "urgent");
    assert_eq!(first[0]["color"], "#f00");

    let (status, second) = send(&app, "POST", &labels_uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);

    let (_, all_labels) = send(&app, "GET", "/api/v1/labels", None).await;
    assert_eq!(all_labels.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_timestamps_are_iso8601() {
    let app = app().await;
    let (_, column) = send(&app, "POST", "/api/v1/columns", Some(json!({"title": "To Do"}))).await;
    let created_at = column["created_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
    assert_eq!(column["order"], json!(0));
}

#[tokio::test]
async fn test_missing_entities_return_404() {
    let app = app().await;

    let (status, body) = send(&app, "PUT", "/api/v1/tasks/7", Some(json!({"completed": true}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Task not found");

    let (status, _) = send(&app, "DELETE", "/api/v1/columns/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/api/v1/tasks/7/labels", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/api/v1/labels/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "Orphan", "column_id": 7})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Column not found");
}

#[tokio::test]
async fn test_malformed_bodies_return_400() {
    let app = app().await;

    let (status, body) = send(&app, "POST", "/api/v1/columns", Some(json!({"order": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("title"));

    let (status, _) = send(&app, "POST", "/api/v1/columns", Some(json!({"title": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/v1/tasks", Some(json!({"title": "No column"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_ids_and_filters_return_json_400() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/v1/tasks/abc/labels", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("abc"));

    let (status, body) = send(&app, "GET", "/api/v1/tasks?column_id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("column_id"));

    let (status, body) = send(&app, "DELETE", "/api/v1/columns/99999999999", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (status, body) = send(&app, "PUT", "/api/v1/labels/x", Some(json!({"text": "bug"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_column_crud_and_cascade() {
    let app = app().await;
    let (_, done) = send(&app, "POST", "/api/v1/columns", Some(json!({"title": "Done", "order": 2}))).await;
    let (_, todo) = send(&app, "POST", "/api/v1/columns", Some(json!({"title": "To Do", "order": 1}))).await;

    let (_, columns) = send(&app, "GET", "/api/v1/columns", None).await;
    assert_eq!(columns[0]["title"], "To Do");
    assert_eq!(columns[1]["title"], "Done");

    let uri = format!("/api/v1/columns/{}", todo["id"]);
    let (status, renamed) = send(&app, "PUT", &uri, Some(json!({"title": "Backlog"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["title"], "Backlog");
    assert_eq!(renamed["order"], 1);

    send(
        &app,
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "Design UI", "column_id": todo["id"]})),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "Shipped", "column_id": done["id"]})),
    )
    .await;

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Column deleted successfully");

    let (_, tasks) = send(&app, "GET", "/api/v1/tasks", None).await;
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Shipped");
}

#[tokio::test]
async fn test_task_filter_and_partial_update() {
    let app = app().await;
    let (_, todo) = send(&app, "POST", "/api/v1/columns", Some(json!({"title": "To Do"}))).await;
    let (_, done) = send(&app, "POST", "/api/v1/columns", Some(json!({"title": "Done"}))).await;
    let (_, label) = send(&app, "POST", "/api/v1/labels", Some(json!({"text": "ui", "color": "#00f"}))).await;

    let (_, task) = send(
        &app,
        "POST",
        "/api/v1/tasks",
        Some(json!({
            "title": "Design UI",
            "description": "Create mockups",
            "order": 3,
            "column_id": todo["id"],
            "label_ids": [label["id"], 999]
        })),
    )
    .await;
    assert_eq!(task["labels"].as_array().unwrap().len(), 1);
    send(
        &app,
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "Shipped", "column_id": done["id"]})),
    )
    .await;

    let (_, filtered) = send(&app, "GET", &format!("/api/v1/tasks?column_id={}", todo["id"]), None).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["title"], "Design UI");

    let (_, none) = send(&app, "GET", "/api/v1/tasks?column_id=0", None).await;
    assert_eq!(none, json!([]));

    let uri = format!("/api/v1/tasks/{}", task["id"]);
    let (status, updated) = send(&app, "PUT", &uri, Some(json!({"completed": true}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Design UI");
    assert_eq!(updated["description"], "Create mockups");
    assert_eq!(updated["order"], 3);
    assert_eq!(updated["column_id"], todo["id"]);
    assert_eq!(updated["labels"], task["labels"]);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");
}

#[tokio::test]
async fn test_label_endpoints() {
    let app = app().await;
    let (status, label) = send(&app, "POST", "/api/v1/labels", Some(json!({"text": "bug", "color": "red"}))).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/v1/labels/{}", label["id"]);
    let (status, updated) = send(&app, "PUT", &uri, Some(json!({"color": "#f00"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["text"], "bug");
    assert_eq!(updated["color"], "#f00");

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Label deleted successfully");

    let (_, labels) = send(&app, "GET", "/api/v1/labels", None).await;
    assert_eq!(labels, json!([]));
}

#[tokio::test]
async fn test_board_endpoint_embeds_tasks() {
    let app = app().await;
    let (_, todo) = send(&app, "POST", "/api/v1/columns", Some(json!({"title": "To Do", "order": 1}))).await;
    send(
        &app,
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "Design UI", "column_id": todo["id"]})),
    )
    .await;

    let (status, board) = send(&app, "GET", "/api/v1/board", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["columns"][0]["title"], "To Do");
    assert_eq!(board["columns"][0]["tasks"][0]["title"], "Design UI");
    assert_eq!(board["columns"][0]["tasks"][0]["labels"], json!([]));
}

#[tokio::test]
async fn test_chat_without_messages_is_rejected_before_provider() {
    let provider = Arc::new(StubProvider::default());
    let app = app_with(provider.clone()).await;

    let (status, body) = send(&app, "POST", "/api/v1/chat", Some(json!({"messages": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "No messages provided");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chat_success_shape() {
    let provider = Arc::new(StubProvider::default());
    let app = app_with(provider.clone()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/chat",
        Some(json!({"messages": [{"role": "user", "content": "hello"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "echo: hello");
    assert_eq!(
        body["tokens"],
        json!({"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5})
    );
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_chat_provider_failures_return_500() {
    let quota = Arc::new(StubProvider {
        failure: Some("Error code: 429 - You exceeded your current quota".to_string()),
        ..Default::default()
    });
    let app = app_with(quota).await;
    let request = json!({"messages": [{"role": "user", "content": "hello"}]});

    let (status, body) = send(&app, "POST", "/api/v1/chat", Some(request.clone())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "OpenAI API quota exceeded. Please check your billing settings."
    );

    let broken = Arc::new(StubProvider {
        failure: Some("connection reset".to_string()),
        ..Default::default()
    });
    let app = app_with(broken).await;
    let (status, body) = send(&app, "POST", "/api/v1/chat", Some(request)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "connection reset");
}

#[tokio::test]
async fn test_chat_rejects_unknown_roles() {
    let provider = Arc::new(StubProvider::default());
    let app = app_with(provider.clone()).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/chat",
        Some(json!({"messages": [{"role": "robot", "content": "beep"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}
