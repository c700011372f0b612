//! HTTP API for the board and the chat passthrough.
//!
//! Routes (all under the configured prefix, `/api/v1` by default):
//! - GET/POST /columns, PUT/DELETE /columns/{id}
//! - GET/POST /tasks, PUT/DELETE /tasks/{id}
//! - GET/POST /tasks/{id}/labels
//! - GET/POST /labels, PUT/DELETE /labels/{id}
//! - GET /board
//! - POST /chat

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::board::BoardService;
use crate::chat::ChatService;

mod board;
mod chat;
mod error;

pub use error::ApiError;

/// Shared handler dependencies.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<BoardService>,
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(board: BoardService, chat: ChatService) -> Self {
        Self {
            board: Arc::new(board),
            chat: Arc::new(chat),
        }
    }
}

/// Body of every successful DELETE.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// Build the router with every endpoint mounted under `prefix`.
pub fn router(state: AppState, prefix: &str) -> Router {
    let routes = Router::new()
        .route("/board", get(board::get_board))
        .route("/columns", get(board::list_columns).post(board::create_column))
        .route("/columns/{id}", put(board::update_column).delete(board::delete_column))
        .route("/tasks", get(board::list_tasks).post(board::create_task))
        .route("/tasks/{id}", put(board::update_task).delete(board::delete_task))
        .route(
            "/tasks/{id}/labels",
            get(board::get_task_labels).post(board::replace_task_labels),
        )
        .route("/labels", get(board::list_labels).post(board::create_label))
        .route("/labels/{id}", put(board::update_label).delete(board::delete_label))
        .route("/chat", post(chat::chat));

    let routes = if prefix.trim_end_matches('/').is_empty() {
        routes
    } else {
        Router::new().nest(prefix.trim_end_matches('/'), routes)
    };

    routes.with_state(state)
}

/// Unwrap a JSON body, turning malformed or incomplete input into a 400.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = body?;
    Ok(value)
}

/// Unwrap a numeric path id; non-numeric or out-of-range ids become a 400.
fn path_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    let Path(id) = id?;
    Ok(id)
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    let Query(params) = query?;
    Ok(params)
}
