use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;

use crate::board::{
    BoardState, CreateColumnArgs, CreateTaskArgs, LabelArgs, TaskWithLabels, UpdateColumnArgs, UpdateLabelArgs,
    UpdateTaskArgs,
};
use crate::constants::{SUCCESS_COLUMN_DELETED, SUCCESS_LABEL_DELETED, SUCCESS_TASK_DELETED};
use crate::entities::{column, label};

use super::{json_body, path_id, query_params, ApiError, AppState, DeleteResponse};

#[derive(Debug, Deserialize)]
pub(super) struct ListTasksQuery {
    column_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReplaceLabelsRequest {
    labels: Vec<LabelArgs>,
}

/// GET /board
pub(super) async fn get_board(State(state): State<AppState>) -> Result<Json<BoardState>, ApiError> {
    Ok(Json(state.board.board_state().await?))
}

/// GET /columns
pub(super) async fn list_columns(State(state): State<AppState>) -> Result<Json<Vec<column::Model>>, ApiError> {
    Ok(Json(state.board.list_columns().await?))
}

/// POST /columns
pub(super) async fn create_column(
    State(state): State<AppState>,
    body: Result<Json<CreateColumnArgs>, JsonRejection>,
) -> Result<Json<column::Model>, ApiError> {
    let args = json_body(body)?;
    Ok(Json(state.board.create_column(args).await?))
}

/// PUT /columns/{id}
pub(super) async fn update_column(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<UpdateColumnArgs>, JsonRejection>,
) -> Result<Json<column::Model>, ApiError> {
    let id = path_id(id)?;
    let args = json_body(body)?;
    Ok(Json(state.board.update_column(id, args).await?))
}

/// DELETE /columns/{id}
pub(super) async fn delete_column(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = path_id(id)?;
    state.board.delete_column(id).await?;
    Ok(Json(DeleteResponse {
        message: SUCCESS_COLUMN_DELETED,
    }))
}

/// GET /tasks?column_id=
pub(super) async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskWithLabels>>, ApiError> {
    let query = query_params(query)?;
    Ok(Json(state.board.list_tasks(query.column_id).await?))
}

/// POST /tasks
pub(super) async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskArgs>, JsonRejection>,
) -> Result<Json<TaskWithLabels>, ApiError> {
    let args = json_body(body)?;
    Ok(Json(state.board.create_task(args).await?))
}

/// PUT /tasks/{id}
pub(super) async fn update_task(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<UpdateTaskArgs>, JsonRejection>,
) -> Result<Json<TaskWithLabels>, ApiError> {
    let id = path_id(id)?;
    let args = json_body(body)?;
    Ok(Json(state.board.update_task(id, args).await?))
}

/// DELETE /tasks/{id}
pub(super) async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = path_id(id)?;
    state.board.delete_task(id).await?;
    Ok(Json(DeleteResponse {
        message: SUCCESS_TASK_DELETED,
    }))
}

/// GET /tasks/{id}/labels
pub(super) async fn get_task_labels(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<label::Model>>, ApiError> {
    let id = path_id(id)?;
    Ok(Json(state.board.get_task_labels(id).await?))
}

/// POST /tasks/{id}/labels
///
/// Replaces the whole label set; callers resend every label they want kept.
pub(super) async fn replace_task_labels(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<ReplaceLabelsRequest>, JsonRejection>,
) -> Result<Json<Vec<label::Model>>, ApiError> {
    let id = path_id(id)?;
    let request = json_body(body)?;
    Ok(Json(state.board.replace_task_labels(id, request.labels).await?))
}

/// GET /labels
pub(super) async fn list_labels(State(state): State<AppState>) -> Result<Json<Vec<label::Model>>, ApiError> {
    Ok(Json(state.board.list_labels().await?))
}

/// POST /labels
pub(super) async fn create_label(
    State(state): State<AppState>,
    body: Result<Json<LabelArgs>, JsonRejection>,
) -> Result<Json<label::Model>, ApiError> {
    let args = json_body(body)?;
    Ok(Json(state.board.create_label(args).await?))
}

/// PUT /labels/{id}
pub(super) async fn update_label(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<UpdateLabelArgs>, JsonRejection>,
) -> Result<Json<label::Model>, ApiError> {
    let id = path_id(id)?;
    let args = json_body(body)?;
    Ok(Json(state.board.update_label(id, args).await?))
}

/// DELETE /labels/{id}
pub(super) async fn delete_label(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = path_id(id)?;
    state.board.delete_label(id).await?;
    Ok(Json(DeleteResponse {
        message: SUCCESS_LABEL_DELETED,
    }))
}
