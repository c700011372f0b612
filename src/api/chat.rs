use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, TokenUsage};
use crate::constants::CHAT_STATUS_SUCCESS;

use super::{json_body, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ChatRequest {
    messages: Vec<ChatMessage>,
    model: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatResponse {
    status: &'static str,
    message: String,
    tokens: TokenUsage,
}

/// POST /chat
pub(super) async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = json_body(body)?;
    let completion = state
        .chat
        .generate_chat_response(request.messages, request.model)
        .await?;

    Ok(Json(ChatResponse {
        status: CHAT_STATUS_SUCCESS,
        message: completion.content,
        tokens: completion.usage,
    }))
}
