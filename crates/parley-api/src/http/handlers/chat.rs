//! Chat handlers: create a chat, send a message.
//!
//! Identity always comes from the session cookie, never from the body, so
//! a client can only address its own chats.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use serde_json::Value;

use parley_types::chat::ChatId;

use crate::http::error::AppError;
use crate::http::extractors::session::Session;
use crate::state::AppState;

const MISSING_FIELDS: &str = "Missing chat_id or message";

#[derive(Debug, Serialize)]
pub struct CreateChatResponse {
    pub chat_id: ChatId,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub message: String,
}

/// POST /api/create_chat - Start a new chat for the session's user.
pub async fn create_chat(
    State(state): State<AppState>,
    Session(user_id): Session,
) -> Result<Json<CreateChatResponse>, AppError> {
    let chat_id = state.chat_service.start_chat(&user_id).await?;

    Ok(Json(CreateChatResponse {
        chat_id,
        message: "Chat created successfully",
    }))
}

/// POST /api/send_message - Send a message to one of the user's chats.
///
/// The body is accepted as any JSON so that a wrong shape (non-object,
/// missing or non-string fields) is reported as 400 with the same message
/// as empty fields.
pub async fn send_message(
    State(state): State<AppState>,
    Session(user_id): Session,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let Json(body) = body.map_err(|_| AppError::BadRequest(MISSING_FIELDS.to_string()))?;
    let (chat_id, text) = required_fields(&body)
        .ok_or_else(|| AppError::BadRequest(MISSING_FIELDS.to_string()))?;

    let reply = state
        .chat_service
        .send(&user_id, &ChatId::from(chat_id), text)
        .await?;

    Ok(Json(SendMessageResponse { message: reply }))
}

/// Extract non-empty `chat_id` and `message` strings from the body.
fn required_fields(body: &Value) -> Option<(&str, &str)> {
    let non_empty = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    Some((non_empty("chat_id")?, non_empty("message")?))
}
