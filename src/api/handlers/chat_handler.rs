//! Assistant chat handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{Message, Principal};
use crate::errors::AppResult;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[schema(example = "Where should I take them for a first date?")]
    pub message: String,
}

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat/", post(send_message))
        .route("/chat/:id/:count", get(recent_messages))
}

/// Ask the assistant; returns its reply
#[utoipa::path(
    post,
    path = "/chat/",
    tag = "Assistant",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = Message),
        (status = 400, description = "Empty message"),
        (status = 502, description = "Assistant unavailable; your message was kept")
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<Message>> {
    Ok(Json(state.services.chat().send(principal, request.message).await?))
}

#[utoipa::path(
    get,
    path = "/chat/{id}/{count}",
    tag = "Assistant",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Conversation owner, must be the caller"),
        ("count" = u32, Path, description = "Number of messages")
    ),
    responses(
        (status = 200, description = "Latest messages, newest first", body = [Message]),
        (status = 403, description = "Not your conversation")
    )
)]
pub async fn recent_messages(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, count)): Path<(Uuid, u32)>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(state.services.chat().recent(principal, id, count).await?))
}
