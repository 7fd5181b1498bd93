//! Direct notification handler.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::NotificationReceipt;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotifyRequest {
    pub user_id: Uuid,
    #[schema(example = "Your cupid is on the way")]
    pub message: String,
}

pub fn notify_routes() -> Router<AppState> {
    Router::new().route("/notify/", post(notify_user))
}

/// Email or text a user, following their communication preference
#[utoipa::path(
    post,
    path = "/notify/",
    tag = "Assistant",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = NotifyRequest,
    responses(
        (status = 200, description = "Notification sent", body = NotificationReceipt),
        (status = 400, description = "Managers cannot be notified"),
        (status = 404, description = "User not found"),
        (status = 502, description = "Mail or SMS provider failed")
    )
)]
pub async fn notify_user(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> AppResult<Json<NotificationReceipt>> {
    let receipt = state
        .services
        .notifications()
        .notify(request.user_id, request.message)
        .await?;
    Ok(Json(receipt))
}
