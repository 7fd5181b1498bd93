//! Speech-to-gig handler.

use axum::{extract::State, response::Json, routing::post, Extension, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::domain::Principal;
use crate::errors::AppResult;
use crate::services::{AudioClip, VoiceOutcome};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SpeechRequest {
    pub audio: AudioClip,
}

pub fn voice_routes() -> Router<AppState> {
    Router::new().route("/stt/", post(speech_to_gig))
}

/// Turn a spoken request into a gig
#[utoipa::path(
    post,
    path = "/stt/",
    tag = "Assistant",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = SpeechRequest,
    responses(
        (status = 200, description = "Whether a gig was created", body = VoiceOutcome),
        (status = 400, description = "Audio is not valid base64"),
        (status = 403, description = "Caller is not a dater"),
        (status = 502, description = "Speech or assistant service failed")
    )
)]
pub async fn speech_to_gig(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<SpeechRequest>,
) -> AppResult<Json<VoiceOutcome>> {
    Ok(Json(state.services.voice().intake(principal, request.audio).await?))
}
