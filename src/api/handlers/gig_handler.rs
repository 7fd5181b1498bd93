//! Gig handlers: request, claim, complete, drop and the nearby-gig feed.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{Gig, NewQuest, Principal};
use crate::errors::AppResult;

/// Gig request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGigRequest {
    pub quest: NewQuest,
}

/// Body of the accept, complete and drop calls
#[derive(Debug, Deserialize, ToSchema)]
pub struct GigAction {
    pub gig_id: Uuid,
}

pub fn gig_routes() -> Router<AppState> {
    Router::new()
        .route("/gig/create/", post(create_gig))
        .route("/gig/accept/", post(accept_gig))
        .route("/gig/complete/", post(complete_gig))
        .route("/gig/drop/", post(drop_gig))
        .route("/gig/:cupid_id/:count/", get(nearby_gigs))
}

/// Request a gig for the calling dater
#[utoipa::path(
    post,
    path = "/gig/create/",
    tag = "Gigs",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = CreateGigRequest,
    responses(
        (status = 201, description = "Gig opened", body = Gig),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not an active dater")
    )
)]
pub async fn create_gig(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CreateGigRequest>,
) -> AppResult<(StatusCode, Json<Gig>)> {
    let gig = state.services.gigs().create(principal, request.quest).await?;
    Ok((StatusCode::CREATED, Json(gig)))
}

/// Claim an unclaimed gig
#[utoipa::path(
    post,
    path = "/gig/accept/",
    tag = "Gigs",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = GigAction,
    responses(
        (status = 200, description = "Gig claimed", body = Gig),
        (status = 400, description = "Gig is not available to claim"),
        (status = 403, description = "Caller is not an active cupid"),
        (status = 404, description = "Gig not found")
    )
)]
pub async fn accept_gig(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(action): Json<GigAction>,
) -> AppResult<Json<Gig>> {
    Ok(Json(state.services.gigs().accept(principal, action.gig_id).await?))
}

#[utoipa::path(
    post,
    path = "/gig/complete/",
    tag = "Gigs",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = GigAction,
    responses(
        (status = 200, description = "Gig complete", body = Gig),
        (status = 400, description = "Gig is not claimed"),
        (status = 403, description = "Caller is not on the gig"),
        (status = 404, description = "Gig not found")
    )
)]
pub async fn complete_gig(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(action): Json<GigAction>,
) -> AppResult<Json<Gig>> {
    Ok(Json(state.services.gigs().complete(principal, action.gig_id).await?))
}

/// Hand a claimed gig back
#[utoipa::path(
    post,
    path = "/gig/drop/",
    tag = "Gigs",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = GigAction,
    responses(
        (status = 200, description = "Gig released", body = Gig),
        (status = 400, description = "Gig is not claimed"),
        (status = 403, description = "Caller is not the assigned cupid"),
        (status = 404, description = "Gig not found")
    )
)]
pub async fn drop_gig(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(action): Json<GigAction>,
) -> AppResult<Json<Gig>> {
    Ok(Json(state.services.gigs().drop_gig(principal, action.gig_id).await?))
}

/// Unclaimed gigs within the cupid's range
#[utoipa::path(
    get,
    path = "/gig/{cupid_id}/{count}/",
    tag = "Gigs",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(
        ("cupid_id" = Uuid, Path, description = "Cupid ID"),
        ("count" = u32, Path, description = "Maximum number of gigs")
    ),
    responses(
        (status = 200, description = "Nearby gigs in request order", body = [Gig]),
        (status = 403, description = "Not your feed"),
        (status = 404, description = "Cupid not found")
    )
)]
pub async fn nearby_gigs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((cupid_id, count)): Path<(Uuid, u32)>,
) -> AppResult<Json<Vec<Gig>>> {
    Ok(Json(state.services.gigs().nearby(principal, cupid_id, count).await?))
}
