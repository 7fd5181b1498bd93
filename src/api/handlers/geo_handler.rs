//! Location handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::Principal;
use crate::errors::AppResult;
use crate::infra::Place;
use crate::services::PlaceCategory;

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationResponse {
    #[schema(example = "41.7370,-111.8338")]
    pub location: String,
}

pub fn geo_routes() -> Router<AppState> {
    Router::new()
        .route("/geo/user/:id/", get(user_location))
        .route("/geo/:category/:id/", get(places_near_user))
}

/// The caller's stored location
#[utoipa::path(
    get,
    path = "/geo/user/{id}/",
    tag = "Places",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID, must be the caller")),
    responses(
        (status = 200, description = "Stored location", body = LocationResponse),
        (status = 403, description = "Not your location")
    )
)]
pub async fn user_location(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LocationResponse>> {
    let location = state.services.accounts().location(principal, id).await?;
    Ok(Json(LocationResponse { location }))
}

/// Points of interest around the caller
#[utoipa::path(
    get,
    path = "/geo/{category}/{id}/",
    tag = "Places",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(
        ("category" = PlaceCategory, Path, description = "stores, activities, events, attractions or restaurants"),
        ("id" = Uuid, Path, description = "User ID, must be the caller")
    ),
    responses(
        (status = 200, description = "Nearby places, best match first", body = [Place]),
        (status = 400, description = "Location could not be resolved"),
        (status = 403, description = "Not your location"),
        (status = 502, description = "Places provider failed")
    )
)]
pub async fn places_near_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((category, id)): Path<(PlaceCategory, Uuid)>,
) -> AppResult<Json<Vec<Place>>> {
    let places = state
        .services
        .places()
        .near_user(principal, category, id)
        .await?;
    Ok(Json(places))
}
