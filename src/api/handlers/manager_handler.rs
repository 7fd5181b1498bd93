//! Manager handlers: account listings, platform metrics and moderation.
//!
//! Every operation is refused with 403 unless the caller is a manager or
//! holds the staff capability.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::api::AppState;
use crate::domain::{AccountResponse, Principal, UserRole};
use crate::errors::AppResult;
use crate::services::Moderation;
use crate::types::{CountResponse, MessageResponse, Paginated, PaginationParams, RateResponse};

pub fn manager_routes() -> Router<AppState> {
    Router::new()
        .route("/manager/daters/", get(list_daters))
        .route("/manager/cupids/", get(list_cupids))
        .route("/manager/dater_count/", get(dater_count))
        .route("/manager/cupid_count/", get(cupid_count))
        .route("/manager/gig_count/", get(gig_count))
        .route("/manager/active_daters/", get(active_daters))
        .route("/manager/active_cupids/", get(active_cupids))
        .route("/manager/gig_rate/", get(gig_rate))
        .route("/manager/gig_drop_rate/", get(gig_drop_rate))
        .route("/manager/gig_complete_rate/", get(gig_complete_rate))
        .route("/manager/suspend/", post(suspend))
        .route("/manager/unsuspend/", post(unsuspend))
}

async fn list_accounts(
    state: &AppState,
    principal: Principal,
    role: UserRole,
    params: PaginationParams,
) -> AppResult<Json<Paginated<AccountResponse>>> {
    let (page, per_page) = (params.page, params.limit());
    let (accounts, total) = state
        .services
        .analytics()
        .accounts(principal, role, params)
        .await?;

    let data = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(Json(Paginated::new(data, page, per_page, total)))
}

#[utoipa::path(
    get,
    path = "/manager/daters/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of dater accounts"),
        (status = 403, description = "Managers only")
    )
)]
pub async fn list_daters(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AccountResponse>>> {
    list_accounts(&state, principal, UserRole::Dater, params).await
}

#[utoipa::path(
    get,
    path = "/manager/cupids/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of cupid accounts"),
        (status = 403, description = "Managers only")
    )
)]
pub async fn list_cupids(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AccountResponse>>> {
    list_accounts(&state, principal, UserRole::Cupid, params).await
}

#[utoipa::path(
    get,
    path = "/manager/dater_count/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    responses((status = 200, description = "Number of daters", body = CountResponse))
)]
pub async fn dater_count(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<CountResponse>> {
    let count = state
        .services
        .analytics()
        .profile_count(principal, UserRole::Dater)
        .await?;
    Ok(Json(CountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/manager/cupid_count/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    responses((status = 200, description = "Number of cupids", body = CountResponse))
)]
pub async fn cupid_count(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<CountResponse>> {
    let count = state
        .services
        .analytics()
        .profile_count(principal, UserRole::Cupid)
        .await?;
    Ok(Json(CountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/manager/gig_count/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    responses((status = 200, description = "Number of gigs", body = CountResponse))
)]
pub async fn gig_count(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<CountResponse>> {
    let count = state.services.analytics().gig_count(principal).await?;
    Ok(Json(CountResponse { count }))
}

/// Daters holding an unexpired session
#[utoipa::path(
    get,
    path = "/manager/active_daters/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    responses((status = 200, description = "Signed-in daters", body = CountResponse))
)]
pub async fn active_daters(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<CountResponse>> {
    let count = state
        .services
        .analytics()
        .active_users(principal, UserRole::Dater)
        .await?;
    Ok(Json(CountResponse { count }))
}

/// Cupids holding an unexpired session
#[utoipa::path(
    get,
    path = "/manager/active_cupids/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    responses((status = 200, description = "Signed-in cupids", body = CountResponse))
)]
pub async fn active_cupids(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<CountResponse>> {
    let count = state
        .services
        .analytics()
        .active_users(principal, UserRole::Cupid)
        .await?;
    Ok(Json(CountResponse { count }))
}

/// Gigs requested per hour over the last day
#[utoipa::path(
    get,
    path = "/manager/gig_rate/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    responses((status = 200, description = "Requests per hour", body = RateResponse))
)]
pub async fn gig_rate(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<RateResponse>> {
    let rate = state.services.analytics().gig_rate(principal).await?;
    Ok(Json(RateResponse { rate }))
}

/// Drops per hour on gigs requested over the last day
#[utoipa::path(
    get,
    path = "/manager/gig_drop_rate/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    responses((status = 200, description = "Drops per hour", body = RateResponse))
)]
pub async fn gig_drop_rate(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<RateResponse>> {
    let rate = state.services.analytics().drop_rate(principal).await?;
    Ok(Json(RateResponse { rate }))
}

/// Share of all gigs that are complete
#[utoipa::path(
    get,
    path = "/manager/gig_complete_rate/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    responses(
        (status = 200, description = "Completed share", body = RateResponse),
        (status = 422, description = "No gigs yet")
    )
)]
pub async fn gig_complete_rate(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<RateResponse>> {
    let rate = state.services.analytics().complete_rate(principal).await?;
    Ok(Json(RateResponse { rate }))
}

#[utoipa::path(
    post,
    path = "/manager/suspend/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = Moderation,
    responses(
        (status = 200, description = "Profile suspended", body = MessageResponse),
        (status = 400, description = "Stored profile is invalid"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn suspend(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(target): Json<Moderation>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .analytics()
        .set_suspended(principal, target, true)
        .await?;
    Ok(Json(MessageResponse::new("User suspended")))
}

#[utoipa::path(
    post,
    path = "/manager/unsuspend/",
    tag = "Managers",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = Moderation,
    responses(
        (status = 200, description = "Profile reinstated", body = MessageResponse),
        (status = 400, description = "Stored profile is invalid"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn unsuspend(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(target): Json<Moderation>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .analytics()
        .set_suspended(principal, target, false)
        .await?;
    Ok(Json(MessageResponse::new("User unsuspended")))
}
