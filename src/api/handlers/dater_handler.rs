//! Dater handlers: profile, balance, ratings, card deposits and calendar.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    DaterProfile, DaterProfileInput, Feedback, LedgerEntry, NewCard, NewOuting, Outing,
    PaymentCard, Principal, RatingTarget, UserRole,
};
use crate::errors::AppResult;
use crate::services::{Deposit, Rating};
use crate::types::{AverageRatingResponse, BalanceResponse};

pub fn dater_routes() -> Router<AppState> {
    Router::new()
        .route("/dater/profile/", post(update_profile))
        .route("/dater/profile/:id/", get(get_profile))
        .route("/dater/balance/:id/", get(get_balance))
        .route("/dater/rate/", post(rate_dater))
        .route("/dater/ratings/:id/", get(get_ratings))
        .route("/dater/avg_rating/:id/", get(get_average_rating))
        .route("/dater/save_card/", post(save_card))
        .route("/dater/transfer/", post(deposit))
        .route("/dater/calendar/:id/", get(get_calendar).post(schedule_date))
}

/// Get a dater profile
#[utoipa::path(
    get,
    path = "/dater/profile/{id}/",
    tag = "Daters",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Dater ID")),
    responses(
        (status = 200, description = "Dater profile", body = DaterProfile),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Dater not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DaterProfile>> {
    let profile = state.services.accounts().dater_profile(principal, id).await?;
    Ok(Json(profile))
}

/// Replace the caller's dater profile
#[utoipa::path(
    post,
    path = "/dater/profile/",
    tag = "Daters",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = DaterProfileInput,
    responses(
        (status = 200, description = "Profile updated", body = DaterProfile),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not a dater")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(input): ValidatedJson<DaterProfileInput>,
) -> AppResult<Json<DaterProfile>> {
    let profile = state
        .services
        .accounts()
        .update_dater_profile(principal, input)
        .await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/dater/balance/{id}/",
    tag = "Daters",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Dater ID")),
    responses(
        (status = 200, description = "Cupid-cash balance", body = BalanceResponse),
        (status = 403, description = "Not your balance"),
        (status = 404, description = "Dater not found")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BalanceResponse>> {
    let balance_cents = state
        .services
        .accounts()
        .balance(principal, UserRole::Dater, id)
        .await?;
    Ok(Json(BalanceResponse { balance_cents }))
}

/// Rate the dater of a gig; the body names them as `dater_id`
#[utoipa::path(
    post,
    path = "/dater/rate/",
    tag = "Daters",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = Rating,
    responses(
        (status = 201, description = "Feedback recorded", body = Feedback),
        (status = 400, description = "Rating out of range"),
        (status = 403, description = "Dater is not on the gig"),
        (status = 404, description = "Gig not found")
    )
)]
pub async fn rate_dater(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(rating): Json<Rating>,
) -> AppResult<(StatusCode, Json<Feedback>)> {
    let feedback = state
        .services
        .ratings()
        .rate(principal, RatingTarget::Dater, rating)
        .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

#[utoipa::path(
    get,
    path = "/dater/ratings/{id}/",
    tag = "Daters",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Dater ID")),
    responses(
        (status = 200, description = "Feedback about the dater", body = [Feedback]),
        (status = 403, description = "Not the dater or staff")
    )
)]
pub async fn get_ratings(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Feedback>>> {
    Ok(Json(state.services.ratings().ratings(principal, id).await?))
}

#[utoipa::path(
    get,
    path = "/dater/avg_rating/{id}/",
    tag = "Daters",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Dater ID")),
    responses(
        (status = 200, description = "Mean star rating", body = AverageRatingResponse),
        (status = 403, description = "Not the dater or staff"),
        (status = 404, description = "Dater not found"),
        (status = 422, description = "No ratings yet")
    )
)]
pub async fn get_average_rating(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AverageRatingResponse>> {
    let rating = state
        .services
        .ratings()
        .average(principal, RatingTarget::Dater, id)
        .await?;
    Ok(Json(AverageRatingResponse { rating }))
}

#[utoipa::path(
    post,
    path = "/dater/save_card/",
    tag = "Wallet",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = NewCard,
    responses(
        (status = 201, description = "Card saved", body = PaymentCard),
        (status = 400, description = "Invalid card"),
        (status = 403, description = "Caller is not a dater")
    )
)]
pub async fn save_card(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(card): ValidatedJson<NewCard>,
) -> AppResult<(StatusCode, Json<PaymentCard>)> {
    let card = state.services.wallet().save_card(principal, card).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// Move money from a saved card into the dater's balance
#[utoipa::path(
    post,
    path = "/dater/transfer/",
    tag = "Wallet",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = Deposit,
    responses(
        (status = 200, description = "Deposit recorded, or the earlier one for this key", body = LedgerEntry),
        (status = 403, description = "Card belongs to someone else"),
        (status = 404, description = "Card not found")
    )
)]
pub async fn deposit(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(deposit): ValidatedJson<Deposit>,
) -> AppResult<Json<LedgerEntry>> {
    let entry = state.services.wallet().deposit(principal, deposit).await?;
    Ok(Json(entry))
}

#[utoipa::path(
    get,
    path = "/dater/calendar/{id}/",
    tag = "Daters",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Dater ID")),
    responses(
        (status = 200, description = "Scheduled dates", body = [Outing]),
        (status = 403, description = "Not your calendar")
    )
)]
pub async fn get_calendar(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Outing>>> {
    Ok(Json(state.services.calendar().dates(principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/dater/calendar/{id}/",
    tag = "Daters",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Dater ID, must be the caller")),
    request_body = NewOuting,
    responses(
        (status = 201, description = "Date scheduled", body = Outing),
        (status = 403, description = "Not your calendar")
    )
)]
pub async fn schedule_date(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(outing): Json<NewOuting>,
) -> AppResult<(StatusCode, Json<Outing>)> {
    principal.require_self(id)?;
    let outing = state.services.calendar().schedule(principal, outing).await?;
    Ok((StatusCode::CREATED, Json(outing)))
}
