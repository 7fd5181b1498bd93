//! Cupid handlers: profile, balance, held gigs, ratings and payouts.

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
    BankAccount, CupidProfile, CupidProfileInput, Feedback, Gig, LedgerEntry, NewBankAccount,
    Principal, RatingTarget, UserRole,
};
use crate::errors::AppResult;
use crate::services::{Payout, Rating};
use crate::types::{AverageRatingResponse, BalanceResponse};

pub fn cupid_routes() -> Router<AppState> {
    Router::new()
        .route("/cupid/profile/", post(update_profile))
        .route("/cupid/profile/:id/", get(get_profile))
        .route("/cupid/balance/:id/", get(get_balance))
        .route("/cupid/gigs/:id/", get(get_gigs))
        .route("/cupid/rate/", post(rate_cupid))
        .route("/cupid/ratings/:id/", get(get_ratings))
        .route("/cupid/avg_rating/:id/", get(get_average_rating))
        .route("/cupid/save_bank_account/", post(save_bank_account))
        .route("/cupid/transfer/", post(payout))
}

#[utoipa::path(
    get,
    path = "/cupid/profile/{id}/",
    tag = "Cupids",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Cupid ID")),
    responses(
        (status = 200, description = "Cupid profile", body = CupidProfile),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Cupid not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CupidProfile>> {
    let profile = state.services.accounts().cupid_profile(principal, id).await?;
    Ok(Json(profile))
}

/// Replace the caller's cupid profile
#[utoipa::path(
    post,
    path = "/cupid/profile/",
    tag = "Cupids",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = CupidProfileInput,
    responses(
        (status = 200, description = "Profile updated", body = CupidProfile),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not a cupid")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(input): ValidatedJson<CupidProfileInput>,
) -> AppResult<Json<CupidProfile>> {
    let profile = state
        .services
        .accounts()
        .update_cupid_profile(principal, input)
        .await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/cupid/balance/{id}/",
    tag = "Cupids",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Cupid ID")),
    responses(
        (status = 200, description = "Cupid-cash balance", body = BalanceResponse),
        (status = 403, description = "Not your balance"),
        (status = 404, description = "Cupid not found")
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
        .balance(principal, UserRole::Cupid, id)
        .await?;
    Ok(Json(BalanceResponse { balance_cents }))
}

/// Gigs currently assigned to the cupid
#[utoipa::path(
    get,
    path = "/cupid/gigs/{id}/",
    tag = "Cupids",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Cupid ID")),
    responses(
        (status = 200, description = "Assigned gigs", body = [Gig]),
        (status = 403, description = "Not your gigs")
    )
)]
pub async fn get_gigs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Gig>>> {
    Ok(Json(state.services.gigs().cupid_gigs(principal, id).await?))
}

/// Rate the cupid of a gig; the body names them as `cupid_id`
#[utoipa::path(
    post,
    path = "/cupid/rate/",
    tag = "Cupids",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = Rating,
    responses(
        (status = 201, description = "Feedback recorded", body = Feedback),
        (status = 400, description = "Rating out of range"),
        (status = 403, description = "Cupid is not on the gig"),
        (status = 404, description = "Gig not found")
    )
)]
pub async fn rate_cupid(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(rating): Json<Rating>,
) -> AppResult<(StatusCode, Json<Feedback>)> {
    let feedback = state
        .services
        .ratings()
        .rate(principal, RatingTarget::Cupid, rating)
        .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

#[utoipa::path(
    get,
    path = "/cupid/ratings/{id}/",
    tag = "Cupids",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Cupid ID")),
    responses(
        (status = 200, description = "Feedback about the cupid", body = [Feedback]),
        (status = 403, description = "Not the cupid or staff")
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
    path = "/cupid/avg_rating/{id}/",
    tag = "Cupids",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "Cupid ID")),
    responses(
        (status = 200, description = "Mean star rating", body = AverageRatingResponse),
        (status = 403, description = "Not the cupid or staff"),
        (status = 404, description = "Cupid not found"),
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
        .average(principal, RatingTarget::Cupid, id)
        .await?;
    Ok(Json(AverageRatingResponse { rating }))
}

#[utoipa::path(
    post,
    path = "/cupid/save_bank_account/",
    tag = "Wallet",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = NewBankAccount,
    responses(
        (status = 201, description = "Bank account saved", body = BankAccount),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not a cupid")
    )
)]
pub async fn save_bank_account(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(account): ValidatedJson<NewBankAccount>,
) -> AppResult<(StatusCode, Json<BankAccount>)> {
    let account = state
        .services
        .wallet()
        .save_bank_account(principal, account)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Pay the whole balance out to the saved bank account
#[utoipa::path(
    post,
    path = "/cupid/transfer/",
    tag = "Wallet",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    request_body = Payout,
    responses(
        (status = 200, description = "Payout recorded, or the earlier one for this key", body = LedgerEntry),
        (status = 400, description = "Nothing to pay out"),
        (status = 404, description = "No bank account saved")
    )
)]
pub async fn payout(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payout): ValidatedJson<Payout>,
) -> AppResult<Json<LedgerEntry>> {
    let entry = state.services.wallet().payout(principal, payout).await?;
    Ok(Json(entry))
}
