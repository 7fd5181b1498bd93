//! Account handlers: sign-up, sign-in, sign-out, account reads and deletion.

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
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{AccountResponse, CupidProfileInput, DaterProfileInput, Principal, UserRole};
use crate::errors::AppResult;
use crate::services::{Authenticated, Registration, SignInResponse};
use crate::types::MessageResponse;

/// Sign-up request: identity fields plus the profile for the chosen role
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 150, message = "Username is required"))]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(length(min = 1, max = 150, message = "First name is required"))]
    #[schema(example = "Jo")]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "dater")]
    pub role: UserRole,
    /// Required when `role` is `dater`
    pub dater: Option<DaterProfileInput>,
    /// Required when `role` is `cupid`
    pub cupid: Option<CupidProfileInput>,
}

impl From<CreateAccountRequest> for Registration {
    fn from(request: CreateAccountRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            password: request.password,
            confirm_password: request.confirm_password,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role,
            dater: request.dater,
            cupid: request.cupid,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Routes reachable without credentials
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/user/create/", post(create_account))
        .route("/user/sign_in/", post(sign_in))
}

/// Account routes that need an authenticated caller
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/sign_out/", post(sign_out))
        .route("/user/:id", get(get_account))
        .route(
            "/manager/delete_user/:id/",
            get(delete_account).delete(delete_account),
        )
}

/// Open a dater or cupid account
#[utoipa::path(
    post,
    path = "/user/create/",
    tag = "Users",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error or duplicate email/username")
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let account = state.services.auth().register(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// Sign in and receive a bearer token
#[utoipa::path(
    post,
    path = "/user/sign_in/",
    tag = "Users",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 400, description = "User not found or incorrect password")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignInRequest>,
) -> AppResult<Json<SignInResponse>> {
    let response = state
        .services
        .auth()
        .sign_in(&payload.email, &payload.password)
        .await?;

    Ok(Json(response))
}

/// Close the caller's session
#[utoipa::path(
    post,
    path = "/user/sign_out/",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(authenticated): Extension<Authenticated>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .auth()
        .sign_out(authenticated.session_id)
        .await?;

    Ok(Json(MessageResponse::new("Signed out")))
}

/// Get an account with its profile
#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "Users",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account found", body = AccountResponse),
        (status = 403, description = "Not your account"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    let account = state.services.accounts().get_account(principal, id).await?;

    Ok(Json(AccountResponse::from(account)))
}

/// Delete an account and everything it owns
#[utoipa::path(
    delete,
    path = "/manager/delete_user/{id}/",
    tag = "Users",
    security(("bearer_auth" = []), ("basic_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 403, description = "Not your account"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.services.accounts().delete_account(principal, id).await?;

    Ok(Json(MessageResponse::new("User deleted")))
}
