//! HTTP surface: routing, credentials and error bodies.
//!
//! Requests go through the full router, middleware included, against an
//! in-memory database.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cupid_concierge::api::create_router;

use common::*;

async fn app() -> Router {
    create_router(app_state().await)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

fn dater_signup(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": PASSWORD,
        "confirm_password": PASSWORD,
        "first_name": "Test",
        "last_name": "User",
        "role": "dater",
        "dater": {
            "phone_number": "4355551234",
            "budget_cents": 5000,
            "location": HOME
        }
    })
}

/// Sign up, sign in, and return the account id with a bearer header.
async fn signed_up(app: &Router, username: &str) -> (String, String) {
    let (status, account) = send(app, Method::POST, "/user/create/", None, Some(dater_signup(username))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, signed_in) = send(
        app,
        Method::POST,
        "/user/sign_in/",
        None,
        Some(json!({ "email": format!("{}@example.com", username), "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = signed_in["token"]["access_token"].as_str().unwrap().to_string();
    let id = account["id"].as_str().unwrap().to_string();
    (id, format!("Bearer {}", token))
}

#[tokio::test]
async fn test_health_and_root() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Cupid Concierge API".into()));
}

#[tokio::test]
async fn test_sign_up_then_read_own_account() {
    let app = app().await;
    let (id, bearer) = signed_up(&app, "dana").await;

    let (status, body) = send(&app, Method::GET, &format!("/user/{}", id), Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "dana");
    assert_eq!(body["role"], "dater");
    assert_eq!(body["dater"]["balance_cents"], 0);
}

#[tokio::test]
async fn test_missing_or_bad_credentials() {
    let app = app().await;
    let (id, _) = signed_up(&app, "dana").await;
    let uri = format!("/user/{}", id);

    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, &uri, Some("Bearer not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_basic_credentials_are_accepted() {
    let app = app().await;
    let (id, _) = signed_up(&app, "dana").await;

    let basic = format!("Basic {}", STANDARD.encode(format!("dana@example.com:{}", PASSWORD)));
    let (status, body) = send(&app, Method::GET, &format!("/user/{}", id), Some(&basic), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "dana@example.com");

    let wrong = format!("Basic {}", STANDARD.encode("dana@example.com:nope"));
    let (status, _) = send(&app, Method::GET, &format!("/user/{}", id), Some(&wrong), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_users_account_is_forbidden_without_body() {
    let app = app().await;
    let (dana, _) = signed_up(&app, "dana").await;
    let (_, drew_bearer) = signed_up(&app, "drew").await;

    let (status, body) = send(&app, Method::GET, &format!("/user/{}", dana), Some(&drew_bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_validation_errors_name_fields() {
    let app = app().await;

    let mut signup = dater_signup("dana");
    signup["email"] = json!("not-an-email");
    signup["confirm_password"] = json!("something-else");
    let (status, body) = send(&app, Method::POST, "/user/create/", None, Some(signup)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["fields"]["email"].is_array());
    assert!(body["error"]["fields"]["confirm_password"].is_array());
}

#[tokio::test]
async fn test_sign_in_failure_reason() {
    let app = app().await;
    signed_up(&app, "dana").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/sign_in/",
        None,
        Some(json!({ "email": "dana@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "SIGN_IN_FAILED");
}

#[tokio::test]
async fn test_manager_routes_refuse_daters() {
    let app = app().await;
    let (_, bearer) = signed_up(&app, "dana").await;

    let (status, _) = send(&app, Method::GET, "/manager/gig_count/", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_gig_request_over_http() {
    let app = app().await;
    let (id, bearer) = signed_up(&app, "dana").await;

    let (status, gig) = send(
        &app,
        Method::POST,
        "/gig/create/",
        Some(&bearer),
        Some(json!({
            "quest": {
                "budget_cents": 2000,
                "items_requested": "roses",
                "pickup_location": MAIN_ST
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(gig["status"], "unclaimed");
    assert_eq!(gig["dater_id"], Value::String(id));

    let (status, _) = send(&app, Method::POST, "/gig/accept/", Some(&bearer), Some(json!({ "gig_id": gig["id"] }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_sign_out_ends_session() {
    let app = app().await;
    let (id, bearer) = signed_up(&app, "dana").await;

    let (status, body) = send(&app, Method::POST, "/user/sign_out/", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Signed out");

    let (status, _) = send(&app, Method::GET, &format!("/user/{}", id), Some(&bearer), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rating_routes_need_self_or_staff() {
    let app = app().await;
    let (dana, dana_bearer) = signed_up(&app, "dana").await;
    let (_, drew_bearer) = signed_up(&app, "drew").await;

    for uri in [format!("/dater/ratings/{}/", dana), format!("/dater/avg_rating/{}/", dana)] {
        let (status, body) = send(&app, Method::GET, &uri, Some(&drew_bearer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, Value::Null);
    }

    let (status, body) = send(&app, Method::GET, &format!("/dater/ratings/{}/", dana), Some(&dana_bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, Method::GET, &format!("/dater/avg_rating/{}/", dana), Some(&dana_bearer), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
