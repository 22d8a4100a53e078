mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use helpers::{get_json_body, make_test_app, seed_users};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

fn login_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
#[serial]
async fn login_returns_token_for_valid_credentials() {
    let app = make_test_app().await;
    seed_users(&app.state).await;

    let response = app
        .router
        .clone()
        .oneshot(login_request(json!({
            "email": "tech@shop.example",
            "password": "techpass"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = get_json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "tech");
    assert_eq!(body["data"]["admin"], false);
    assert!(body["data"]["token"].as_str().unwrap().len() > 20);
}

#[tokio::test]
#[serial]
async fn login_rejects_wrong_password() {
    let app = make_test_app().await;
    seed_users(&app.state).await;

    let response = app
        .router
        .clone()
        .oneshot(login_request(json!({
            "email": "tech@shop.example",
            "password": "wrong"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = get_json_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[serial]
async fn login_rejects_unknown_email() {
    let app = make_test_app().await;
    seed_users(&app.state).await;

    let response = app
        .router
        .clone()
        .oneshot(login_request(json!({
            "email": "ghost@shop.example",
            "password": "techpass"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn login_rejects_malformed_email() {
    let app = make_test_app().await;
    seed_users(&app.state).await;

    let response = app
        .router
        .clone()
        .oneshot(login_request(json!({
            "email": "not-an-email",
            "password": "techpass"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn protected_routes_require_a_token() {
    let app = make_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/tickets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
