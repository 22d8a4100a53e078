mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use db::models::tickets::{Model as TicketModel, NewTicket, TicketStatus};
use helpers::{get_json_body, make_test_app, seed_users};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel};
use serde_json::{json, Value};
use serial_test::serial;
use tower::ServiceExt;

fn authed_json(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));

    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
#[serial]
async fn settings_default_to_disabled_with_week_threshold() {
    let app = make_test_app().await;
    let users = seed_users(&app.state).await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json("GET", "/api/settings", &users.staff_token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = get_json_body(response).await;
    assert_eq!(body["data"]["email_new_ticket"], false);
    assert_eq!(body["data"]["email_status_change"], false);
    assert_eq!(body["data"]["email_admin_old_tickets"], false);
    assert_eq!(body["data"]["email_admin_old_tickets_days"], 7);
    assert_eq!(body["data"]["email_admin_address"], Value::Null);
}

#[tokio::test]
#[serial]
async fn admin_can_write_settings_and_read_them_back() {
    let app = make_test_app().await;
    let users = seed_users(&app.state).await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "PUT",
            "/api/settings",
            &users.admin_token,
            Some(json!({
                "email_admin_address": "owner@shop.example",
                "email_new_ticket": true,
                "email_admin_old_tickets_days": 14,
                "terms_and_conditions": "Repairs are warranted for 90 days."
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(authed_json("GET", "/api/settings", &users.staff_token, None))
        .await
        .unwrap();
    let body = get_json_body(response).await;
    assert_eq!(body["data"]["email_admin_address"], "owner@shop.example");
    assert_eq!(body["data"]["email_new_ticket"], true);
    assert_eq!(body["data"]["email_admin_old_tickets_days"], 14);
    assert_eq!(
        body["data"]["terms_and_conditions"],
        "Repairs are warranted for 90 days."
    );
}

#[tokio::test]
#[serial]
async fn non_admin_cannot_write_settings() {
    let app = make_test_app().await;
    let users = seed_users(&app.state).await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "PUT",
            "/api/settings",
            &users.staff_token,
            Some(json!({"email_new_ticket": true})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn old_tickets_check_reports_whether_a_digest_went_out() {
    let app = make_test_app().await;
    let users = seed_users(&app.state).await;
    let db = app.state.db();

    services::settings::set(db, services::settings::SettingKey::NotifyOldTickets, "true")
        .await
        .unwrap();
    services::settings::set(
        db,
        services::settings::SettingKey::AdminEmail,
        "owner@shop.example",
    )
    .await
    .unwrap();

    // Nothing stale yet.
    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/api/system/old-tickets-check",
            &users.admin_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = get_json_body(response).await;
    assert_eq!(body["data"]["sent"], false);

    // Backdate one open ticket past the threshold.
    let ticket = TicketModel::create(
        db,
        NewTicket {
            customer_name: "Grace Hopper".to_string(),
            customer_email: "grace@example.com".to_string(),
            device_type: "Phone".to_string(),
            description: "Cracked screen".to_string(),
            user_id: users.staff.id,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let mut active = db::models::Ticket::find_by_id(ticket.id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .into_active_model();
    active.created_at = Set(Utc::now() - Duration::days(10));
    active.status = Set(TicketStatus::Intake);
    active.update(db).await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/api/system/old-tickets-check",
            &users.admin_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = get_json_body(response).await;
    assert_eq!(body["data"]["sent"], true);

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html_body.contains(&ticket.ticket_number));
}

#[tokio::test]
#[serial]
async fn old_tickets_check_requires_admin() {
    let app = make_test_app().await;
    let users = seed_users(&app.state).await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/api/system/old-tickets-check",
            &users.staff_token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
