use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::json;

mod utils;

use utils::*;

fn updated_at(booking: &serde_json::Value) -> DateTime<Utc> {
    booking["updatedAt"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_full_booking_lifecycle() {
    let app = TestAppBuilder::new().build();

    let signup = app.signup("alice", "pw1234", "pw1234").await;
    assert_eq!(signup.status, StatusCode::CREATED);
    assert!(signup.body["userId"].as_i64().is_some());

    let signin = app.signin("alice", "pw1234").await;
    assert_eq!(signin.status, StatusCode::OK);
    assert_eq!(signin.body["username"], "alice");
    let token = signin.body["token"].as_str().unwrap().to_string();

    let created = app.create_booking(&token, "Oil Change").await;
    assert_eq!(created.status, StatusCode::CREATED);
    let booking = &created.body["booking"];
    let booking_id = booking["id"].as_i64().unwrap();
    assert_eq!(booking["status"], "Pending");
    assert_eq!(booking["serviceType"], "Oil Change");
    assert_eq!(booking["preferredDate"], "2024-06-01");
    assert_eq!(booking["description"], "");

    let listed = app.list_bookings(&token).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["status"], "Pending");
    let before = updated_at(&listed.body[0]);

    let confirmed = app.update_status(&token, booking_id, "Confirmed").await;
    assert_eq!(confirmed.status, StatusCode::OK);
    let listed = app.list_bookings(&token).await;
    assert_eq!(listed.body[0]["status"], "Confirmed");
    assert!(updated_at(&listed.body[0]) >= before);

    let cancelled = app.cancel_booking(&token, booking_id).await;
    assert_eq!(cancelled.status, StatusCode::OK);
    let listed = app.list_bookings(&token).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["status"], "Cancelled");

    let stats = app.booking_stats(&token).await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(
        stats.body,
        json!({
            "total": 1,
            "confirmed": 0,
            "pending": 0,
            "inProgress": 0,
            "completed": 0,
            "cancelled": 1,
        })
    );
}

#[tokio::test]
async fn test_signin_failures_look_the_same() {
    let app = TestAppBuilder::new().build();
    app.register_and_signin("alice", "pw1234").await;

    let wrong_password = app.signin("alice", "wrong").await;
    let unknown_user = app.signin("mallory", "pw1234").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let app = TestAppBuilder::new().build();
    app.register_and_signin("alice", "pw1234").await;

    let second = app.signup("alice", "other1", "other1").await;

    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.error(), "Username already exists");
    assert_eq!(app.user_repository.user_count().await, 1);
}

#[tokio::test]
async fn test_password_mismatch_creates_no_account() {
    let app = TestAppBuilder::new().build();

    let signup = app.signup("alice", "pw1234", "pw9999").await;

    assert_eq!(signup.status, StatusCode::BAD_REQUEST);
    assert_eq!(signup.error(), "Passwords do not match");
    assert_eq!(app.user_repository.user_count().await, 0);
    assert_eq!(
        app.signin("alice", "pw1234").await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_other_users_booking_is_not_found() {
    let app = TestAppBuilder::new().build();
    let alice = app.register_and_signin("alice", "pw1234").await;
    let bob = app.register_and_signin("bob", "pw5678").await;

    let created = app.create_booking(&alice, "Oil Change").await;
    let booking_id = created.body["booking"]["id"].as_i64().unwrap();

    let update = app.update_status(&bob, booking_id, "Completed").await;
    let cancel = app.cancel_booking(&bob, booking_id).await;
    let missing = app.cancel_booking(&bob, booking_id + 1000).await;

    assert_eq!(update.status, StatusCode::NOT_FOUND);
    assert_eq!(cancel.status, StatusCode::NOT_FOUND);
    assert_eq!(cancel.body, missing.body);

    assert!(app.list_bookings(&bob).await.body.as_array().unwrap().is_empty());
    assert_eq!(app.list_bookings(&alice).await.body[0]["status"], "Pending");
    assert_eq!(app.booking_stats(&bob).await.body["total"], 0);
}

#[tokio::test]
async fn test_booking_routes_require_token() {
    let app = TestAppBuilder::new().build();

    let without_token = app.send(Method::GET, "/api/bookings", None, None).await;
    let bad_token = app.list_bookings("not-a-token").await;

    assert_eq!(without_token.status, StatusCode::UNAUTHORIZED);
    assert_eq!(without_token.error(), "Access token required");
    assert_eq!(bad_token.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad_token.error(), "Invalid or expired token");
    assert_eq!(app.booking_repository.booking_count().await, 0);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestAppBuilder::new()
        .with_token_expiration_hours(-2)
        .build();
    let token = app.register_and_signin("alice", "pw1234").await;

    let response = app.create_booking(&token, "Oil Change").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.booking_repository.booking_count().await, 0);
}

#[tokio::test]
async fn test_invalid_status_leaves_booking_untouched() {
    let app = TestAppBuilder::new().build();
    let token = app.register_and_signin("alice", "pw1234").await;
    let created = app.create_booking(&token, "Oil Change").await;
    let booking_id = created.body["booking"]["id"].as_i64().unwrap();

    let response = app.update_status(&token, booking_id, "Archived").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Invalid status");
    assert_eq!(app.list_bookings(&token).await.body[0]["status"], "Pending");
}

#[tokio::test]
async fn test_stats_track_every_status() {
    let app = TestAppBuilder::new().build();
    let token = app.register_and_signin("alice", "pw1234").await;

    for (service_type, status) in [
        ("Oil Change", "Confirmed"),
        ("Tyres", "In Progress"),
        ("Brakes", "Completed"),
        ("Detailing", "Pending"),
    ] {
        let created = app.create_booking(&token, service_type).await;
        let booking_id = created.body["booking"]["id"].as_i64().unwrap();
        let updated = app.update_status(&token, booking_id, status).await;
        assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    }

    let stats = app.booking_stats(&token).await.body;
    assert_eq!(stats["total"], 4);
    assert_eq!(stats["confirmed"], 1);
    assert_eq!(stats["inProgress"], 1);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["cancelled"], 0);
}

#[tokio::test]
async fn test_bookings_listed_newest_first() {
    let app = TestAppBuilder::new().build();
    let token = app.register_and_signin("alice", "pw1234").await;

    app.create_booking(&token, "Oil Change").await;
    app.create_booking(&token, "Tyres").await;

    let listed = app.list_bookings(&token).await.body;
    assert_eq!(listed[0]["serviceType"], "Tyres");
    assert_eq!(listed[1]["serviceType"], "Oil Change");
}

#[tokio::test]
async fn test_user_listing_hides_credentials() {
    let app = TestAppBuilder::new().build();
    app.register_and_signin("alice", "pw1234").await;

    let response = app.send(Method::GET, "/api/users", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let user = response.body[0].as_object().unwrap();
    assert_eq!(user["username"], "alice");
    assert_eq!(user["mobileNumber"], "5551234");
    assert!(!user.contains_key("password"));
    assert!(!user.contains_key("passwordHash"));
    assert!(!response.body.to_string().contains("pw1234"));
}

#[tokio::test]
async fn test_padded_username_signs_in_as_registered() {
    let app = TestAppBuilder::new().build();

    let signup = app.signup("alice ", "pw1234", "pw1234").await;
    assert_eq!(signup.status, StatusCode::CREATED);

    let signin = app.signin("alice ", "pw1234").await;
    assert_eq!(signin.status, StatusCode::OK, "{}", signin.body);
    assert_eq!(signin.body["username"], "alice ");

    let token = signin.body["token"].as_str().unwrap();
    let created = app.create_booking(token, "Oil Change").await;
    assert_eq!(created.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_whitespace_password_round_trip() {
    let app = TestAppBuilder::new().build();

    let signup = app.signup("bob", "    ", "    ").await;
    assert_eq!(signup.status, StatusCode::CREATED, "{}", signup.body);

    let signin = app.signin("bob", "    ").await;
    assert_eq!(signin.status, StatusCode::OK);
    assert_eq!(
        app.signin("bob", "").await.status,
        StatusCode::BAD_REQUEST
    );
}
