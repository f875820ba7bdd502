use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestApp;

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `error` field of an error body
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

// ============================================================================
// Action Helpers
// ============================================================================

impl TestApp {
    /// Send a request through the router and decode the JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, body }
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn signup(&self, username: &str, password: &str, confirm: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/signup",
            None,
            Some(json!({
                "username": username,
                "password": password,
                "confirmPassword": confirm,
                "mobileNumber": "5551234",
            })),
        )
        .await
    }

    pub async fn signin(&self, username: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/signin",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Register and sign in, returning the bearer token
    pub async fn register_and_signin(&self, username: &str, password: &str) -> String {
        let signup = self.signup(username, password, password).await;
        assert_eq!(signup.status, StatusCode::CREATED, "{}", signup.body);

        let signin = self.signin(username, password).await;
        assert_eq!(signin.status, StatusCode::OK, "{}", signin.body);
        signin.body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_booking(&self, token: &str, service_type: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/bookings",
            Some(token),
            Some(json!({
                "serviceType": service_type,
                "vehicleType": "Sedan",
                "vehicleModel": "Civic",
                "preferredDate": "2024-06-01",
                "preferredTime": "10:00",
            })),
        )
        .await
    }

    pub async fn list_bookings(&self, token: &str) -> TestResponse {
        self.send(Method::GET, "/api/bookings", Some(token), None)
            .await
    }

    pub async fn update_status(&self, token: &str, booking_id: i64, status: &str) -> TestResponse {
        self.send(
            Method::PUT,
            &format!("/api/bookings/{}/status", booking_id),
            Some(token),
            Some(json!({ "status": status })),
        )
        .await
    }

    pub async fn cancel_booking(&self, token: &str, booking_id: i64) -> TestResponse {
        self.send(
            Method::DELETE,
            &format!("/api/bookings/{}", booking_id),
            Some(token),
            None,
        )
        .await
    }

    pub async fn booking_stats(&self, token: &str) -> TestResponse {
        self.send(Method::GET, "/api/bookings/stats", Some(token), None)
            .await
    }
}
