use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, booking, shared::AppState, user};

/// Builds the HTTP router.
///
/// Booking routes sit behind the bearer-token gate; signup, signin, the user
/// listing and the health probe are open.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/bookings",
            post(booking::create_booking).get(booking::list_bookings),
        )
        .route("/api/bookings/stats", get(booking::booking_stats))
        .route(
            "/api/bookings/:id/status",
            put(booking::update_booking_status),
        )
        .route("/api/bookings/:id", delete(booking::cancel_booking))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::jwt_auth,
        ));

    Router::new()
        .route("/api/health", get(health))
        .route("/api/signup", post(auth::signup))
        .route("/api/signin", post(auth::signin))
        .route("/api/users", get(user::list_users))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
