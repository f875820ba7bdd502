use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::types::UserSummary;
use crate::shared::{AppError, AppState};

/// HTTP handler for the diagnostic user listing
///
/// GET /api/users
/// Returns id, username, mobile number and creation time; never credentials
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = state.user_service.list_users().await?;

    info!(user_count = users.len(), "Users listed successfully");

    Ok(Json(users))
}
