use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::{info, instrument};

use super::types::{SigninForm, SigninRequest, SigninResponse, SignupForm, SignupRequest, SignupResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for registering a new account
///
/// POST /api/signup
/// Returns 201 with the new user id
#[instrument(name = "signup", skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let Json(request) = payload?;
    let form = SignupForm::try_from(request)?;

    let user_id = state.auth_service.signup(form).await?;

    info!(user_id, "User created successfully");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user_id,
        }),
    ))
}

/// HTTP handler for signing in
///
/// POST /api/signin
/// Returns a bearer token valid for the configured window
#[instrument(name = "signin", skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<SigninResponse>, AppError> {
    let Json(request) = payload?;
    let form = SigninForm::try_from(request)?;

    let response = state.auth_service.signin(form).await?;

    info!(username = %response.username, "User signed in");

    Ok(Json(response))
}
