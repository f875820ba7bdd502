use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::service::AuthService;
use crate::booking::repository::BookingRepository;
use crate::config::AuthConfig;
use crate::user::{repository::UserRepository, UserService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub booking_repository: Arc<dyn BookingRepository + Send + Sync>,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        booking_repository: Arc<dyn BookingRepository + Send + Sync>,
        auth_config: &AuthConfig,
    ) -> Self {
        let user_service = Arc::new(UserService::new(user_repository, auth_config.bcrypt_cost));
        let auth_service = Arc::new(AuthService::new(Arc::clone(&user_service), auth_config));

        Self {
            user_service,
            auth_service,
            booking_repository,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DuplicateUsername => {
                (StatusCode::BAD_REQUEST, "Username already exists".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            internal @ (AppError::JwtError(_) | AppError::DatabaseError(_) | AppError::Internal) => {
                // Detail stays in the log, never in the response
                error!(error = %internal, "Request failed with an internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected request body");
        AppError::Validation("Invalid request body".to_string())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        // A malformed id can never name a booking
        warn!(error = %rejection.body_text(), "Rejected path parameter");
        AppError::NotFound("Booking not found".to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

/// Returns the field value if it is present and not blank.
pub fn require_field(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Returns the secret if it is present and non-empty; whitespace is a valid secret.
pub fn require_secret(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Plain `{"message": ...}` response body
#[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
