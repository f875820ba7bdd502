use tracing::warn;

use crate::shared::AppError;

/// Hashes a password with bcrypt on the blocking pool
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| {
            warn!(error = %e, "Password hashing task failed");
            AppError::Internal
        })?
        .map_err(|e| {
            warn!(error = %e, "Password hashing failed");
            AppError::Internal
        })
}

/// Checks a password against a stored bcrypt hash
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| {
            warn!(error = %e, "Password verification task failed");
            AppError::Internal
        })?
        .map_err(|e| {
            warn!(error = %e, "Stored password hash is unreadable");
            AppError::Internal
        })
}
