use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{NewUser, UserModel},
    password::hash_password,
    repository::UserRepository,
    types::UserSummary,
};
use crate::shared::AppError;

/// Credential store: owns user identities and their hashed passwords
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>, bcrypt_cost: u32) -> Self {
        Self {
            repository,
            bcrypt_cost,
        }
    }

    /// Registers a user, storing only the bcrypt hash of the password.
    ///
    /// The username is stored exactly as given so signin finds it verbatim.
    #[instrument(skip(self, password, mobile_number))]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        mobile_number: &str,
    ) -> Result<i64, AppError> {
        if username.trim().is_empty() || password.is_empty() || mobile_number.trim().is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        let password_hash = hash_password(password.to_string(), self.bcrypt_cost).await?;
        let user = self
            .repository
            .create_user(&NewUser {
                username: username.to_string(),
                password_hash,
                mobile_number: mobile_number.to_string(),
            })
            .await?;

        info!(user_id = user.id, "User registered");
        Ok(user.id)
    }

    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        self.repository.find_by_username(username).await
    }

    /// Lists every user without credentials
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let users = self.repository.list_users().await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }
}
