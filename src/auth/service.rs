use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use super::{
    token::TokenConfig,
    types::{AuthenticatedUser, SigninForm, SigninResponse, SignupForm},
};
use crate::{
    config::AuthConfig,
    shared::AppError,
    user::{
        password::{hash_password, verify_password},
        UserService,
    },
};

/// Service for handling registration, sign-in and token verification
pub struct AuthService {
    user_service: Arc<UserService>,
    token_config: TokenConfig,
    bcrypt_cost: u32,
    /// Hash checked for unknown usernames, built on first use
    decoy_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, config: &AuthConfig) -> Self {
        Self {
            user_service,
            token_config: TokenConfig::from(config),
            bcrypt_cost: config.bcrypt_cost,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Registers an account after checking the password confirmation
    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn signup(&self, form: SignupForm) -> Result<i64, AppError> {
        if form.password != form.confirm_password {
            warn!("Signup rejected: passwords do not match");
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        let user_id = self
            .user_service
            .register(&form.username, &form.password, &form.mobile_number)
            .await?;

        info!(user_id, "Signup completed");
        Ok(user_id)
    }

    /// Checks credentials and issues a token.
    ///
    /// An unknown username and a wrong password produce the same
    /// `InvalidCredentials` error.
    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn signin(&self, form: SigninForm) -> Result<SigninResponse, AppError> {
        let Some(user) = self.user_service.find_by_username(&form.username).await? else {
            // Unknown users pay for the same bcrypt verify as a wrong password
            let decoy_hash = self
                .decoy_hash
                .get_or_try_init(|| hash_password(String::new(), self.bcrypt_cost))
                .await?;
            verify_password(form.password, decoy_hash.clone()).await?;
            warn!("Signin rejected");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(form.password, user.password_hash.clone()).await? {
            warn!("Signin rejected");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.token_config.create_token(user.id, &user.username)?;
        info!(user_id = user.id, "Signin succeeded, token issued");

        Ok(SigninResponse {
            token,
            username: user.username,
        })
    }

    /// Verifies a bearer token and returns the identity it asserts
    #[instrument(skip(self, token))]
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        self.token_config
            .validate_token(token)
            .map(AuthenticatedUser::from)
    }
}
