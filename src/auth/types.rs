use serde::{Deserialize, Serialize};

use crate::shared::{require_field, require_secret, AppError};

/// JWT claims structure identifying the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: i64,
    pub username: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Identity established by a verified token, attached to protected requests
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Request payload for registering a new account
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub mobile_number: Option<String>,
}

/// Signup payload with every required field present
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub mobile_number: String,
}

impl TryFrom<SignupRequest> for SignupForm {
    type Error = AppError;

    fn try_from(request: SignupRequest) -> Result<Self, Self::Error> {
        match (
            require_field(request.username),
            require_secret(request.password),
            require_secret(request.confirm_password),
            require_field(request.mobile_number),
        ) {
            (Some(username), Some(password), Some(confirm_password), Some(mobile_number)) => {
                Ok(Self {
                    username,
                    password,
                    confirm_password,
                    mobile_number,
                })
            }
            _ => Err(AppError::Validation("All fields are required".to_string())),
        }
    }
}

/// Request payload for signing in
#[derive(Default, Deserialize)]
pub struct SigninRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

pub struct SigninForm {
    pub username: String,
    pub password: String,
}

impl TryFrom<SigninRequest> for SigninForm {
    type Error = AppError;

    fn try_from(request: SigninRequest) -> Result<Self, Self::Error> {
        match (
            require_field(request.username),
            require_secret(request.password),
        ) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(AppError::Validation(
                "Username and password are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SigninResponse {
    pub token: String,
    pub username: String,
}
