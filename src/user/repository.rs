use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{NewUser, UserModel};
use crate::shared::AppError;

/// Postgres error code for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    /// Persists a new user; fails with `DuplicateUsername` if the name is taken
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError>;
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError>;
}

#[derive(Default)]
struct UserTable {
    rows: BTreeMap<i64, UserModel>,
    last_id: i64,
}

/// In-memory implementation of UserRepository for development and testing
///
/// Data is stored in memory and will be lost when the application restarts.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current number of users in the repository
    pub async fn user_count(&self) -> usize {
        self.users.read().await.rows.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!("Creating user in memory");

        let mut users = self.users.write().await;
        if users.rows.values().any(|u| u.username == user.username) {
            warn!("Username already exists in memory");
            return Err(AppError::DuplicateUsername);
        }

        users.last_id += 1;
        let model = user.clone().into_model(users.last_id);
        users.rows.insert(model.id, model.clone());

        debug!(user_id = model.id, "User created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        let users = self.users.read().await;
        let user = users
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned();

        debug!(found = user.is_some(), "Looked up user in memory");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let users = self.users.read().await;
        Ok(users.rows.values().cloned().collect())
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!("Creating user in database");

        let model = sqlx::query_as::<_, UserModel>(
            "INSERT INTO users (username, password, mobile_number) VALUES ($1, $2, $3) \
             RETURNING id, username, password, mobile_number, created_at",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.mobile_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                warn!("Username already exists in database");
                AppError::DuplicateUsername
            }
            _ => {
                warn!(error = %e, "Failed to create user in database");
                AppError::DatabaseError(e.to_string())
            }
        })?;

        debug!(user_id = model.id, "User created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        let user = sqlx::query_as::<_, UserModel>(
            "SELECT id, username, password, mobile_number, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(found = user.is_some(), "Looked up user in database");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT id, username, password, mobile_number, created_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list users from database");
            AppError::DatabaseError(e.to_string())
        })
    }
}
