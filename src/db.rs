use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, instrument};

use crate::config::DatabaseConfig;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL,
        mobile_number TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_BOOKINGS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        service_type TEXT NOT NULL,
        vehicle_type TEXT NOT NULL,
        vehicle_model TEXT NOT NULL,
        preferred_date DATE NOT NULL,
        preferred_time TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'Pending'
            CHECK (status IN ('Pending', 'Confirmed', 'In Progress', 'Completed', 'Cancelled')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_BOOKINGS_OWNER_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS bookings_user_id_created_at_idx
        ON bookings (user_id, created_at DESC)
"#;

/// Opens the bounded connection pool.
///
/// Requests beyond `max_connections` queue for up to `acquire_timeout`
/// before failing.
#[instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    info!("Database connection pool established");
    Ok(pool)
}

/// Creates the `users` and `bookings` tables if they do not exist yet
#[instrument(skip(pool))]
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in [
        CREATE_USERS_TABLE,
        CREATE_BOOKINGS_TABLE,
        CREATE_BOOKINGS_OWNER_INDEX,
    ] {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Database schema initialized");
    Ok(())
}

/// Closes the pool, waiting for checked-out connections to be returned
#[instrument(skip(pool))]
pub async fn close(pool: PgPool) {
    pool.close().await;
    info!("Database connection pool closed");
}
