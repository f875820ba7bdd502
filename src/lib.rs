// Library crate for the car service booking server
// This file exposes the public API for integration tests

pub mod app;
pub mod auth;
pub mod booking;
pub mod config;
pub mod db;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use booking::{
    models::{BookingStats, BookingStatus},
    repository::{BookingRepository, InMemoryBookingRepository, PostgresBookingRepository},
};
pub use config::{AppConfig, AuthConfig};
pub use shared::{AppError, AppState};
pub use user::repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
