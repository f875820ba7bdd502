// Public API - what other modules can use
pub use handlers::{booking_stats, cancel_booking, create_booking, list_bookings, update_booking_status};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
