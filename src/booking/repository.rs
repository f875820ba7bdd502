use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{BookingModel, BookingRow, BookingStats, BookingStatus, NewBooking};
use crate::shared::AppError;

const BOOKING_COLUMNS: &str = "id, user_id, service_type, vehicle_type, vehicle_model, \
     preferred_date, preferred_time, description, status, created_at, updated_at";

/// Trait for booking repository operations.
///
/// Every read or write is scoped to an owner; a booking owned by someone else
/// behaves exactly like a missing one.
#[async_trait]
pub trait BookingRepository {
    async fn create_booking(&self, booking: &NewBooking) -> Result<BookingModel, AppError>;

    /// Bookings of `owner_id`, most recently created first
    async fn list_bookings_by_owner(&self, owner_id: i64) -> Result<Vec<BookingModel>, AppError>;

    /// Atomically checks ownership and sets the status.
    /// Returns `None` when no booking with that id belongs to `owner_id`.
    async fn set_status(
        &self,
        booking_id: i64,
        owner_id: i64,
        status: BookingStatus,
    ) -> Result<Option<BookingModel>, AppError>;

    /// Status counts taken from one consistent snapshot
    async fn booking_stats(&self, owner_id: i64) -> Result<BookingStats, AppError>;
}

#[derive(Default)]
struct BookingTable {
    rows: BTreeMap<i64, BookingModel>,
    last_id: i64,
}

/// In-memory implementation of BookingRepository for development and testing
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<BookingTable>,
}

impl InMemoryBookingRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current number of bookings across all owners
    pub async fn booking_count(&self) -> usize {
        self.bookings.read().await.rows.len()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    #[instrument(skip(self, booking), fields(owner_id = booking.user_id))]
    async fn create_booking(&self, booking: &NewBooking) -> Result<BookingModel, AppError> {
        let mut bookings = self.bookings.write().await;
        bookings.last_id += 1;
        let model = booking.clone().into_model(bookings.last_id);
        bookings.rows.insert(model.id, model.clone());

        debug!(booking_id = model.id, "Booking created in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn list_bookings_by_owner(&self, owner_id: i64) -> Result<Vec<BookingModel>, AppError> {
        let bookings = self.bookings.read().await;
        let mut owned: Vec<BookingModel> = bookings
            .rows
            .values()
            .filter(|b| b.user_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        debug!(booking_count = owned.len(), "Bookings listed from memory");
        Ok(owned)
    }

    #[instrument(skip(self))]
    async fn set_status(
        &self,
        booking_id: i64,
        owner_id: i64,
        status: BookingStatus,
    ) -> Result<Option<BookingModel>, AppError> {
        let mut bookings = self.bookings.write().await;

        let Some(booking) = bookings
            .rows
            .get_mut(&booking_id)
            .filter(|b| b.user_id == owner_id)
        else {
            debug!("Booking not found for owner in memory");
            return Ok(None);
        };

        booking.apply_status(status);
        debug!(status = %status, "Booking status updated in memory");
        Ok(Some(booking.clone()))
    }

    #[instrument(skip(self))]
    async fn booking_stats(&self, owner_id: i64) -> Result<BookingStats, AppError> {
        // One read guard covers the whole count
        let bookings = self.bookings.read().await;
        Ok(bookings
            .rows
            .values()
            .filter(|b| b.user_id == owner_id)
            .map(|b| b.status)
            .collect())
    }
}

/// PostgreSQL implementation of booking repository
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    #[instrument(skip(self, booking), fields(owner_id = booking.user_id))]
    async fn create_booking(&self, booking: &NewBooking) -> Result<BookingModel, AppError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "INSERT INTO bookings \
             (user_id, service_type, vehicle_type, vehicle_model, preferred_date, preferred_time, description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking.user_id)
        .bind(&booking.service_type)
        .bind(&booking.vehicle_type)
        .bind(&booking.vehicle_model)
        .bind(booking.preferred_date)
        .bind(&booking.preferred_time)
        .bind(&booking.description)
        .bind(BookingStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create booking in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(booking_id = row.id, "Booking created in database");
        BookingModel::try_from(row)
    }

    #[instrument(skip(self))]
    async fn list_bookings_by_owner(&self, owner_id: i64) -> Result<Vec<BookingModel>, AppError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list bookings from database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(booking_count = rows.len(), "Bookings listed from database");
        rows.into_iter().map(BookingModel::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn set_status(
        &self,
        booking_id: i64,
        owner_id: i64,
        status: BookingStatus,
    ) -> Result<Option<BookingModel>, AppError> {
        // Ownership check and write in a single statement
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = $3, updated_at = GREATEST(NOW(), updated_at) \
             WHERE id = $1 AND user_id = $2 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id)
        .bind(owner_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update booking status in database");
            AppError::DatabaseError(e.to_string())
        })?;

        match row {
            Some(row) => {
                debug!(status = %status, "Booking status updated in database");
                BookingModel::try_from(row).map(Some)
            }
            None => {
                debug!("Booking not found for owner in database");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    async fn booking_stats(&self, owner_id: i64) -> Result<BookingStats, AppError> {
        sqlx::query_as::<_, BookingStats>(
            "SELECT \
                COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE status = $2) AS pending, \
                COUNT(*) FILTER (WHERE status = $3) AS confirmed, \
                COUNT(*) FILTER (WHERE status = $4) AS in_progress, \
                COUNT(*) FILTER (WHERE status = $5) AS completed, \
                COUNT(*) FILTER (WHERE status = $6) AS cancelled \
             FROM bookings WHERE user_id = $1",
        )
        .bind(owner_id)
        .bind(BookingStatus::Pending.as_str())
        .bind(BookingStatus::Confirmed.as_str())
        .bind(BookingStatus::InProgress.as_str())
        .bind(BookingStatus::Completed.as_str())
        .bind(BookingStatus::Cancelled.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to compute booking stats in database");
            AppError::DatabaseError(e.to_string())
        })
    }
}
