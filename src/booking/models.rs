use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use strum_macros::EnumIter;

use crate::shared::AppError;

/// Lifecycle tag of a booking.
///
/// Every status may be set from every other; no transition graph is enforced.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Stored and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::InProgress => "In Progress",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for BookingStatus {
    type Error = AppError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "Pending" => Ok(BookingStatus::Pending),
            "Confirmed" => Ok(BookingStatus::Confirmed),
            "In Progress" | "InProgress" => Ok(BookingStatus::InProgress),
            "Completed" => Ok(BookingStatus::Completed),
            "Cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(AppError::Validation("Invalid status".to_string())),
        }
    }
}

/// A persisted booking
#[derive(Debug, Clone, PartialEq)]
pub struct BookingModel {
    pub id: i64,
    pub user_id: i64,
    pub service_type: String,
    pub vehicle_type: String,
    pub vehicle_model: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub description: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingModel {
    /// Sets the status and refreshes `updated_at`
    pub fn apply_status(&mut self, status: BookingStatus) {
        self.status = status;
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// Raw row of the bookings table; `status` is still text
#[derive(Debug, FromRow)]
pub struct BookingRow {
    pub id: i64,
    pub user_id: i64,
    pub service_type: String,
    pub vehicle_type: String,
    pub vehicle_model: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for BookingModel {
    type Error = AppError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::try_from(row.status.as_str()).map_err(|_| {
            AppError::DatabaseError(format!(
                "booking {} has unknown status {:?}",
                row.id, row.status
            ))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            service_type: row.service_type,
            vehicle_type: row.vehicle_type,
            vehicle_model: row.vehicle_model,
            preferred_date: row.preferred_date,
            preferred_time: row.preferred_time,
            description: row.description,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A booking that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i64,
    pub service_type: String,
    pub vehicle_type: String,
    pub vehicle_model: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub description: String,
}

impl NewBooking {
    /// Materializes the booking as `Pending` with the id handed out by the store
    pub fn into_model(self, id: i64) -> BookingModel {
        let now = Utc::now();
        BookingModel {
            id,
            user_id: self.user_id,
            service_type: self.service_type,
            vehicle_type: self.vehicle_type,
            vehicle_model: self.vehicle_model,
            preferred_date: self.preferred_date,
            preferred_time: self.preferred_time,
            description: self.description,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Per-owner booking counts, one bucket per status
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total: i64,
    pub confirmed: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl BookingStats {
    pub fn record(&mut self, status: BookingStatus) {
        self.total += 1;
        match status {
            BookingStatus::Pending => self.pending += 1,
            BookingStatus::Confirmed => self.confirmed += 1,
            BookingStatus::InProgress => self.in_progress += 1,
            BookingStatus::Completed => self.completed += 1,
            BookingStatus::Cancelled => self.cancelled += 1,
        }
    }
}

impl FromIterator<BookingStatus> for BookingStats {
    fn from_iter<I: IntoIterator<Item = BookingStatus>>(iter: I) -> Self {
        let mut stats = BookingStats::default();
        for status in iter {
            stats.record(status);
        }
        stats
    }
}
