use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{BookingModel, BookingStats, BookingStatus, NewBooking},
    repository::BookingRepository,
    types::BookingForm,
};
use crate::shared::AppError;

/// Service for handling booking business logic
pub struct BookingService {
    repository: Arc<dyn BookingRepository + Send + Sync>,
}

impl BookingService {
    pub fn new(repository: Arc<dyn BookingRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Creates a `Pending` booking owned by `owner_id`
    #[instrument(skip(self, form))]
    pub async fn create_booking(
        &self,
        owner_id: i64,
        form: BookingForm,
    ) -> Result<BookingModel, AppError> {
        let booking = self
            .repository
            .create_booking(&NewBooking {
                user_id: owner_id,
                service_type: form.service_type,
                vehicle_type: form.vehicle_type,
                vehicle_model: form.vehicle_model,
                preferred_date: form.preferred_date,
                preferred_time: form.preferred_time,
                description: form.description,
            })
            .await?;

        info!(booking_id = booking.id, "Booking created");
        Ok(booking)
    }

    #[instrument(skip(self))]
    pub async fn list_bookings(&self, owner_id: i64) -> Result<Vec<BookingModel>, AppError> {
        self.repository.list_bookings_by_owner(owner_id).await
    }

    /// Sets any status on a booking owned by `owner_id`.
    ///
    /// Missing and foreign bookings both yield `NotFound`.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        booking_id: i64,
        owner_id: i64,
        status: BookingStatus,
    ) -> Result<BookingModel, AppError> {
        match self
            .repository
            .set_status(booking_id, owner_id, status)
            .await?
        {
            Some(booking) => {
                info!(status = %booking.status, "Booking status updated");
                Ok(booking)
            }
            None => {
                warn!("Booking not found or not owned by caller");
                Err(AppError::NotFound("Booking not found".to_string()))
            }
        }
    }

    /// Cancels a booking regardless of its current status; the row is kept
    #[instrument(skip(self))]
    pub async fn cancel_booking(
        &self,
        booking_id: i64,
        owner_id: i64,
    ) -> Result<BookingModel, AppError> {
        self.update_status(booking_id, owner_id, BookingStatus::Cancelled)
            .await
    }

    #[instrument(skip(self))]
    pub async fn booking_stats(&self, owner_id: i64) -> Result<BookingStats, AppError> {
        self.repository.booking_stats(owner_id).await
    }
}
