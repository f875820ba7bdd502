use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::models::{BookingModel, BookingStatus};
use crate::shared::{require_field, AppError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Request payload for creating a booking
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub service_type: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_model: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub description: Option<String>,
}

/// Booking fields after boundary validation
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub service_type: String,
    pub vehicle_type: String,
    pub vehicle_model: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub description: String,
}

impl TryFrom<CreateBookingRequest> for BookingForm {
    type Error = AppError;

    fn try_from(request: CreateBookingRequest) -> Result<Self, Self::Error> {
        let (
            Some(service_type),
            Some(vehicle_type),
            Some(vehicle_model),
            Some(preferred_date),
            Some(preferred_time),
        ) = (
            require_field(request.service_type),
            require_field(request.vehicle_type),
            require_field(request.vehicle_model),
            require_field(request.preferred_date),
            require_field(request.preferred_time),
        )
        else {
            return Err(AppError::Validation(
                "All required fields must be provided".to_string(),
            ));
        };

        let preferred_date = NaiveDate::parse_from_str(preferred_date.trim(), DATE_FORMAT)
            .map_err(|_| {
                AppError::Validation("preferredDate must be a YYYY-MM-DD date".to_string())
            })?;

        Ok(Self {
            service_type,
            vehicle_type,
            vehicle_model,
            preferred_date,
            preferred_time,
            description: request.description.unwrap_or_default(),
        })
    }
}

/// Request payload for changing a booking's status
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

impl TryFrom<UpdateStatusRequest> for BookingStatus {
    type Error = AppError;

    fn try_from(request: UpdateStatusRequest) -> Result<Self, Self::Error> {
        request
            .status
            .as_deref()
            .ok_or_else(|| AppError::Validation("Invalid status".to_string()))
            .and_then(BookingStatus::try_from)
    }
}

/// Booking record as seen by its owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i64,
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

impl From<BookingModel> for BookingResponse {
    fn from(booking: BookingModel) -> Self {
        Self {
            id: booking.id,
            service_type: booking.service_type,
            vehicle_type: booking.vehicle_type,
            vehicle_model: booking.vehicle_model,
            preferred_date: booking.preferred_date,
            preferred_time: booking.preferred_time,
            description: booking.description,
            status: booking.status,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Response for booking creation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CreateBookingResponse {
    pub message: String,
    pub booking: BookingResponse,
}
