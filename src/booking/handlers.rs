use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{BookingStats, BookingStatus},
    service::BookingService,
    types::{BookingForm, BookingResponse, CreateBookingRequest, CreateBookingResponse, UpdateStatusRequest},
};
use crate::auth::AuthenticatedUser;
use crate::shared::{AppError, AppState, MessageResponse};

/// HTTP handler for creating a booking for the signed-in user
///
/// POST /api/bookings
/// Returns 201 with the stored record, status `Pending`
#[instrument(name = "create_booking", skip(state, user, payload), fields(user_id = user.user_id))]
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let Json(request) = payload?;
    let form = BookingForm::try_from(request)?;

    let service = BookingService::new(Arc::clone(&state.booking_repository));
    let booking = service.create_booking(user.user_id, form).await?;

    info!(booking_id = booking.id, "Booking created successfully");

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            message: "Booking created successfully".to_string(),
            booking: booking.into(),
        }),
    ))
}

/// HTTP handler for listing the signed-in user's bookings
///
/// GET /api/bookings
/// Most recently created first
#[instrument(name = "list_bookings", skip(state, user), fields(user_id = user.user_id))]
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let service = BookingService::new(Arc::clone(&state.booking_repository));
    let bookings = service.list_bookings(user.user_id).await?;

    info!(booking_count = bookings.len(), "Bookings listed successfully");

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// HTTP handler for changing a booking's status
///
/// PUT /api/bookings/:id/status
#[instrument(name = "update_booking_status", skip(state, user, booking_id, payload), fields(user_id = user.user_id))]
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    booking_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let status = match payload {
        Ok(Json(request)) => BookingStatus::try_from(request)?,
        Err(_) => return Err(AppError::Validation("Invalid status".to_string())),
    };
    let Path(booking_id) = booking_id?;

    let service = BookingService::new(Arc::clone(&state.booking_repository));
    service
        .update_status(booking_id, user.user_id, status)
        .await?;

    info!(booking_id, status = %status, "Booking status updated successfully");

    Ok(Json(MessageResponse::new(
        "Booking status updated successfully",
    )))
}

/// HTTP handler for cancelling a booking
///
/// DELETE /api/bookings/:id
/// Marks the booking `Cancelled`; the record stays listed
#[instrument(name = "cancel_booking", skip(state, user, booking_id), fields(user_id = user.user_id))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    booking_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(booking_id) = booking_id?;

    let service = BookingService::new(Arc::clone(&state.booking_repository));
    service.cancel_booking(booking_id, user.user_id).await?;

    info!(booking_id, "Booking cancelled successfully");

    Ok(Json(MessageResponse::new("Booking cancelled successfully")))
}

/// HTTP handler for the signed-in user's booking counts
///
/// GET /api/bookings/stats
#[instrument(name = "booking_stats", skip(state, user), fields(user_id = user.user_id))]
pub async fn booking_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<BookingStats>, AppError> {
    let service = BookingService::new(Arc::clone(&state.booking_repository));
    let stats = service.booking_stats(user.user_id).await?;

    Ok(Json(stats))
}
