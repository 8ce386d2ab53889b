use chrono::Local;

use crate::{
    error::{AppError, Result},
    models::booking::Booking,
    state::AppState,
    validation::booking::BookingForm,
};

/// Validates and persists a booking, then queues the confirmation email.
///
/// The email is fire-and-forget: delivery failure never rolls back or fails
/// the booking.
pub async fn submit(state: &AppState, form: BookingForm) -> Result<Booking> {
    let today = Local::now().date_naive();
    let new = form.validate(today)?;

    let booking = state.store.create_booking(new).await?;
    tracing::info!("New booking saved with id {}", booking.id);

    state.mailer.dispatch_booking_confirmation(&booking);

    Ok(booking)
}

/// Returns all bookings, newest first.
pub async fn list(state: &AppState) -> Result<Vec<Booking>> {
    state.store.list_bookings().await
}

/// Marks a booking paid. Idempotent; unknown ids are NotFound.
pub async fn mark_paid(state: &AppState, id: &str) -> Result<Booking> {
    state
        .store
        .mark_paid(id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Deletes a booking. Unknown ids are NotFound.
pub async fn delete(state: &AppState, id: &str) -> Result<()> {
    if state.store.delete_booking(id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}
