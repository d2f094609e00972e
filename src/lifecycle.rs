//! Booking lifecycle transitions.
//!
//! Every transition is a pure function from the current booking row plus
//! inputs to either the updated row or a [`ServiceError`]. The db layer
//! (`crate::db::bookings`) loads a row, applies one of these, and persists
//! the result, so the entire transition graph is testable without a
//! database.
//!
//! Status only ever advances (`Pending → Confirmed → InProgress →
//! Completed`); `Cancelled` is terminal and only reachable from `Pending`
//! or `Confirmed`.

use chrono::{DateTime, Utc};

use crate::codes;
use crate::error::ServiceError;
use crate::models::bookings::{FinalPaymentStatus, Model, PaymentMethod, PaymentStatus, Status};

/// Provider accepted and the up-front payment was captured. Generates the
/// start code the customer will hand over at the door.
pub fn confirm(
    mut booking: Model,
    payment_ref: &str,
    now: DateTime<Utc>,
) -> Result<Model, ServiceError> {
    if booking.status != Status::Pending {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot confirm a booking in status {:?}; only pending bookings can be confirmed",
            booking.status
        )));
    }

    booking.status = Status::Confirmed;
    booking.payment_status = PaymentStatus::Paid;
    booking.payment_intent_id = Some(payment_ref.to_string());
    booking.start_code = Some(codes::generate_code());
    booking.code_expires_at = Some(codes::compute_expiry(now));
    Ok(booking)
}

/// Provider submits the start code at the customer's door. On success the
/// job is running and a fresh completion code (with a fresh 24h window)
/// replaces the start code.
pub fn start_job(
    mut booking: Model,
    submitted_code: &str,
    now: DateTime<Utc>,
) -> Result<Model, ServiceError> {
    if booking.status != Status::Confirmed {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot start a job in status {:?}; only confirmed bookings can be started",
            booking.status
        )));
    }

    verify_code(
        booking.start_code.as_deref(),
        booking.code_expires_at,
        submitted_code,
        now,
    )?;

    booking.status = Status::InProgress;
    booking.job_started_at = Some(now);
    booking.completion_code = Some(codes::generate_code());
    booking.code_expires_at = Some(codes::compute_expiry(now));
    Ok(booking)
}

/// Provider records the final bill. Status is unchanged; completing the job
/// requires this to have happened.
pub fn submit_bill(
    mut booking: Model,
    amount: f64,
    details: Option<String>,
    now: DateTime<Utc>,
) -> Result<Model, ServiceError> {
    if booking.status != Status::InProgress {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot submit a bill for a booking in status {:?}; the job must be in progress",
            booking.status
        )));
    }

    booking.final_bill_amount = Some(amount);
    booking.bill_details = details;
    booking.bill_submitted_at = Some(now);
    Ok(booking)
}

/// Provider submits the completion code after billing. Code failures are
/// retryable; the caller persists the bumped attempt counter via
/// [`note_failed_attempt`].
pub fn complete_job(
    mut booking: Model,
    submitted_code: &str,
    now: DateTime<Utc>,
) -> Result<Model, ServiceError> {
    if booking.status != Status::InProgress {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot complete a job in status {:?}; the job must be in progress",
            booking.status
        )));
    }
    if !booking.bill_submitted() {
        return Err(ServiceError::InvalidTransition(
            "cannot complete a job before the final bill has been submitted".to_string(),
        ));
    }

    verify_code(
        booking.completion_code.as_deref(),
        booking.code_expires_at,
        submitted_code,
        now,
    )?;

    booking.status = Status::Completed;
    booking.job_completed_at = Some(now);
    Ok(booking)
}

/// Settle the final bill, by cash in hand or an online capture.
pub fn record_final_payment(
    mut booking: Model,
    payment_ref: &str,
    method: PaymentMethod,
    now: DateTime<Utc>,
) -> Result<Model, ServiceError> {
    if booking.status != Status::Completed {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot record a final payment for a booking in status {:?}",
            booking.status
        )));
    }

    booking.final_payment_id = Some(payment_ref.to_string());
    booking.final_payment_status = Some(FinalPaymentStatus::Completed);
    booking.paid_at = Some(now);
    booking.payment_method = Some(method);
    Ok(booking)
}

/// Cancellation is terminal and only allowed before the job has started.
/// Code fields are left untouched.
pub fn cancel(mut booking: Model) -> Result<Model, ServiceError> {
    match booking.status {
        Status::Pending | Status::Confirmed => {
            booking.status = Status::Cancelled;
            Ok(booking)
        }
        other => Err(ServiceError::InvalidTransition(format!(
            "cannot cancel a booking in status {other:?}; only pending or confirmed bookings can be cancelled"
        ))),
    }
}

/// Mark the booking rated. At most once, and only after completion.
pub fn rate(mut booking: Model) -> Result<Model, ServiceError> {
    if booking.status != Status::Completed {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot rate a booking in status {:?}; the job must be completed first",
            booking.status
        )));
    }
    if booking.rated {
        return Err(ServiceError::Duplicate(
            "this booking has already been rated".to_string(),
        ));
    }

    booking.rated = true;
    Ok(booking)
}

/// Bump the failed-verification counter. Tracked but never consulted —
/// there is no lockout, retries stay open for the life of the code.
pub fn note_failed_attempt(mut booking: Model) -> Model {
    booking.code_attempts += 1;
    booking
}

fn verify_code(
    stored: Option<&str>,
    expiry: Option<DateTime<Utc>>,
    submitted: &str,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    let stored = stored.ok_or_else(|| {
        ServiceError::InvalidTransition("no verification code on record".to_string())
    })?;
    let expiry = expiry.ok_or_else(|| {
        ServiceError::InvalidTransition("no code expiry on record".to_string())
    })?;

    if codes::is_expired(expiry, now) {
        return Err(ServiceError::CodeExpired);
    }
    if !codes::validate(submitted, stored) {
        return Err(ServiceError::CodeMismatch);
    }
    Ok(())
}
