//! Tests for the booking transition graph. The lifecycle functions are
//! pure (row in, row out), so the whole state machine is exercised here
//! without a database.

use chrono::{Duration, Utc};
use uuid::Uuid;

use homeserve_backend::error::ServiceError;
use homeserve_backend::lifecycle;
use homeserve_backend::models::bookings::{
    BookingResponse, FinalPaymentStatus, Model as Booking, PaymentMethod, PaymentStatus, Status,
};

fn pending_booking() -> Booking {
    Booking {
        id: Uuid::new_v4(),
        customer_id: Uuid::new_v4(),
        provider_id: Uuid::new_v4(),
        service: "Deep cleaning".to_string(),
        address: "12 Rosewood Lane".to_string(),
        scheduled_date: Utc::now() + Duration::days(2),
        time_slot: "09:00-12:00".to_string(),
        duration_hours: 3.0,
        hourly_rate: 40.0,
        total_price: 120.0,
        status: Status::Pending,
        payment_status: PaymentStatus::Unpaid,
        payment_intent_id: None,
        start_code: None,
        completion_code: None,
        code_expires_at: None,
        code_attempts: 0,
        job_started_at: None,
        job_completed_at: None,
        final_bill_amount: None,
        bill_details: None,
        bill_submitted_at: None,
        final_payment_id: None,
        final_payment_status: None,
        paid_at: None,
        payment_method: None,
        rated: false,
        created_at: Utc::now(),
    }
}

#[test]
fn test_confirm_issues_start_code_and_marks_paid() {
    let now = Utc::now();
    let booking = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();

    assert_eq!(booking.status, Status::Confirmed);
    assert_eq!(booking.payment_status, PaymentStatus::Paid);
    assert_eq!(booking.payment_intent_id.as_deref(), Some("pay_123"));
    assert_eq!(booking.start_code.as_ref().unwrap().len(), 6);
    assert_eq!(booking.code_expires_at, Some(now + Duration::hours(24)));
}

#[test]
fn test_confirm_rejected_outside_pending() {
    let now = Utc::now();
    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();

    let err = lifecycle::confirm(confirmed, "pay_456", now).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[test]
fn test_start_job_rejected_from_pending() {
    let err = lifecycle::start_job(pending_booking(), "123456", Utc::now()).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[test]
fn test_start_job_with_wrong_code_is_retryable_mismatch() {
    let now = Utc::now();
    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();

    // A 6-digit code that cannot collide with the stored one.
    let wrong = if confirmed.start_code.as_deref() == Some("111111") {
        "222222"
    } else {
        "111111"
    };

    let err = lifecycle::start_job(confirmed, wrong, now).unwrap_err();
    assert!(matches!(err, ServiceError::CodeMismatch));
    assert!(err.is_retryable());
}

#[test]
fn test_start_job_with_expired_code() {
    let now = Utc::now();
    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();
    let code = confirmed.start_code.clone().unwrap();

    let after_expiry = now + Duration::hours(24);
    let err = lifecycle::start_job(confirmed, &code, after_expiry).unwrap_err();
    assert!(matches!(err, ServiceError::CodeExpired));
}

#[test]
fn test_start_job_accepts_whitespace_padded_code() {
    let now = Utc::now();
    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();
    let padded = format!(" {} ", confirmed.start_code.as_deref().unwrap());

    let started = lifecycle::start_job(confirmed, &padded, now).unwrap();
    assert_eq!(started.status, Status::InProgress);
}

#[test]
fn test_start_job_rotates_completion_code() {
    let now = Utc::now();
    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();
    let start_code = confirmed.start_code.clone().unwrap();

    let later = now + Duration::hours(23);
    let started = lifecycle::start_job(confirmed, &start_code, later).unwrap();

    assert_eq!(started.status, Status::InProgress);
    assert_eq!(started.job_started_at, Some(later));
    assert_eq!(started.completion_code.as_ref().unwrap().len(), 6);
    // The completion code got a fresh 24h window from the start instant.
    assert_eq!(started.code_expires_at, Some(later + Duration::hours(24)));
}

#[test]
fn test_complete_before_bill_is_rejected() {
    let now = Utc::now();
    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();
    let start_code = confirmed.start_code.clone().unwrap();
    let started = lifecycle::start_job(confirmed, &start_code, now).unwrap();
    let completion_code = started.completion_code.clone().unwrap();

    let err = lifecycle::complete_job(started, &completion_code, now).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[test]
fn test_bill_only_while_in_progress() {
    let err = lifecycle::submit_bill(pending_booking(), 150.0, None, Utc::now()).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[test]
fn test_cancel_allowed_from_pending_and_confirmed_only() {
    let now = Utc::now();

    let cancelled = lifecycle::cancel(pending_booking()).unwrap();
    assert_eq!(cancelled.status, Status::Cancelled);

    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();
    let cancelled = lifecycle::cancel(confirmed).unwrap();
    assert_eq!(cancelled.status, Status::Cancelled);
    // Cancellation leaves code fields alone.
    assert!(cancelled.start_code.is_some());

    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();
    let start_code = confirmed.start_code.clone().unwrap();
    let started = lifecycle::start_job(confirmed, &start_code, now).unwrap();
    assert!(matches!(
        lifecycle::cancel(started.clone()).unwrap_err(),
        ServiceError::InvalidTransition(_)
    ));

    let billed = lifecycle::submit_bill(started, 150.0, None, now).unwrap();
    let completion_code = billed.completion_code.clone().unwrap();
    let completed = lifecycle::complete_job(billed, &completion_code, now).unwrap();
    assert!(matches!(
        lifecycle::cancel(completed).unwrap_err(),
        ServiceError::InvalidTransition(_)
    ));
}

#[test]
fn test_full_round_trip() {
    let now = Utc::now();

    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();
    let start_code = confirmed.start_code.clone().unwrap();

    let started = lifecycle::start_job(confirmed, &start_code, now).unwrap();
    let billed =
        lifecycle::submit_bill(started, 150.0, Some("Extra fittings".to_string()), now).unwrap();
    assert_eq!(billed.status, Status::InProgress);
    assert_eq!(billed.final_bill_amount, Some(150.0));

    let completion_code = billed.completion_code.clone().unwrap();
    let completed = lifecycle::complete_job(billed, &completion_code, now).unwrap();
    assert_eq!(completed.status, Status::Completed);
    assert!(completed.job_completed_at.is_some());

    let settled =
        lifecycle::record_final_payment(completed, "pay_final_789", PaymentMethod::Online, now)
            .unwrap();
    assert_eq!(settled.status, Status::Completed);
    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(
        settled.final_payment_status,
        Some(FinalPaymentStatus::Completed)
    );
    assert_eq!(settled.payment_method, Some(PaymentMethod::Online));
    assert!(settled.paid_at.is_some());
}

#[test]
fn test_final_payment_requires_completion() {
    let now = Utc::now();
    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();

    let err = lifecycle::record_final_payment(confirmed, "pay_final", PaymentMethod::Cash, now)
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[test]
fn test_failed_attempt_counter_only_counts() {
    let booking = pending_booking();
    assert_eq!(booking.code_attempts, 0);

    // Bump it far past any plausible lockout threshold — nothing locks.
    let mut booking = booking;
    for _ in 0..50 {
        booking = lifecycle::note_failed_attempt(booking);
    }
    assert_eq!(booking.code_attempts, 50);

    let now = Utc::now();
    let confirmed = lifecycle::confirm(booking, "pay_123", now).unwrap();
    let start_code = confirmed.start_code.clone().unwrap();
    let started = lifecycle::start_job(confirmed, &start_code, now).unwrap();
    assert_eq!(started.status, Status::InProgress);
}

#[test]
fn test_codes_are_redacted_for_the_provider() {
    let now = Utc::now();
    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();
    let customer_id = confirmed.customer_id;
    let provider_id = confirmed.provider_id;

    let as_customer =
        serde_json::to_value(BookingResponse::for_user(confirmed.clone(), customer_id)).unwrap();
    assert!(as_customer["start_code"].is_string());

    let as_provider =
        serde_json::to_value(BookingResponse::for_user(confirmed, provider_id)).unwrap();
    assert!(as_provider["start_code"].is_null());
    assert!(as_provider["completion_code"].is_null());
}

#[test]
fn test_rate_once_and_only_after_completion() {
    let now = Utc::now();

    let err = lifecycle::rate(pending_booking()).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));

    let confirmed = lifecycle::confirm(pending_booking(), "pay_123", now).unwrap();
    let start_code = confirmed.start_code.clone().unwrap();
    let started = lifecycle::start_job(confirmed, &start_code, now).unwrap();
    let billed = lifecycle::submit_bill(started, 150.0, None, now).unwrap();
    let completion_code = billed.completion_code.clone().unwrap();
    let completed = lifecycle::complete_job(billed, &completion_code, now).unwrap();

    let rated = lifecycle::rate(completed).unwrap();
    assert!(rated.rated);

    let err = lifecycle::rate(rated).unwrap_err();
    assert!(matches!(err, ServiceError::Duplicate(_)));
}
