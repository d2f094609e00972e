//! Tests for the notification copy contract and message previews. The copy
//! strings are load-bearing: the mobile client keys off them.

use homeserve_backend::models::bookings::Status;
use homeserve_backend::notify::{MESSAGE_PREVIEW_MAX, status_notification, truncate_preview};

#[test]
fn test_status_copy_contract() {
    assert_eq!(
        status_notification(Status::Confirmed),
        Some((
            "Booking Confirmed! ✅",
            "Your service provider has accepted your request."
        ))
    );
    assert_eq!(
        status_notification(Status::InProgress),
        Some(("Job Started 🛠️", "Your service has started!"))
    );
    assert_eq!(
        status_notification(Status::Completed),
        Some(("Job Completed 🎉", "Service is done! Please review and pay."))
    );
    assert_eq!(
        status_notification(Status::Cancelled),
        Some(("Booking Cancelled ❌", "Your booking was cancelled."))
    );
}

#[test]
fn test_no_copy_for_pending() {
    assert_eq!(status_notification(Status::Pending), None);
}

#[test]
fn test_short_previews_pass_through() {
    assert_eq!(truncate_preview("hello"), "hello");
    assert_eq!(truncate_preview(""), "");
}

#[test]
fn test_long_previews_are_cut_at_the_limit() {
    let long = "x".repeat(250);
    let preview = truncate_preview(&long);
    assert_eq!(preview.chars().count(), MESSAGE_PREVIEW_MAX);
}

#[test]
fn test_preview_truncation_counts_characters_not_bytes() {
    let long = "é".repeat(150);
    let preview = truncate_preview(&long);
    assert_eq!(preview.chars().count(), MESSAGE_PREVIEW_MAX);
    assert!(preview.chars().all(|c| c == 'é'));
}
