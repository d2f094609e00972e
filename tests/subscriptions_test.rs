//! Tests for subscription windows and the expiry-sweep predicate.

use chrono::{Duration, Utc};
use uuid::Uuid;

use homeserve_backend::models::subscriptions::{
    Model as Subscription, Plan, Status, current_for_mirror, grant_window,
};

fn active_record(end_offset: Duration) -> Subscription {
    let now = Utc::now();
    Subscription {
        id: Uuid::new_v4(),
        provider_id: Uuid::new_v4(),
        plan: Plan::Monthly,
        amount: 49.0,
        status: Status::Active,
        payment_method: Some("card".to_string()),
        start_date: now - Duration::days(30),
        end_date: now + end_offset,
        created_at: now - Duration::days(30),
    }
}

#[test]
fn test_plan_default_durations() {
    assert_eq!(Plan::Monthly.default_duration_days(), 30);
    assert_eq!(Plan::Quarterly.default_duration_days(), 90);
    assert_eq!(Plan::Yearly.default_duration_days(), 365);
}

#[test]
fn test_grant_window_defaults_by_plan() {
    let now = Utc::now();

    let (start, end) = grant_window(Plan::Monthly, now, None);
    assert_eq!(start, now);
    assert_eq!(end, now + Duration::days(30));

    let (_, end) = grant_window(Plan::Yearly, now, None);
    assert_eq!(end, now + Duration::days(365));
}

#[test]
fn test_grant_window_explicit_duration_overrides_plan() {
    let now = Utc::now();
    let (_, end) = grant_window(Plan::Monthly, now, Some(7));
    assert_eq!(end, now + Duration::days(7));
}

#[test]
fn test_sweep_predicate_expires_lapsed_records_once() {
    let now = Utc::now();
    let mut lapsed = active_record(Duration::seconds(-1));
    let live = active_record(Duration::days(3));

    // First sweep: the lapsed record matches, the live one does not.
    assert!(lapsed.is_lapsed(now));
    assert!(!live.is_lapsed(now));

    lapsed.status = Status::Expired;

    // Second sweep: already-expired rows never match again.
    assert!(!lapsed.is_lapsed(now));
}

#[test]
fn test_mirror_follows_the_live_record_after_renewal_overlap() {
    let now = Utc::now();
    let provider = Uuid::new_v4();

    // Granted 31 days ago and renewed 2 days ago: the old record lapsed
    // yesterday while the renewal runs for another 28 days.
    let mut old = active_record(Duration::days(-1));
    old.provider_id = provider;
    old.created_at = now - Duration::days(31);

    let mut renewal = active_record(Duration::days(28));
    renewal.provider_id = provider;
    renewal.created_at = now - Duration::days(2);

    let records = vec![old, renewal.clone()];

    // Sweeping away the old record must not mark the provider expired:
    // the mirror follows the renewal.
    let current = current_for_mirror(&records, now).unwrap();
    assert_eq!(current.id, renewal.id);
    assert_eq!(current.end_date, renewal.end_date);

    // Once the renewal lapses too, there is nothing live left to mirror.
    assert!(current_for_mirror(&records, now + Duration::days(40)).is_none());
}

#[test]
fn test_mirror_ignores_expired_and_pending_records() {
    let now = Utc::now();

    let mut expired = active_record(Duration::days(10));
    expired.status = Status::Expired;
    let mut pending = active_record(Duration::days(10));
    pending.status = Status::Pending;

    assert!(current_for_mirror(&[expired, pending], now).is_none());
}

#[test]
fn test_sweep_predicate_ignores_pending_records() {
    let now = Utc::now();
    let mut record = active_record(Duration::seconds(-1));
    record.status = Status::Pending;

    assert!(!record.is_lapsed(now));
}
