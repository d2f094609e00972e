//! Shared-secret job codes.
//!
//! A booking carries two 6-digit codes: the start code proves the provider
//! is physically present when the job begins, the completion code proves the
//! customer signed off at the end. Codes are generated server-side, shown
//! only to the customer, and submitted by the provider.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Validity window of a generated code.
pub const CODE_TTL_HOURS: i64 = 24;

/// A uniformly distributed 6-digit numeric string. The 100000 floor keeps
/// the first digit non-zero, so the string form is always exactly 6 chars.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Expiry instant for a code generated at `now`.
pub fn compute_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(CODE_TTL_HOURS)
}

/// A code is dead the instant its expiry is reached.
pub fn is_expired(expiry: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expiry
}

/// Trimmed exact equality. Callers must check `is_expired` first and bump
/// the booking's attempt counter on failure.
pub fn validate(submitted: &str, stored: &str) -> bool {
    submitted.trim() == stored.trim()
}
