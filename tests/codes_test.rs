//! Unit tests for the job-code engine: range, shape, trim-equality and the
//! expiry boundary. No running server or database is needed.

use chrono::{Duration, Utc};

use homeserve_backend::codes::{compute_expiry, generate_code, is_expired, validate};

#[test]
fn test_generated_codes_are_six_digit_strings() {
    for _ in 0..1000 {
        let code = generate_code();
        assert_eq!(code.len(), 6, "code {code} is not 6 characters");
        assert_eq!(code.trim(), code, "code {code} has surrounding whitespace");

        let value: u32 = code.parse().expect("code must be numeric");
        assert!((100_000..=999_999).contains(&value), "code {value} out of range");
    }
}

#[test]
fn test_validate_is_trimmed_exact_equality() {
    assert!(validate("123456", "123456"));
    assert!(validate(" 123456 ", "123456"));
    assert!(validate("123456", " 123456 "));
    assert!(!validate("123456", "654321"));
    assert!(!validate("12345", "123456"));
}

#[test]
fn test_validate_any_nonempty_string_against_itself() {
    for s in ["1", "000000", "999999", "abc"] {
        assert!(validate(s, s));
    }
}

#[test]
fn test_expiry_window_is_24_hours() {
    let now = Utc::now();
    assert_eq!(compute_expiry(now), now + Duration::hours(24));
}

#[test]
fn test_expiry_boundary_is_inclusive() {
    let now = Utc::now();
    let expiry = compute_expiry(now);

    // One millisecond before the boundary the code is still live.
    assert!(!is_expired(expiry, expiry - Duration::milliseconds(1)));
    // At the boundary instant it is dead.
    assert!(is_expired(expiry, expiry));
    assert!(is_expired(expiry, expiry + Duration::milliseconds(1)));
}
