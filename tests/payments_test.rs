//! Tests for payment webhook signature verification.

use homeserve_backend::payments::{PaymentWebhook, sign, verify_signature};

const SECRET: &[u8] = b"webhook-shared-secret";

#[test]
fn test_signature_round_trip() {
    let body = br#"{"event":"payment.captured","booking_id":"b","payment_id":"p"}"#;
    let signature = sign(body, SECRET);

    assert!(verify_signature(body, &signature, SECRET));
}

#[test]
fn test_tampered_body_is_rejected() {
    let body = br#"{"event":"payment.captured","amount":100}"#;
    let signature = sign(body, SECRET);

    let tampered = br#"{"event":"payment.captured","amount":999}"#;
    assert!(!verify_signature(tampered, &signature, SECRET));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let body = b"payload";
    let signature = sign(body, SECRET);

    assert!(!verify_signature(body, &signature, b"some-other-secret"));
}

#[test]
fn test_signature_comparison_is_exact() {
    let body = b"payload";
    let signature = sign(body, SECRET);

    // Hex digests are compared verbatim — an uppercased digest is not ours.
    assert!(!verify_signature(body, &signature.to_uppercase(), SECRET));
    assert!(!verify_signature(body, &signature[..signature.len() - 1], SECRET));
}

#[test]
fn test_webhook_payload_parses() {
    let body = r#"{
        "event": "payment.captured",
        "booking_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "payment_id": "pay_12345"
    }"#;

    let payload: PaymentWebhook = serde_json::from_str(body).unwrap();
    assert_eq!(payload.event, "payment.captured");
    assert_eq!(payload.payment_id, "pay_12345");
}
