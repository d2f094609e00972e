//! Payment gateway webhook verification.
//!
//! The gateway signs every webhook delivery with HMAC-SHA256 over the raw
//! request body using a shared secret; the signature travels as a hex
//! digest in a header and must match exactly.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the gateway's hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "X-Payment-Signature";

/// Webhook event name for a successful up-front capture.
pub const EVENT_PAYMENT_CAPTURED: &str = "payment.captured";

/// Hex HMAC-SHA256 digest of `body` under `secret`.
pub fn sign(body: &[u8], secret: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// True iff `signature_hex` is exactly the digest of `body` under `secret`.
pub fn verify_signature(body: &[u8], signature_hex: &str, secret: &[u8]) -> bool {
    sign(body, secret) == signature_hex
}

/// Parsed webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentWebhook {
    pub event: String,
    pub booking_id: Uuid,
    pub payment_id: String,
}
