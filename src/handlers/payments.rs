use actix_web::{HttpRequest, HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::db::bookings as booking_db;
use crate::handlers::bookings::{notify_provider_confirmed, notify_status_change};
use crate::handlers::service_error_response;
use crate::notify::Notifier;
use crate::payments::{EVENT_PAYMENT_CAPTURED, PaymentWebhook, SIGNATURE_HEADER, verify_signature};

/// POST /api/payments/webhook — the payment gateway reports a capture.
///
/// Authenticated by an HMAC-SHA256 signature over the raw body, not by a
/// JWT. A verified capture event drives the Pending → Confirmed transition
/// and fires the confirmation pushes to both parties.
pub async fn webhook(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    config: web::Data<Config>,
    notifier: web::Data<Notifier>,
    body: web::Bytes,
) -> impl Responder {
    let signature = match req.headers().get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) {
        Some(s) => s,
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": format!("Missing {SIGNATURE_HEADER} header"),
            }));
        }
    };

    if !verify_signature(&body, signature, config.payment_webhook_secret.as_bytes()) {
        tracing::warn!("payment webhook with invalid signature rejected");
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid webhook signature",
        }));
    }

    let payload: PaymentWebhook = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Malformed webhook payload: {e}"),
            }));
        }
    };

    // Anything but a capture is acknowledged and ignored.
    if payload.event != EVENT_PAYMENT_CAPTURED {
        return HttpResponse::Ok().json(serde_json::json!({ "status": "ignored" }));
    }

    match booking_db::confirm(db.get_ref(), payload.booking_id, &payload.payment_id).await {
        Ok(booking) => {
            notify_status_change(db.get_ref(), notifier.get_ref(), &booking, booking.customer_id)
                .await;
            notify_provider_confirmed(db.get_ref(), notifier.get_ref(), &booking).await;
            HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
        }
        Err(e) => service_error_response(&e),
    }
}
