pub mod appeals;
pub mod auth;
pub mod bookings;
pub mod chats;
pub mod payments;
pub mod subscriptions;
pub mod users;

use actix_web::{HttpResponse, web};

use crate::error::ServiceError;
use crate::models::users::{Model as User, Roles};

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    // ── User routes ──
    cfg.service(
        web::resource("/users/{id}")
            .route(web::get().to(users::get_user))
            .route(web::put().to(users::update_user)),
    );

    // ── Booking routes (the lifecycle state machine) ──
    cfg.service(
        web::scope("/bookings")
            .route("", web::get().to(bookings::get_bookings))
            .route("", web::post().to(bookings::create_booking))
            .route("/{id}", web::get().to(bookings::get_booking))
            .route("/{id}/confirm", web::post().to(bookings::confirm_booking))
            .route("/{id}/start", web::post().to(bookings::start_job))
            .route("/{id}/bill", web::post().to(bookings::submit_bill))
            .route("/{id}/complete", web::post().to(bookings::complete_job))
            .route(
                "/{id}/final-payment",
                web::post().to(bookings::record_final_payment),
            )
            .route("/{id}/cancel", web::post().to(bookings::cancel_booking))
            .route("/{id}/rate", web::post().to(bookings::rate_booking)),
    );

    // ── Chat routes ──
    cfg.service(
        web::scope("/chats")
            .route("", web::get().to(chats::get_conversations))
            .route("/find-or-create", web::post().to(chats::find_or_create))
            .route("/{id}/messages", web::get().to(chats::get_messages))
            .route("/{id}/messages", web::post().to(chats::send_message))
            .route("/{id}/read", web::post().to(chats::mark_read)),
    );
    cfg.service(web::resource("/chat/config").route(web::get().to(chats::chat_config)));

    // ── Subscription routes ──
    cfg.service(
        web::scope("/subscriptions")
            .route("/grant", web::post().to(subscriptions::grant))
            .route("/me", web::get().to(subscriptions::my_subscription))
            .route(
                "/{provider_id}/disable",
                web::post().to(subscriptions::disable),
            ),
    );

    // ── Suspension appeal routes ──
    cfg.service(
        web::scope("/appeals")
            .route("", web::get().to(appeals::get_appeals))
            .route("", web::post().to(appeals::create_appeal))
            .route("/mine", web::get().to(appeals::my_appeals))
            .route("/{id}/status", web::put().to(appeals::update_status)),
    );

    // ── Payment gateway webhook (signature-verified, no JWT) ──
    cfg.service(web::resource("/payments/webhook").route(web::post().to(payments::webhook)));
}

/// Map a domain error to its HTTP response. Verification failures carry a
/// `retryable` flag so clients keep the code-entry form open.
pub(crate) fn service_error_response(e: &ServiceError) -> HttpResponse {
    match e {
        ServiceError::InvalidTransition(msg) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": msg,
        })),
        ServiceError::CodeMismatch | ServiceError::CodeExpired => {
            HttpResponse::UnprocessableEntity().json(serde_json::json!({
                "error": e.to_string(),
                "retryable": true,
            }))
        }
        ServiceError::NotFound(what) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("{what} not found"),
        })),
        ServiceError::Duplicate(msg) => HttpResponse::Conflict().json(serde_json::json!({
            "error": msg,
        })),
        ServiceError::Forbidden(msg) => HttpResponse::Forbidden().json(serde_json::json!({
            "error": msg,
        })),
        ServiceError::Db(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// Admin gate shared by the subscription and appeal admin endpoints.
pub(crate) fn require_admin(user: &User) -> Result<(), HttpResponse> {
    if user.role == Roles::Admin {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Admin access required",
        })))
    }
}
