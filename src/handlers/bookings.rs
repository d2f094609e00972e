use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::bookings as booking_db;
use crate::db::users as user_db;
use crate::handlers::service_error_response;
use crate::models::bookings::{
    BookingResponse, CreateBooking, Model as Booking, RecordFinalPayment, SubmitBill, SubmitCode,
};
use crate::notify::{Notifier, status_notification};

/// Push the status-change copy to one party of the booking. Best-effort:
/// every failure path logs and returns, the transition already committed.
pub(crate) async fn notify_status_change(
    db: &DatabaseConnection,
    notifier: &Notifier,
    booking: &Booking,
    target_user_id: Uuid,
) {
    let Some((title, body)) = status_notification(booking.status) else {
        return;
    };

    let target = match user_db::get_user_by_id(db, target_user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(error = %e, "could not load notification target");
            return;
        }
    };

    let Some(token) = target.push_token.as_deref() else {
        return;
    };

    notifier
        .send(
            token,
            title,
            body,
            serde_json::json!({
                "bookingId": booking.id,
                "type": "booking_update",
                "clickAction": "OPEN_BOOKING",
            }),
        )
        .await;
}

/// Provider-facing ping when a booking is confirmed (the copy table above
/// is customer-facing). Called from the payment webhook.
pub(crate) async fn notify_provider_confirmed(
    db: &DatabaseConnection,
    notifier: &Notifier,
    booking: &Booking,
) {
    let provider = match user_db::get_user_by_id(db, booking.provider_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(error = %e, "could not load notification target");
            return;
        }
    };

    let Some(token) = provider.push_token.as_deref() else {
        return;
    };

    notifier
        .send(
            token,
            "New Confirmed Booking",
            "A customer's payment went through. Check your schedule.",
            serde_json::json!({
                "bookingId": booking.id,
                "type": "booking_update",
                "clickAction": "OPEN_BOOKING",
            }),
        )
        .await;
}

/// POST /api/bookings — customer requests a service engagement.
pub async fn create_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateBooking>,
) -> impl Responder {
    let customer_id = user.0.id;
    let input = body.into_inner();

    if input.provider_id == customer_id {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "You cannot book yourself",
        }));
    }

    // The provider must exist.
    match user_db::get_user_by_id(db.get_ref(), input.provider_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Provider {} not found", input.provider_id),
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    }

    match booking_db::insert_booking(db.get_ref(), customer_id, input).await {
        Ok(booking) => HttpResponse::Created().json(BookingResponse::for_user(booking, customer_id)),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create booking: {e}"),
        })),
    }
}

/// GET /api/bookings — bookings where the caller is a party, newest first.
pub async fn get_bookings(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    let user_id = user.0.id;

    match booking_db::get_bookings_for_user(db.get_ref(), user_id).await {
        Ok(bookings) => {
            let response: Vec<BookingResponse> = bookings
                .into_iter()
                .map(|b| BookingResponse::for_user(b, user_id))
                .collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/bookings/{id} — parties only.
pub async fn get_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let booking_id = path.into_inner();
    let user_id = user.0.id;

    let booking = match load_for_party(db.get_ref(), booking_id, user_id).await {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    HttpResponse::Ok().json(BookingResponse::for_user(booking, user_id))
}

/// Fetch a booking and verify the caller is one of its two parties.
async fn load_for_party(
    db: &DatabaseConnection,
    booking_id: Uuid,
    user_id: Uuid,
) -> Result<Booking, HttpResponse> {
    let booking = booking_db::get_booking_by_id(db, booking_id)
        .await
        .map_err(|e| {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }))
        })?
        .ok_or_else(|| {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Booking {booking_id} not found"),
            }))
        })?;

    if !booking.is_party(user_id) {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You are not a party to this booking",
        })));
    }

    Ok(booking)
}

/// Like `load_for_party` but the caller must be the provider side.
async fn load_for_provider(
    db: &DatabaseConnection,
    booking_id: Uuid,
    user_id: Uuid,
) -> Result<Booking, HttpResponse> {
    let booking = load_for_party(db, booking_id, user_id).await?;
    if booking.provider_id != user_id {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Only the service provider can perform this action",
        })));
    }
    Ok(booking)
}

/// POST /api/bookings/{id}/confirm — cash-flow confirmation by the
/// provider. Online payments come in through the payment webhook instead.
pub async fn confirm_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let booking_id = path.into_inner();
    let user_id = user.0.id;

    if let Err(resp) = load_for_provider(db.get_ref(), booking_id, user_id).await {
        return resp;
    }

    let payment_ref = format!("manual-{booking_id}");
    match booking_db::confirm(db.get_ref(), booking_id, &payment_ref).await {
        Ok(booking) => {
            notify_status_change(db.get_ref(), notifier.get_ref(), &booking, booking.customer_id)
                .await;
            HttpResponse::Ok().json(BookingResponse::for_user(booking, user_id))
        }
        Err(e) => service_error_response(&e),
    }
}

/// POST /api/bookings/{id}/start — provider submits the customer's start
/// code at the door.
pub async fn start_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitCode>,
) -> impl Responder {
    let booking_id = path.into_inner();
    let user_id = user.0.id;

    if let Err(resp) = load_for_provider(db.get_ref(), booking_id, user_id).await {
        return resp;
    }

    match booking_db::start_job(db.get_ref(), booking_id, &body.code).await {
        Ok(booking) => {
            notify_status_change(db.get_ref(), notifier.get_ref(), &booking, booking.customer_id)
                .await;
            HttpResponse::Ok().json(BookingResponse::for_user(booking, user_id))
        }
        Err(e) => service_error_response(&e),
    }
}

/// POST /api/bookings/{id}/bill — provider records the final bill.
pub async fn submit_bill(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitBill>,
) -> impl Responder {
    let booking_id = path.into_inner();
    let user_id = user.0.id;

    if let Err(resp) = load_for_provider(db.get_ref(), booking_id, user_id).await {
        return resp;
    }

    match booking_db::submit_bill(db.get_ref(), booking_id, body.into_inner()).await {
        Ok(booking) => HttpResponse::Ok().json(BookingResponse::for_user(booking, user_id)),
        Err(e) => service_error_response(&e),
    }
}

/// POST /api/bookings/{id}/complete — provider submits the completion code
/// after billing.
pub async fn complete_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitCode>,
) -> impl Responder {
    let booking_id = path.into_inner();
    let user_id = user.0.id;

    if let Err(resp) = load_for_provider(db.get_ref(), booking_id, user_id).await {
        return resp;
    }

    match booking_db::complete_job(db.get_ref(), booking_id, &body.code).await {
        Ok(booking) => {
            notify_status_change(db.get_ref(), notifier.get_ref(), &booking, booking.customer_id)
                .await;
            HttpResponse::Ok().json(BookingResponse::for_user(booking, user_id))
        }
        Err(e) => service_error_response(&e),
    }
}

/// POST /api/bookings/{id}/final-payment — settle the bill (cash recorded
/// by the provider, or an online capture reference).
pub async fn record_final_payment(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<RecordFinalPayment>,
) -> impl Responder {
    let booking_id = path.into_inner();
    let user_id = user.0.id;

    if let Err(resp) = load_for_party(db.get_ref(), booking_id, user_id).await {
        return resp;
    }

    let input = body.into_inner();
    match booking_db::record_final_payment(db.get_ref(), booking_id, &input.payment_ref, input.method)
        .await
    {
        Ok(booking) => HttpResponse::Ok().json(BookingResponse::for_user(booking, user_id)),
        Err(e) => service_error_response(&e),
    }
}

/// POST /api/bookings/{id}/cancel — either party, before the job starts.
pub async fn cancel_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let booking_id = path.into_inner();
    let user_id = user.0.id;

    if let Err(resp) = load_for_party(db.get_ref(), booking_id, user_id).await {
        return resp;
    }

    match booking_db::cancel(db.get_ref(), booking_id).await {
        Ok(booking) => {
            // The actor knows; tell the other side.
            let counterpart = booking.counterpart(user_id);
            notify_status_change(db.get_ref(), notifier.get_ref(), &booking, counterpart).await;
            HttpResponse::Ok().json(BookingResponse::for_user(booking, user_id))
        }
        Err(e) => service_error_response(&e),
    }
}

/// POST /api/bookings/{id}/rate — customer marks the booking rated, once.
pub async fn rate_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let booking_id = path.into_inner();
    let user_id = user.0.id;

    let booking = match load_for_party(db.get_ref(), booking_id, user_id).await {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if booking.customer_id != user_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Only the customer can rate a booking",
        }));
    }

    match booking_db::rate(db.get_ref(), booking_id).await {
        Ok(booking) => HttpResponse::Ok().json(BookingResponse::for_user(booking, user_id)),
        Err(e) => service_error_response(&e),
    }
}
