use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::lifecycle;
use crate::models::bookings::{self, CreateBooking, PaymentMethod, PaymentStatus, Status, SubmitBill};

/// Insert a new booking request (defaults to Pending/Unpaid). The total
/// price is computed here, never trusted from the client.
pub async fn insert_booking(
    db: &DatabaseConnection,
    customer_id: Uuid,
    input: CreateBooking,
) -> Result<bookings::Model, DbErr> {
    let new_booking = bookings::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        provider_id: Set(input.provider_id),
        service: Set(input.service),
        address: Set(input.address),
        scheduled_date: Set(input.scheduled_date),
        time_slot: Set(input.time_slot),
        duration_hours: Set(input.duration_hours),
        hourly_rate: Set(input.hourly_rate),
        total_price: Set(input.duration_hours * input.hourly_rate),
        status: Set(Status::Pending),
        payment_status: Set(PaymentStatus::Unpaid),
        payment_intent_id: Set(None),
        start_code: Set(None),
        completion_code: Set(None),
        code_expires_at: Set(None),
        code_attempts: Set(0),
        job_started_at: Set(None),
        job_completed_at: Set(None),
        final_bill_amount: Set(None),
        bill_details: Set(None),
        bill_submitted_at: Set(None),
        final_payment_id: Set(None),
        final_payment_status: Set(None),
        paid_at: Set(None),
        payment_method: Set(None),
        rated: Set(false),
        created_at: Set(Utc::now()),
    };

    new_booking.insert(db).await
}

/// Fetch a single booking by ID.
pub async fn get_booking_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<bookings::Model>, DbErr> {
    bookings::Entity::find_by_id(id).one(db).await
}

/// Fetch all bookings where the user is a party (either role), newest first.
pub async fn get_bookings_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<bookings::Model>, DbErr> {
    bookings::Entity::find()
        .filter(
            Condition::any()
                .add(bookings::Column::CustomerId.eq(user_id))
                .add(bookings::Column::ProviderId.eq(user_id)),
        )
        .order_by_desc(bookings::Column::CreatedAt)
        .all(db)
        .await
}

async fn load(db: &DatabaseConnection, id: Uuid) -> Result<bookings::Model, ServiceError> {
    get_booking_by_id(db, id)
        .await?
        .ok_or(ServiceError::NotFound("booking"))
}

async fn persist(
    db: &DatabaseConnection,
    updated: bookings::Model,
) -> Result<bookings::Model, ServiceError> {
    let active = updated.into_active_model().reset_all();
    Ok(active.update(db).await?)
}

/// Apply a code-guarded transition, persisting the bumped attempt counter
/// when the code check fails so retries are tracked across requests.
async fn apply_code_transition<F>(
    db: &DatabaseConnection,
    id: Uuid,
    transition: F,
) -> Result<bookings::Model, ServiceError>
where
    F: FnOnce(bookings::Model) -> Result<bookings::Model, ServiceError>,
{
    let booking = load(db, id).await?;

    match transition(booking.clone()) {
        Ok(updated) => persist(db, updated).await,
        Err(e) if e.is_retryable() => {
            persist(db, lifecycle::note_failed_attempt(booking)).await?;
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Payment captured: move Pending → Confirmed and issue the start code.
pub async fn confirm(
    db: &DatabaseConnection,
    id: Uuid,
    payment_ref: &str,
) -> Result<bookings::Model, ServiceError> {
    let booking = load(db, id).await?;
    let updated = lifecycle::confirm(booking, payment_ref, Utc::now())?;
    persist(db, updated).await
}

/// Start-code handshake: Confirmed → InProgress.
pub async fn start_job(
    db: &DatabaseConnection,
    id: Uuid,
    submitted_code: &str,
) -> Result<bookings::Model, ServiceError> {
    let now = Utc::now();
    apply_code_transition(db, id, move |b| lifecycle::start_job(b, submitted_code, now)).await
}

/// Record the final bill while the job is running.
pub async fn submit_bill(
    db: &DatabaseConnection,
    id: Uuid,
    input: SubmitBill,
) -> Result<bookings::Model, ServiceError> {
    let booking = load(db, id).await?;
    let updated = lifecycle::submit_bill(booking, input.amount, input.details, Utc::now())?;
    persist(db, updated).await
}

/// Completion-code handshake: InProgress → Completed (bill required).
pub async fn complete_job(
    db: &DatabaseConnection,
    id: Uuid,
    submitted_code: &str,
) -> Result<bookings::Model, ServiceError> {
    let now = Utc::now();
    apply_code_transition(db, id, move |b| {
        lifecycle::complete_job(b, submitted_code, now)
    })
    .await
}

/// Settle the final bill for a completed job.
pub async fn record_final_payment(
    db: &DatabaseConnection,
    id: Uuid,
    payment_ref: &str,
    method: PaymentMethod,
) -> Result<bookings::Model, ServiceError> {
    let booking = load(db, id).await?;
    let updated = lifecycle::record_final_payment(booking, payment_ref, method, Utc::now())?;
    persist(db, updated).await
}

/// Cancel a booking that has not started.
pub async fn cancel(db: &DatabaseConnection, id: Uuid) -> Result<bookings::Model, ServiceError> {
    let booking = load(db, id).await?;
    let updated = lifecycle::cancel(booking)?;
    persist(db, updated).await
}

/// Mark a completed booking rated, once.
pub async fn rate(db: &DatabaseConnection, id: Uuid) -> Result<bookings::Model, ServiceError> {
    let booking = load(db, id).await?;
    let updated = lifecycle::rate(booking)?;
    persist(db, updated).await
}
