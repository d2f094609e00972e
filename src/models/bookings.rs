use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Booking lifecycle status stored as a lowercase string in the database.
///
/// Advances strictly forward (`Pending → Confirmed → InProgress →
/// Completed`); `Cancelled` is terminal and reachable from `Pending` or
/// `Confirmed` only. The transition guards live in `crate::lifecycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Status of the up-front booking payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

/// Status of the end-of-job bill settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum FinalPaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// How the final bill was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "online")]
    Online,
}

/// SeaORM entity for the `bookings` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub service: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub scheduled_date: DateTimeUtc,
    pub time_slot: String,
    #[sea_orm(column_type = "Double")]
    pub duration_hours: f64,
    #[sea_orm(column_type = "Double")]
    pub hourly_rate: f64,
    #[sea_orm(column_type = "Double")]
    pub total_price: f64,
    pub status: Status,
    pub payment_status: PaymentStatus,
    pub payment_intent_id: Option<String>,
    pub start_code: Option<String>,
    pub completion_code: Option<String>,
    pub code_expires_at: Option<DateTimeUtc>,
    pub code_attempts: i32,
    pub job_started_at: Option<DateTimeUtc>,
    pub job_completed_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Double", nullable)]
    pub final_bill_amount: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bill_details: Option<String>,
    pub bill_submitted_at: Option<DateTimeUtc>,
    pub final_payment_id: Option<String>,
    pub final_payment_status: Option<FinalPaymentStatus>,
    pub paid_at: Option<DateTimeUtc>,
    pub payment_method: Option<PaymentMethod>,
    pub rated: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CustomerId",
        to = "super::users::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ProviderId",
        to = "super::users::Column::Id"
    )]
    Provider,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True once a final bill has been recorded for this booking.
    pub fn bill_submitted(&self) -> bool {
        self.bill_submitted_at.is_some()
    }

    /// True if the given user is a party (either side) of the booking.
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.customer_id == user_id || self.provider_id == user_id
    }

    /// The other party of the booking, from `user_id`'s point of view.
    pub fn counterpart(&self, user_id: Uuid) -> Uuid {
        if self.customer_id == user_id {
            self.provider_id
        } else {
            self.customer_id
        }
    }
}

// ── DTOs ──

/// Request body for POST /api/bookings. The customer id comes from the JWT;
/// the total price is computed server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub provider_id: Uuid,
    pub service: String,
    pub address: String,
    pub scheduled_date: chrono::DateTime<chrono::Utc>,
    pub time_slot: String,
    pub duration_hours: f64,
    pub hourly_rate: f64,
}

/// Request body for POST /api/bookings/{id}/bill.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitBill {
    pub amount: f64,
    pub details: Option<String>,
}

/// Request body for the start/complete code submissions.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitCode {
    pub code: String,
}

/// Request body for POST /api/bookings/{id}/final-payment.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordFinalPayment {
    pub payment_ref: String,
    pub method: PaymentMethod,
}

/// Booking representation for API responses. The verification codes are
/// only ever shown to the customer; any other viewer gets them redacted.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    booking: Model,
}

impl BookingResponse {
    pub fn for_user(mut booking: Model, user_id: Uuid) -> Self {
        if booking.customer_id != user_id {
            booking.start_code = None;
            booking.completion_code = None;
        }
        Self { booking }
    }
}
