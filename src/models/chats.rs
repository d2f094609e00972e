use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `chats` table.
///
/// One row per (customer, provider, booking) triple; `booking_id = NULL` is
/// the general conversation for the pair and is distinct from any
/// booking-scoped chat. A chat has exactly two fixed-role participants, so
/// unread bookkeeping is two typed counter columns rather than a
/// per-participant map.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub booking_id: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTimeUtc>,
    pub customer_unread: i64,
    pub provider_unread: i64,
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
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id"
    )]
    Booking,
    #[sea_orm(has_many = "super::messages::Entity")]
    Messages,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for POST /api/chats/find-or-create.
///
/// Whichever participant calls it, the pair is (customer, provider); the
/// caller's own id comes from the JWT and fills in its role slot.
#[derive(Debug, Clone, Deserialize)]
pub struct FindOrCreateChat {
    pub other_user_id: Uuid,
    pub booking_id: Option<Uuid>,
}

/// Request body for POST /api/chats/{id}/messages.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessage {
    pub content: String,
}

/// Response for the conversations list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub chat_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub other_user_id: Uuid,
    pub other_user_name: Option<String>,
    pub last_message: Option<String>,
    pub last_message_at: Option<chrono::DateTime<chrono::Utc>>,
    pub unread_count: i64,
}
