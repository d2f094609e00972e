use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Roles {
    #[sea_orm(string_value = "customer")]
    Customer,
    #[sea_orm(string_value = "provider")]
    Provider,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// SeaORM entity for the `users` table.
///
/// The `subscription_*` columns are a denormalized mirror of the provider's
/// most recent subscription record, kept in sync by the subscription layer
/// so search/listing never has to join.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub role: Roles,
    pub is_activated: bool,
    pub message_notifications_enabled: bool,
    pub push_token: Option<String>,
    pub subscription_plan: Option<super::subscriptions::Plan>,
    pub subscription_status: Option<super::subscriptions::Status>,
    pub subscription_start: Option<DateTimeUtc>,
    pub subscription_end: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subscriptions::Entity")]
    Subscriptions,
    #[sea_orm(has_many = "super::appeals::Entity")]
    SuspensionAppeals,
}

impl Related<super::subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscriptions.def()
    }
}

impl Related<super::appeals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionAppeals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used internally by the auth middleware to create a user from JWT claims.
#[derive(Debug, Clone)]
pub struct CreateUserFromAuth {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Roles,
}

/// Used by the `POST /api/auth/complete-profile` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteProfile {
    pub username: Option<String>,
    pub role: Option<Roles>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub push_token: Option<String>,
    pub message_notifications_enabled: Option<bool>,
}

/// Used for self or admin-level user updates.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub push_token: Option<String>,
    pub message_notifications_enabled: Option<bool>,
    pub is_activated: Option<bool>,
}

/// A safe user representation for API responses (never leaks push tokens).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub role: Roles,
    pub is_activated: bool,
    pub message_notifications_enabled: bool,
    pub subscription_plan: Option<super::subscriptions::Plan>,
    pub subscription_status: Option<super::subscriptions::Status>,
    pub subscription_end: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            username: m.username,
            display_name: m.display_name,
            avatar_url: m.avatar_url,
            phone: m.phone,
            role: m.role,
            is_activated: m.is_activated,
            message_notifications_enabled: m.message_notifications_enabled,
            subscription_plan: m.subscription_plan,
            subscription_status: m.subscription_status,
            subscription_end: m.subscription_end,
            created_at: m.created_at,
        }
    }
}
