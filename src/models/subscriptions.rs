use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subscription plan stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Plan {
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

impl Plan {
    /// Default validity window when no explicit duration is granted.
    pub fn default_duration_days(self) -> i64 {
        match self {
            Plan::Monthly => 30,
            Plan::Quarterly => 90,
            Plan::Yearly => 365,
        }
    }
}

/// Subscription status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "expired")]
    Expired,
}

/// SeaORM entity for the `subscriptions` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub plan: Plan,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub status: Status,
    pub payment_method: Option<String>,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ProviderId",
        to = "super::users::Column::Id"
    )]
    Provider,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Provider.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// An active record whose window has closed. The sweep only ever looks
    /// at `Active` rows, which is what makes repeated sweeps no-ops.
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == Status::Active && self.end_date < now
    }
}

/// The record the profile mirror should reflect: among a provider's
/// records, the most recently created active one whose window is still
/// open. A renewal can overlap the record it replaces, so an expiring
/// record alone never implies the provider has lapsed.
pub fn current_for_mirror(records: &[Model], now: DateTime<Utc>) -> Option<&Model> {
    records
        .iter()
        .filter(|r| r.status == Status::Active && !r.is_lapsed(now))
        .max_by_key(|r| r.created_at)
}

/// Compute the validity window for a grant starting now.
pub fn grant_window(
    plan: Plan,
    now: DateTime<Utc>,
    duration_days: Option<i64>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let days = duration_days.unwrap_or_else(|| plan.default_duration_days());
    (now, now + Duration::days(days))
}

// ── DTOs ──

/// Request body for POST /api/subscriptions/grant (admin only).
#[derive(Debug, Clone, Deserialize)]
pub struct GrantSubscription {
    pub provider_id: Uuid,
    pub plan: Plan,
    pub amount: f64,
    pub payment_method: Option<String>,
    pub duration_days: Option<i64>,
}
