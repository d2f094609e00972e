use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Appeal review status, transitioned by admin action only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "reviewed")]
    Reviewed,
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

/// SeaORM entity for the `suspension_appeals` table.
///
/// A provider's contest of an account suspension. Appeals are never deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suspension_appeals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
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

// ── DTOs ──

/// Request body for POST /api/appeals.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppeal {
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub description: String,
}

/// Request body for PUT /api/appeals/{id}/status (admin only).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppealStatus {
    pub status: Status,
}
