use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::models::appeals::{self, CreateAppeal, Status, UpdateAppealStatus};

/// Insert a new suspension appeal (defaults to Pending status).
pub async fn insert_appeal(
    db: &DatabaseConnection,
    provider_id: Uuid,
    input: CreateAppeal,
) -> Result<appeals::Model, DbErr> {
    let new_appeal = appeals::ActiveModel {
        id: Set(Uuid::new_v4()),
        provider_id: Set(provider_id),
        contact_email: Set(input.contact_email),
        contact_phone: Set(input.contact_phone),
        description: Set(input.description),
        status: Set(Status::Pending),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    };

    new_appeal.insert(db).await
}

/// Fetch all appeals, newest first (admin review queue).
pub async fn get_all_appeals(db: &DatabaseConnection) -> Result<Vec<appeals::Model>, DbErr> {
    appeals::Entity::find()
        .order_by_desc(appeals::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch all appeals filed by one provider.
pub async fn get_appeals_by_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<Vec<appeals::Model>, DbErr> {
    appeals::Entity::find()
        .filter(appeals::Column::ProviderId.eq(provider_id))
        .order_by_desc(appeals::Column::CreatedAt)
        .all(db)
        .await
}

/// Update the review status of an appeal (admin action only; there is no
/// delete — appeals are a permanent record).
pub async fn update_appeal_status(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateAppealStatus,
) -> Result<appeals::Model, DbErr> {
    let appeal = appeals::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Appeal not found".to_string()))?;

    let mut active: appeals::ActiveModel = appeal.into();
    active.status = Set(input.status);
    active.updated_at = Set(Some(Utc::now()));

    active.update(db).await
}
