use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::models::subscriptions::{
    self, GrantSubscription, Plan, Status, current_for_mirror, grant_window,
};
use crate::models::users;

/// Mirror a subscription summary onto the provider's user row so listings
/// never have to join against the subscriptions table.
async fn mirror_onto_profile<C: ConnectionTrait>(
    db: &C,
    provider_id: Uuid,
    plan: Option<Plan>,
    status: Status,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), DbErr> {
    let user = users::Entity::find_by_id(provider_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();
    if plan.is_some() {
        active.subscription_plan = Set(plan);
    }
    active.subscription_status = Set(Some(status));
    if start.is_some() {
        active.subscription_start = Set(start);
    }
    if end.is_some() {
        active.subscription_end = Set(end);
    }
    active.updated_at = Set(Some(Utc::now()));
    active.update(db).await?;

    Ok(())
}

/// Create an active subscription record and mirror it onto the profile.
/// Used for trial starts, admin grants and renewals alike.
pub async fn grant(
    db: &DatabaseConnection,
    input: GrantSubscription,
) -> Result<subscriptions::Model, DbErr> {
    let now = Utc::now();
    let (start, end) = grant_window(input.plan, now, input.duration_days);

    let record = subscriptions::ActiveModel {
        id: Set(Uuid::new_v4()),
        provider_id: Set(input.provider_id),
        plan: Set(input.plan),
        amount: Set(input.amount),
        status: Set(Status::Active),
        payment_method: Set(input.payment_method),
        start_date: Set(start),
        end_date: Set(end),
        created_at: Set(now),
    }
    .insert(db)
    .await?;

    mirror_onto_profile(
        db,
        input.provider_id,
        Some(input.plan),
        Status::Active,
        Some(start),
        Some(end),
    )
    .await?;

    Ok(record)
}

/// Expire every currently-active record for a provider (admin disable) and
/// mirror the expiry onto the profile.
pub async fn disable(db: &DatabaseConnection, provider_id: Uuid) -> Result<u64, DbErr> {
    let result = subscriptions::Entity::update_many()
        .col_expr(
            subscriptions::Column::Status,
            sea_orm::prelude::Expr::value(Status::Expired),
        )
        .filter(subscriptions::Column::ProviderId.eq(provider_id))
        .filter(subscriptions::Column::Status.eq(Status::Active))
        .exec(db)
        .await?;

    mirror_onto_profile(db, provider_id, None, Status::Expired, None, None).await?;

    Ok(result.rows_affected)
}

/// The most recent subscription record for a provider, if any.
pub async fn get_current_for_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<Option<subscriptions::Model>, DbErr> {
    subscriptions::Entity::find()
        .filter(subscriptions::Column::ProviderId.eq(provider_id))
        .order_by_desc(subscriptions::Column::CreatedAt)
        .one(db)
        .await
}

/// Expire every active record whose window has closed, then re-mirror each
/// touched provider's profile from whatever record is still live. A renewal
/// granted before the old record lapsed keeps the profile active; the
/// profile reads expired only when no open window remains. Lapsed rows are
/// selected by [`subscriptions::Model::is_lapsed`], which only ever matches
/// `Active` rows, so a repeated sweep is a no-op.
pub async fn sweep_expired(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<u64, DbErr> {
    let active_records = subscriptions::Entity::find()
        .filter(subscriptions::Column::Status.eq(Status::Active))
        .all(db)
        .await?;

    let mut by_provider: HashMap<Uuid, Vec<subscriptions::Model>> = HashMap::new();
    for record in active_records {
        by_provider.entry(record.provider_id).or_default().push(record);
    }

    let mut expired = 0u64;
    for (provider_id, records) in by_provider {
        if !records.iter().any(|r| r.is_lapsed(now)) {
            continue;
        }

        for record in records.iter().filter(|r| r.is_lapsed(now)).cloned() {
            let mut update: subscriptions::ActiveModel = record.into();
            update.status = Set(Status::Expired);
            update.update(db).await?;
            expired += 1;
        }

        match current_for_mirror(&records, now) {
            Some(current) => {
                mirror_onto_profile(
                    db,
                    provider_id,
                    Some(current.plan),
                    Status::Active,
                    Some(current.start_date),
                    Some(current.end_date),
                )
                .await?;
            }
            None => mirror_onto_profile(db, provider_id, None, Status::Expired, None, None).await?,
        }
    }

    Ok(expired)
}
