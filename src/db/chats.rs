use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::models::chats;

fn exact_match_filter(customer_id: Uuid, provider_id: Uuid, booking_id: Option<Uuid>) -> Condition {
    let cond = Condition::all()
        .add(chats::Column::CustomerId.eq(customer_id))
        .add(chats::Column::ProviderId.eq(provider_id));

    // A general chat (no booking) only matches chats that also lack one.
    match booking_id {
        Some(id) => cond.add(chats::Column::BookingId.eq(id)),
        None => cond.add(chats::Column::BookingId.is_null()),
    }
}

/// Find the chat for an exact (customer, provider, booking) triple.
pub async fn find_exact(
    db: &DatabaseConnection,
    customer_id: Uuid,
    provider_id: Uuid,
    booking_id: Option<Uuid>,
) -> Result<Option<chats::Model>, DbErr> {
    chats::Entity::find()
        .filter(exact_match_filter(customer_id, provider_id, booking_id))
        .one(db)
        .await
}

/// Find or lazily create the chat for a (customer, provider, booking)
/// triple, both unread counters starting at 0.
///
/// The unique index on the triple makes the concurrent-create race safe:
/// the loser's insert fails and the second lookup returns the winner's row.
pub async fn find_or_create(
    db: &DatabaseConnection,
    customer_id: Uuid,
    provider_id: Uuid,
    booking_id: Option<Uuid>,
) -> Result<chats::Model, DbErr> {
    if let Some(existing) = find_exact(db, customer_id, provider_id, booking_id).await? {
        return Ok(existing);
    }

    let new_chat = chats::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        provider_id: Set(provider_id),
        booking_id: Set(booking_id),
        last_message: Set(None),
        last_message_at: Set(None),
        customer_unread: Set(0),
        provider_unread: Set(0),
        created_at: Set(Utc::now()),
    };

    match new_chat.insert(db).await {
        Ok(chat) => Ok(chat),
        Err(insert_err) => {
            // Lost the creation race to the other participant.
            match find_exact(db, customer_id, provider_id, booking_id).await? {
                Some(existing) => Ok(existing),
                None => Err(insert_err),
            }
        }
    }
}

/// Fetch a single chat by ID.
pub async fn get_chat_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<chats::Model>, DbErr> {
    chats::Entity::find_by_id(id).one(db).await
}

/// All chats where the user is a participant, most recent activity first
/// (chats with no messages yet sort last).
pub async fn get_chats_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<chats::Model>, DbErr> {
    let mut chats = chats::Entity::find()
        .filter(
            Condition::any()
                .add(chats::Column::CustomerId.eq(user_id))
                .add(chats::Column::ProviderId.eq(user_id)),
        )
        .all(db)
        .await?;

    chats.sort_by(|a, b| {
        let a_time = a.last_message_at.unwrap_or(chrono::DateTime::UNIX_EPOCH);
        let b_time = b.last_message_at.unwrap_or(chrono::DateTime::UNIX_EPOCH);
        b_time.cmp(&a_time)
    });

    Ok(chats)
}
