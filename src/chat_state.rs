//! Pure chat bookkeeping deltas.
//!
//! The db layer applies these to a loaded chat row inside the same
//! transaction as the message write, which keeps the unread counters equal
//! to the count of unread incoming messages for each participant.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::chats::Model;

/// The other participant of the chat, from `user_id`'s point of view.
pub fn other_participant(chat: &Model, user_id: Uuid) -> Option<Uuid> {
    if chat.customer_id == user_id {
        Some(chat.provider_id)
    } else if chat.provider_id == user_id {
        Some(chat.customer_id)
    } else {
        None
    }
}

/// Unread count for one participant.
pub fn unread_for(chat: &Model, user_id: Uuid) -> Option<i64> {
    if chat.customer_id == user_id {
        Some(chat.customer_unread)
    } else if chat.provider_id == user_id {
        Some(chat.provider_unread)
    } else {
        None
    }
}

/// Chat-side effect of one outgoing message: last-message fields move and
/// the *recipient's* unread counter goes up by exactly 1.
pub fn record_outgoing(
    mut chat: Model,
    sender_id: Uuid,
    content: &str,
    now: DateTime<Utc>,
) -> Result<Model, ServiceError> {
    if sender_id == chat.customer_id {
        chat.provider_unread += 1;
    } else if sender_id == chat.provider_id {
        chat.customer_unread += 1;
    } else {
        return Err(ServiceError::Forbidden(
            "sender is not a participant of this chat",
        ));
    }

    chat.last_message = Some(content.to_string());
    chat.last_message_at = Some(now);
    Ok(chat)
}

/// Chat-side effect of a read: the reader's own counter drops to 0. The
/// message-level flags are flipped by the db layer in the same transaction.
pub fn record_read(mut chat: Model, user_id: Uuid) -> Result<Model, ServiceError> {
    if user_id == chat.customer_id {
        chat.customer_unread = 0;
    } else if user_id == chat.provider_id {
        chat.provider_unread = 0;
    } else {
        return Err(ServiceError::Forbidden(
            "reader is not a participant of this chat",
        ));
    }
    Ok(chat)
}
