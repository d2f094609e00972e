use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::chat_state;
use crate::error::ServiceError;
use crate::models::{chats, messages};

/// Filter selecting a reader's *incoming* unread messages in one chat.
/// The reader's own sent messages never match.
pub fn incoming_unread_filter(chat_id: Uuid, reader_id: Uuid) -> Condition {
    Condition::all()
        .add(messages::Column::ChatId.eq(chat_id))
        .add(messages::Column::SenderId.ne(reader_id))
        .add(messages::Column::IsRead.eq(false))
}

fn unwrap_txn_err(e: TransactionError<ServiceError>) -> ServiceError {
    match e {
        TransactionError::Connection(db_err) => ServiceError::Db(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}

/// Append a message and update the chat bookkeeping in one transaction:
/// the new row (`is_read = false`), the chat's last-message fields, and the
/// recipient's unread counter (+1) commit or roll back together.
pub async fn send_message(
    db: &DatabaseConnection,
    chat: chats::Model,
    sender_id: Uuid,
    content: String,
) -> Result<messages::Model, ServiceError> {
    let now = Utc::now();
    let updated_chat = chat_state::record_outgoing(chat, sender_id, &content, now)?;

    db.transaction::<_, messages::Model, ServiceError>(move |txn| {
        Box::pin(async move {
            let message = messages::ActiveModel {
                id: Set(Uuid::new_v4()),
                chat_id: Set(updated_chat.id),
                sender_id: Set(sender_id),
                content: Set(content),
                is_read: Set(false),
                created_at: Set(now),
            }
            .insert(txn)
            .await?;

            updated_chat.into_active_model().reset_all().update(txn).await?;

            Ok(message)
        })
    })
    .await
    .map_err(unwrap_txn_err)
}

/// Reset the reader's unread counter and flip all their *incoming* unread
/// messages to read, in one transaction. Outgoing messages are untouched.
pub async fn mark_read(
    db: &DatabaseConnection,
    chat: chats::Model,
    reader_id: Uuid,
) -> Result<u64, ServiceError> {
    let updated_chat = chat_state::record_read(chat, reader_id)?;
    let chat_id = updated_chat.id;

    db.transaction::<_, u64, ServiceError>(move |txn| {
        Box::pin(async move {
            let result = messages::Entity::update_many()
                .col_expr(messages::Column::IsRead, Expr::value(true))
                .filter(incoming_unread_filter(chat_id, reader_id))
                .exec(txn)
                .await?;

            updated_chat.into_active_model().reset_all().update(txn).await?;

            Ok(result.rows_affected)
        })
    })
    .await
    .map_err(unwrap_txn_err)
}

/// Fetch message history for a chat in non-decreasing timestamp order,
/// with page/limit pagination.
pub async fn get_messages_for_chat(
    db: &DatabaseConnection,
    chat_id: Uuid,
    page: u64,
    limit: u64,
) -> Result<Vec<messages::Model>, DbErr> {
    messages::Entity::find()
        .filter(messages::Column::ChatId.eq(chat_id))
        .order_by_asc(messages::Column::CreatedAt)
        .order_by_asc(messages::Column::Id)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await
}
