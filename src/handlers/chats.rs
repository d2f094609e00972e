use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::chat_state;
use crate::config::Config;
use crate::db::bookings as booking_db;
use crate::db::chats as chat_db;
use crate::db::messages as message_db;
use crate::db::users as user_db;
use crate::handlers::service_error_response;
use crate::models::PaginationQuery;
use crate::models::chats::{ConversationSummary, FindOrCreateChat, Model as Chat, SendMessage};
use crate::models::messages::MessageResponse;
use crate::models::users::Roles;
use crate::notify::{Notifier, truncate_preview};

/// Fetch a chat and verify the caller is a participant.
async fn load_for_participant(
    db: &DatabaseConnection,
    chat_id: Uuid,
    user_id: Uuid,
) -> Result<Chat, HttpResponse> {
    let chat = chat_db::get_chat_by_id(db, chat_id)
        .await
        .map_err(|e| {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }))
        })?
        .ok_or_else(|| {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Chat {chat_id} not found"),
            }))
        })?;

    if chat_state::other_participant(&chat, user_id).is_none() {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You are not a participant of this chat",
        })));
    }

    Ok(chat)
}

/// POST /api/chats/find-or-create — lazily open the conversation for this
/// pair (optionally scoped to a booking). Safe to call from both sides.
pub async fn find_or_create(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<FindOrCreateChat>,
) -> impl Responder {
    let caller = user.0;
    let input = body.into_inner();

    if input.other_user_id == caller.id {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "You cannot open a chat with yourself",
        }));
    }

    // The pair is always stored as (customer, provider).
    let (customer_id, provider_id) = if caller.role == Roles::Provider {
        (input.other_user_id, caller.id)
    } else {
        (caller.id, input.other_user_id)
    };

    // A booking-scoped chat must reference a booking the caller is party to.
    if let Some(booking_id) = input.booking_id {
        match booking_db::get_booking_by_id(db.get_ref(), booking_id).await {
            Ok(Some(booking)) if booking.is_party(caller.id) => {}
            Ok(Some(_)) => {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "error": "You are not a party to this booking",
                }));
            }
            Ok(None) => {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "error": format!("Booking {booking_id} not found"),
                }));
            }
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Database error: {e}"),
                }));
            }
        }
    }

    match chat_db::find_or_create(db.get_ref(), customer_id, provider_id, input.booking_id).await {
        Ok(chat) => HttpResponse::Ok().json(chat),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to open chat: {e}"),
        })),
    }
}

/// GET /api/chats — the caller's conversation list, most recent first,
/// with last-message summary and the caller's own unread count.
pub async fn get_conversations(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    let user_id = user.0.id;

    let chats = match chat_db::get_chats_for_user(db.get_ref(), user_id).await {
        Ok(c) => c,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    let mut summaries: Vec<ConversationSummary> = Vec::new();
    for chat in chats {
        let other_user_id = match chat_state::other_participant(&chat, user_id) {
            Some(id) => id,
            None => continue,
        };

        let other_user_name = match user_db::get_user_by_id(db.get_ref(), other_user_id).await {
            Ok(Some(u)) => u.display_name,
            _ => None,
        };

        summaries.push(ConversationSummary {
            chat_id: chat.id,
            booking_id: chat.booking_id,
            other_user_id,
            other_user_name,
            last_message: chat.last_message.clone(),
            last_message_at: chat.last_message_at,
            unread_count: chat_state::unread_for(&chat, user_id).unwrap_or(0),
        });
    }

    HttpResponse::Ok().json(summaries)
}

/// GET /api/chats/{id}/messages?page=1&limit=50 — history in ascending
/// timestamp order. Participants only.
pub async fn get_messages(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<PaginationQuery>,
) -> impl Responder {
    let chat_id = path.into_inner();
    let user_id = user.0.id;

    if let Err(resp) = load_for_participant(db.get_ref(), chat_id, user_id).await {
        return resp;
    }

    match message_db::get_messages_for_chat(db.get_ref(), chat_id, query.page(), query.limit())
        .await
    {
        Ok(messages) => {
            let response: Vec<MessageResponse> = messages.into_iter().map(|m| m.into()).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// POST /api/chats/{id}/messages — send a message. The recipient gets a
/// push with a truncated preview unless they disabled message pushes.
pub async fn send_message(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
    path: web::Path<Uuid>,
    body: web::Json<SendMessage>,
) -> impl Responder {
    let chat_id = path.into_inner();
    let sender = user.0;
    let content = body.into_inner().content;

    if content.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Message content cannot be empty",
        }));
    }

    let chat = match load_for_participant(db.get_ref(), chat_id, sender.id).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let recipient_id = chat_state::other_participant(&chat, sender.id);

    let message =
        match message_db::send_message(db.get_ref(), chat, sender.id, content.clone()).await {
            Ok(m) => m,
            Err(e) => return service_error_response(&e),
        };

    // Best-effort push to the recipient.
    if let Some(recipient_id) = recipient_id {
        match user_db::get_user_by_id(db.get_ref(), recipient_id).await {
            Ok(Some(recipient)) if recipient.message_notifications_enabled => {
                if let Some(token) = recipient.push_token.as_deref() {
                    let title = sender
                        .display_name
                        .clone()
                        .unwrap_or_else(|| "New Message".to_string());
                    notifier
                        .send(
                            token,
                            &title,
                            &truncate_preview(&content),
                            serde_json::json!({
                                "chatId": chat_id,
                                "type": "chat_message",
                                "clickAction": "OPEN_CHAT",
                            }),
                        )
                        .await;
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "could not load message recipient"),
        }
    }

    HttpResponse::Created().json(MessageResponse::from(message))
}

/// POST /api/chats/{id}/read — the caller has seen the thread: their
/// unread counter drops to 0 and incoming messages flip to read.
pub async fn mark_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let chat_id = path.into_inner();
    let user_id = user.0.id;

    let chat = match load_for_participant(db.get_ref(), chat_id, user_id).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match message_db::mark_read(db.get_ref(), chat, user_id).await {
        Ok(marked) => HttpResponse::Ok().json(serde_json::json!({
            "marked_read": marked,
        })),
        Err(e) => service_error_response(&e),
    }
}

/// GET /api/chat/config — poll intervals for clients (no auth required).
/// There is no push channel for chat; clients poll at these rates.
pub async fn chat_config(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "chat_list_poll_secs": config.chat_list_poll_secs,
        "message_poll_secs": config.message_poll_secs,
    }))
}
