//! Tests for the pure chat bookkeeping deltas: unread counters, read
//! resets, and participant checks.

use chrono::Utc;
use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};
use uuid::Uuid;

use homeserve_backend::chat_state::{other_participant, record_outgoing, record_read, unread_for};
use homeserve_backend::db::messages::incoming_unread_filter;
use homeserve_backend::error::ServiceError;
use homeserve_backend::models::chats::Model as Chat;
use homeserve_backend::models::messages;

fn chat(customer_id: Uuid, provider_id: Uuid) -> Chat {
    Chat {
        id: Uuid::new_v4(),
        customer_id,
        provider_id,
        booking_id: None,
        last_message: None,
        last_message_at: None,
        customer_unread: 0,
        provider_unread: 0,
        created_at: Utc::now(),
    }
}

#[test]
fn test_three_sends_then_read_resets_to_zero() {
    let customer = Uuid::new_v4();
    let provider = Uuid::new_v4();
    let mut chat = chat(customer, provider);
    let now = Utc::now();

    // Customer sends 3 messages the provider never reads.
    for text in ["hello", "are you there?", "my sink is leaking"] {
        chat = record_outgoing(chat, customer, text, now).unwrap();
    }

    assert_eq!(unread_for(&chat, provider), Some(3));
    assert_eq!(unread_for(&chat, customer), Some(0));
    assert_eq!(chat.last_message.as_deref(), Some("my sink is leaking"));
    assert_eq!(chat.last_message_at, Some(now));

    // Provider opens the thread.
    let chat = record_read(chat, provider).unwrap();
    assert_eq!(unread_for(&chat, provider), Some(0));
    // The customer's counter is not touched by the provider's read.
    assert_eq!(unread_for(&chat, customer), Some(0));
}

#[test]
fn test_reading_own_thread_does_not_clear_counterpart() {
    let customer = Uuid::new_v4();
    let provider = Uuid::new_v4();
    let mut chat = chat(customer, provider);
    let now = Utc::now();

    chat = record_outgoing(chat, customer, "ping", now).unwrap();
    chat = record_outgoing(chat, provider, "pong", now).unwrap();

    assert_eq!(unread_for(&chat, provider), Some(1));
    assert_eq!(unread_for(&chat, customer), Some(1));

    // The customer reads; the provider's unread message stays unread.
    let chat = record_read(chat, customer).unwrap();
    assert_eq!(unread_for(&chat, customer), Some(0));
    assert_eq!(unread_for(&chat, provider), Some(1));
}

#[test]
fn test_non_participants_are_rejected() {
    let chat = chat(Uuid::new_v4(), Uuid::new_v4());
    let stranger = Uuid::new_v4();
    let now = Utc::now();

    assert!(other_participant(&chat, stranger).is_none());
    assert_eq!(unread_for(&chat, stranger), None);
    assert!(matches!(
        record_outgoing(chat.clone(), stranger, "hi", now).unwrap_err(),
        ServiceError::Forbidden(_)
    ));
    assert!(matches!(
        record_read(chat, stranger).unwrap_err(),
        ServiceError::Forbidden(_)
    ));
}

#[test]
fn test_mark_read_targets_only_incoming_unread_messages() {
    let chat_id = Uuid::new_v4();
    let reader = Uuid::new_v4();

    let sql = messages::Entity::find()
        .filter(incoming_unread_filter(chat_id, reader))
        .build(DbBackend::Postgres)
        .to_string();

    // Scoped to the chat, and unread only.
    assert!(sql.contains(&format!("\"chat_id\" = '{chat_id}'")), "{sql}");
    assert!(sql.contains("\"is_read\" = FALSE"), "{sql}");
    // The reader's own sent messages are excluded, never matched.
    assert!(sql.contains(&format!("\"sender_id\" <> '{reader}'")), "{sql}");
    assert!(!sql.contains(&format!("\"sender_id\" = '{reader}'")), "{sql}");
}

#[test]
fn test_other_participant_resolves_both_directions() {
    let customer = Uuid::new_v4();
    let provider = Uuid::new_v4();
    let chat = chat(customer, provider);

    assert_eq!(other_participant(&chat, customer), Some(provider));
    assert_eq!(other_participant(&chat, provider), Some(customer));
}
