pub mod auth;
pub mod chat_state;
pub mod codes;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod notify;
pub mod payments;

pub use db::create_pool;
