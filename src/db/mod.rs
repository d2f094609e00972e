pub mod appeals;
pub mod bookings;
pub mod chats;
pub mod messages;
pub mod subscriptions;
pub mod users;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Open a SeaORM connection pool. Constructed once in `main` and handed to
/// every component as actix app data; there is no global client.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
