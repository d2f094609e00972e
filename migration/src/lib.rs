pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users_table;
mod m20260301_000002_create_bookings_table;
mod m20260301_000003_create_chats_table;
mod m20260301_000004_create_messages_table;
mod m20260301_000005_create_subscriptions_table;
mod m20260301_000006_create_suspension_appeals_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users_table::Migration),
            Box::new(m20260301_000002_create_bookings_table::Migration),
            Box::new(m20260301_000003_create_chats_table::Migration),
            Box::new(m20260301_000004_create_messages_table::Migration),
            Box::new(m20260301_000005_create_subscriptions_table::Migration),
            Box::new(m20260301_000006_create_suspension_appeals_table::Migration),
        ]
    }
}
