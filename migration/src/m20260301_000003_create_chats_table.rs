use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `chats` table and its columns.
#[derive(DeriveIden)]
enum Chats {
    Table,
    Id,
    CustomerId,
    ProviderId,
    BookingId,
    LastMessage,
    LastMessageAt,
    CustomerUnread,
    ProviderUnread,
    CreatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Chats::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Chats::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Chats::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Chats::ProviderId).uuid().not_null())
                    .col(ColumnDef::new(Chats::BookingId).uuid())
                    .col(ColumnDef::new(Chats::LastMessage).text())
                    .col(ColumnDef::new(Chats::LastMessageAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Chats::CustomerUnread)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Chats::ProviderUnread)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Chats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chats_customer_id")
                            .from(Chats::Table, Chats::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chats_provider_id")
                            .from(Chats::Table, Chats::ProviderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chats_booking_id")
                            .from(Chats::Table, Chats::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one chat per (customer, provider, booking). NULLS NOT
        // DISTINCT so a general chat (no booking) is also unique per pair.
        manager
            .create_index(
                Index::create()
                    .name("uniq_chats_participants_booking")
                    .table(Chats::Table)
                    .col(Chats::CustomerId)
                    .col(Chats::ProviderId)
                    .col(Chats::BookingId)
                    .unique()
                    .nulls_not_distinct()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Chats::Table).to_owned())
            .await
    }
}
