use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `suspension_appeals` table and its columns.
#[derive(DeriveIden)]
enum SuspensionAppeals {
    Table,
    Id,
    ProviderId,
    ContactEmail,
    ContactPhone,
    Description,
    Status,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SuspensionAppeals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SuspensionAppeals::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SuspensionAppeals::ProviderId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionAppeals::ContactEmail)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SuspensionAppeals::ContactPhone).string())
                    .col(
                        ColumnDef::new(SuspensionAppeals::Description)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SuspensionAppeals::Status).string().not_null())
                    .col(
                        ColumnDef::new(SuspensionAppeals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionAppeals::UpdatedAt)
                            .timestamp_with_time_zone(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_suspension_appeals_provider_id")
                            .from(SuspensionAppeals::Table, SuspensionAppeals::ProviderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SuspensionAppeals::Table).to_owned())
            .await
    }
}
