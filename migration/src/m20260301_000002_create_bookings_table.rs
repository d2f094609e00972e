use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `bookings` table and its columns.
#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    CustomerId,
    ProviderId,
    Service,
    Address,
    ScheduledDate,
    TimeSlot,
    DurationHours,
    HourlyRate,
    TotalPrice,
    Status,
    PaymentStatus,
    PaymentIntentId,
    StartCode,
    CompletionCode,
    CodeExpiresAt,
    CodeAttempts,
    JobStartedAt,
    JobCompletedAt,
    FinalBillAmount,
    BillDetails,
    BillSubmittedAt,
    FinalPaymentId,
    FinalPaymentStatus,
    PaidAt,
    PaymentMethod,
    Rated,
    CreatedAt,
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
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::ProviderId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::Service).string().not_null())
                    .col(ColumnDef::new(Bookings::Address).text().not_null())
                    .col(
                        ColumnDef::new(Bookings::ScheduledDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::TimeSlot).string().not_null())
                    .col(ColumnDef::new(Bookings::DurationHours).double().not_null())
                    .col(ColumnDef::new(Bookings::HourlyRate).double().not_null())
                    .col(ColumnDef::new(Bookings::TotalPrice).double().not_null())
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(ColumnDef::new(Bookings::PaymentStatus).string().not_null())
                    .col(ColumnDef::new(Bookings::PaymentIntentId).string())
                    .col(ColumnDef::new(Bookings::StartCode).char_len(6))
                    .col(ColumnDef::new(Bookings::CompletionCode).char_len(6))
                    .col(
                        ColumnDef::new(Bookings::CodeExpiresAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(Bookings::CodeAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Bookings::JobStartedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Bookings::JobCompletedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(Bookings::FinalBillAmount).double())
                    .col(ColumnDef::new(Bookings::BillDetails).text())
                    .col(
                        ColumnDef::new(Bookings::BillSubmittedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(Bookings::FinalPaymentId).string())
                    .col(ColumnDef::new(Bookings::FinalPaymentStatus).string())
                    .col(ColumnDef::new(Bookings::PaidAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Bookings::PaymentMethod).string())
                    .col(
                        ColumnDef::new(Bookings::Rated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_customer_id")
                            .from(Bookings::Table, Bookings::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_provider_id")
                            .from(Bookings::Table, Bookings::ProviderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Both dashboards filter by party + status.
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_customer_status")
                    .table(Bookings::Table)
                    .col(Bookings::CustomerId)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_provider_status")
                    .table(Bookings::Table)
                    .col(Bookings::ProviderId)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}
