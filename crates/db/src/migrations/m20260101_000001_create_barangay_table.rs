//! Create barangay table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Barangay::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Barangay::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Barangay::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Barangay::CaptainName).string_len(256))
                    .col(ColumnDef::new(Barangay::ContactNumber).string_len(32))
                    .col(
                        ColumnDef::new(Barangay::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Barangay::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Barangay::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Barangay {
    Table,
    Id,
    Name,
    CaptainName,
    ContactNumber,
    CreatedAt,
    UpdatedAt,
}
