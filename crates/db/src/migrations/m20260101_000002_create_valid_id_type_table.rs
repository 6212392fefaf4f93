//! Create valid ID type table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ValidIdType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ValidIdType::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ValidIdType::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ValidIdType::Description).text())
                    .col(
                        ColumnDef::new(ValidIdType::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ValidIdType::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ValidIdType {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}
