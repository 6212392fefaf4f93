//! Create policy section table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PolicySection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PolicySection::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PolicySection::Document).string_len(32).not_null())
                    .col(ColumnDef::new(PolicySection::Title).string_len(256).not_null())
                    .col(ColumnDef::new(PolicySection::Body).text().not_null())
                    .col(
                        ColumnDef::new(PolicySection::DisplayOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PolicySection::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(PolicySection::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique: no two sections of a document share a display_order
        manager
            .create_index(
                Index::create()
                    .name("idx_policy_section_document_order")
                    .table(PolicySection::Table)
                    .col(PolicySection::Document)
                    .col(PolicySection::DisplayOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PolicySection::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PolicySection {
    Table,
    Id,
    Document,
    Title,
    Body,
    DisplayOrder,
    CreatedAt,
    UpdatedAt,
}
