//! Create verification flow table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VerificationFlow::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VerificationFlow::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VerificationFlow::Email)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VerificationFlow::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(VerificationFlow::State)
                            .string_len(16)
                            .not_null()
                            .default("CODE_REQUESTED"),
                    )
                    .col(ColumnDef::new(VerificationFlow::Code).string_len(8).not_null())
                    .col(
                        ColumnDef::new(VerificationFlow::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VerificationFlow::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VerificationFlow::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(VerificationFlow::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique: one live flow per (email, kind)
        manager
            .create_index(
                Index::create()
                    .name("idx_verification_flow_email_kind")
                    .table(VerificationFlow::Table)
                    .col(VerificationFlow::Email)
                    .col(VerificationFlow::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VerificationFlow::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VerificationFlow {
    Table,
    Id,
    Email,
    Kind,
    State,
    Code,
    Attempts,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}
