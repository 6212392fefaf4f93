//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(User::Email)
                            .string_len(256)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::EmailLower).string_len(256).not_null())
                    .col(ColumnDef::new(User::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(User::Token).string_len(64).unique_key())
                    .col(ColumnDef::new(User::Role).string_len(32).not_null())
                    .col(ColumnDef::new(User::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(User::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(User::MiddleName).string_len(128))
                    .col(ColumnDef::new(User::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(User::ContactNumber).string_len(32))
                    .col(ColumnDef::new(User::BarangayId).string_len(32))
                    .col(ColumnDef::new(User::ValidIdTypeId).string_len(32))
                    .col(ColumnDef::new(User::IdFrontUrl).string_len(512))
                    .col(ColumnDef::new(User::IdBackUrl).string_len(512))
                    .col(
                        ColumnDef::new(User::CreationStatus)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(User::RejectReason).text())
                    .col(ColumnDef::new(User::ActiveStatus).string_len(16))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_barangay")
                            .from(User::Table, User::BarangayId)
                            .to(Barangay::Table, Barangay::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_valid_id_type")
                            .from(User::Table, User::ValidIdTypeId)
                            .to(ValidIdType::Table, ValidIdType::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: email_lower (for case-insensitive lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_email_lower")
                    .table(User::Table)
                    .col(User::EmailLower)
                    .to_owned(),
            )
            .await?;

        // Index: (role, creation_status) (for staff user listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_role_creation_status")
                    .table(User::Table)
                    .col(User::Role)
                    .col(User::CreationStatus)
                    .to_owned(),
            )
            .await?;

        // Index: barangay_id (for per-barangay listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_barangay_id")
                    .table(User::Table)
                    .col(User::BarangayId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Email,
    EmailLower,
    PasswordHash,
    Token,
    Role,
    FirstName,
    LastName,
    MiddleName,
    DateOfBirth,
    ContactNumber,
    BarangayId,
    ValidIdTypeId,
    IdFrontUrl,
    IdBackUrl,
    CreationStatus,
    RejectReason,
    ActiveStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Barangay {
    Table,
    Id,
}

#[derive(Iden)]
enum ValidIdType {
    Table,
    Id,
}
