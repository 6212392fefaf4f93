//! Create report table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Report::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Report::BarangayId).string_len(32).not_null())
                    .col(ColumnDef::new(Report::ReportTypeId).string_len(32).not_null())
                    .col(ColumnDef::new(Report::SubmittedBy).string_len(32).not_null())
                    .col(ColumnDef::new(Report::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Report::Year).integer().not_null())
                    .col(
                        ColumnDef::new(Report::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Report::RejectReason).text())
                    .col(ColumnDef::new(Report::ReviewedBy).string_len(32))
                    .col(ColumnDef::new(Report::ReviewedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Report::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_barangay")
                            .from(Report::Table, Report::BarangayId)
                            .to(Barangay::Table, Barangay::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_report_type")
                            .from(Report::Table, Report::ReportTypeId)
                            .to(ReportType::Table, ReportType::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_submitter")
                            .from(Report::Table, Report::SubmittedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (barangay_id, status) (for filtered listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_report_barangay_status")
                    .table(Report::Table)
                    .col(Report::BarangayId)
                    .col(Report::Status)
                    .to_owned(),
            )
            .await?;

        // Index: (year, report_type_id) (for dashboard aggregation)
        manager
            .create_index(
                Index::create()
                    .name("idx_report_year_type")
                    .table(Report::Table)
                    .col(Report::Year)
                    .col(Report::ReportTypeId)
                    .to_owned(),
            )
            .await?;

        // Index: submitted_by (for owner listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_report_submitted_by")
                    .table(Report::Table)
                    .col(Report::SubmittedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
    BarangayId,
    ReportTypeId,
    SubmittedBy,
    Title,
    Year,
    Status,
    RejectReason,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Barangay {
    Table,
    Id,
}

#[derive(Iden)]
enum ReportType {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
