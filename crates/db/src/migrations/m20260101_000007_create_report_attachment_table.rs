//! Create report attachment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReportAttachment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportAttachment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReportAttachment::ReportId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportAttachment::FileName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportAttachment::ContentType)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReportAttachment::Size).big_integer().not_null())
                    .col(ColumnDef::new(ReportAttachment::Url).string_len(512).not_null())
                    .col(ColumnDef::new(ReportAttachment::Md5).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ReportAttachment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_attachment_report")
                            .from(ReportAttachment::Table, ReportAttachment::ReportId)
                            .to(Report::Table, Report::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_attachment_report_id")
                    .table(ReportAttachment::Table)
                    .col(ReportAttachment::ReportId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReportAttachment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReportAttachment {
    Table,
    Id,
    ReportId,
    FileName,
    ContentType,
    Size,
    Url,
    Md5,
    CreatedAt,
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
}
