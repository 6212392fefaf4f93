//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_barangay_table;
mod m20260101_000002_create_valid_id_type_table;
mod m20260101_000003_create_report_type_table;
mod m20260101_000004_create_user_table;
mod m20260101_000005_create_verification_flow_table;
mod m20260101_000006_create_report_table;
mod m20260101_000007_create_report_attachment_table;
mod m20260101_000008_create_report_comment_table;
mod m20260101_000009_create_policy_section_table;
mod m20260101_000010_create_notification_tables;
mod m20260101_000011_create_audit_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_barangay_table::Migration),
            Box::new(m20260101_000002_create_valid_id_type_table::Migration),
            Box::new(m20260101_000003_create_report_type_table::Migration),
            Box::new(m20260101_000004_create_user_table::Migration),
            Box::new(m20260101_000005_create_verification_flow_table::Migration),
            Box::new(m20260101_000006_create_report_table::Migration),
            Box::new(m20260101_000007_create_report_attachment_table::Migration),
            Box::new(m20260101_000008_create_report_comment_table::Migration),
            Box::new(m20260101_000009_create_policy_section_table::Migration),
            Box::new(m20260101_000010_create_notification_tables::Migration),
            Box::new(m20260101_000011_create_audit_log_table::Migration),
        ]
    }
}
