//! Report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Review status of a report.
///
/// PENDING is the only state from which a transition is allowed:
/// PENDING -> APPROVED or PENDING -> REJECTED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum ReportStatus {
    #[sea_orm(string_value = "PENDING")]
    #[default]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub barangay_id: String,

    pub report_type_id: String,

    /// Secretary who submitted the report
    pub submitted_by: String,

    pub title: String,

    /// Reporting year the submission covers
    pub year: i32,

    pub status: ReportStatus,

    /// Non-empty iff status is REJECTED
    #[sea_orm(column_type = "Text", nullable)]
    pub reject_reason: Option<String>,

    /// Staff member who approved or rejected the report
    #[sea_orm(nullable)]
    pub reviewed_by: Option<String>,

    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::barangay::Entity",
        from = "Column::BarangayId",
        to = "super::barangay::Column::Id"
    )]
    Barangay,

    #[sea_orm(
        belongs_to = "super::report_type::Entity",
        from = "Column::ReportTypeId",
        to = "super::report_type::Column::Id"
    )]
    ReportType,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SubmittedBy",
        to = "super::user::Column::Id"
    )]
    Submitter,

    #[sea_orm(has_many = "super::report_attachment::Entity")]
    Attachments,

    #[sea_orm(has_many = "super::report_comment::Entity")]
    Comments,
}

impl Related<super::barangay::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Barangay.def()
    }
}

impl Related<super::report_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportType.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submitter.def()
    }
}

impl Related<super::report_attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl Related<super::report_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
