//! Audit log entity.
//!
//! Append-only record of actions; rows are removed only in bulk by date
//! range.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Acting user; NULL for system actions or deleted accounts
    #[sea_orm(nullable)]
    pub actor_id: Option<String>,

    /// Display name of the actor at the time of the action
    pub actor_name: String,

    /// Action identifier, e.g. "report.approve"
    pub action: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
