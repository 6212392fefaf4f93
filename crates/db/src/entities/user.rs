//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Barangay secretary: submits reports for their assigned barangay.
    #[sea_orm(string_value = "BARANGAY_SECRETARY")]
    BarangaySecretary,
    /// Municipal staff (MLGOO): reviews reports and manages accounts.
    #[sea_orm(string_value = "MLGOO_STAFF")]
    MlgooStaff,
}

/// Account approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum CreationStatus {
    #[sea_orm(string_value = "PENDING")]
    #[default]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// Activation status of an approved account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActiveStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "DEACTIVATED")]
    Deactivated,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    pub email_lower: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Access token; NULL when signed out or deactivated
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    pub role: UserRole,

    pub first_name: String,

    pub last_name: String,

    #[sea_orm(nullable)]
    pub middle_name: Option<String>,

    pub date_of_birth: Date,

    #[sea_orm(nullable)]
    pub contact_number: Option<String>,

    /// Assigned barangay (required for secretaries)
    #[sea_orm(nullable)]
    pub barangay_id: Option<String>,

    /// Type of the submitted verification ID
    #[sea_orm(nullable)]
    pub valid_id_type_id: Option<String>,

    /// Front image of the verification ID
    #[sea_orm(nullable)]
    pub id_front_url: Option<String>,

    /// Back image of the verification ID
    #[sea_orm(nullable)]
    pub id_back_url: Option<String>,

    /// Approval workflow status
    pub creation_status: CreationStatus,

    /// Reason given when the account was rejected
    #[sea_orm(column_type = "Text", nullable)]
    pub reject_reason: Option<String>,

    /// NULL until the account is approved
    #[sea_orm(nullable)]
    pub active_status: Option<ActiveStatus>,

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
        belongs_to = "super::valid_id_type::Entity",
        from = "Column::ValidIdTypeId",
        to = "super::valid_id_type::Column::Id"
    )]
    ValidIdType,

    #[sea_orm(has_many = "super::report::Entity")]
    Reports,
}

impl Related<super::barangay::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Barangay.def()
    }
}

impl Related<super::valid_id_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ValidIdType.def()
    }
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Full display name, "Last, First".
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// Whether the account may sign in.
    #[must_use]
    pub fn can_sign_in(&self) -> bool {
        self.creation_status == CreationStatus::Approved
            && self.active_status == Some(ActiveStatus::Active)
    }
}
