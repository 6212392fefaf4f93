//! Verification flow entity for signup and password-reset OTP flows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which multi-step flow this record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum FlowKind {
    #[sea_orm(string_value = "SIGNUP")]
    Signup,
    #[sea_orm(string_value = "PASSWORD_RESET")]
    PasswordReset,
}

/// Server-side state of a verification flow.
///
/// Transitions are driven by the table in `lingkod_core::flow`; the column
/// only persists the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum FlowState {
    #[sea_orm(string_value = "CODE_REQUESTED")]
    #[default]
    CodeRequested,
    #[sea_orm(string_value = "CODE_VERIFIED")]
    CodeVerified,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "verification_flow")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub email: String,

    pub kind: FlowKind,

    pub state: FlowState,

    /// Current 6-digit one-time code
    pub code: String,

    /// Failed verification attempts against the current code
    pub attempts: i32,

    pub expires_at: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
