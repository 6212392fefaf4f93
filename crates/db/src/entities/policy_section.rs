//! Policy section entity.
//!
//! Ordered content blocks for the privacy policy and terms of service.
//! `display_order` values form a dense unique sequence per document;
//! reordering swaps exactly two values at a time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which policy document a section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyDocument {
    #[sea_orm(string_value = "PRIVACY_POLICY")]
    PrivacyPolicy,
    #[sea_orm(string_value = "TERMS_OF_SERVICE")]
    TermsOfService,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "policy_section")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub document: PolicyDocument,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    /// Position within the document, dense from 0
    pub display_order: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
