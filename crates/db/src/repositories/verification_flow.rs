//! Verification flow repository.

use std::sync::Arc;

use crate::entities::{
    VerificationFlow,
    verification_flow::{self, FlowKind},
};
use lingkod_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

/// Verification flow repository for database operations.
#[derive(Clone)]
pub struct VerificationFlowRepository {
    db: Arc<DatabaseConnection>,
}

impl VerificationFlowRepository {
    /// Create a new verification flow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the live flow for an email and kind.
    pub async fn find_by_email(
        &self,
        email: &str,
        kind: FlowKind,
    ) -> AppResult<Option<verification_flow::Model>> {
        VerificationFlow::find()
            .filter(verification_flow::Column::Email.eq(email.to_lowercase()))
            .filter(verification_flow::Column::Kind.eq(kind))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new flow.
    pub async fn create(
        &self,
        model: verification_flow::ActiveModel,
    ) -> AppResult<verification_flow::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a flow.
    pub async fn update(
        &self,
        model: verification_flow::ActiveModel,
    ) -> AppResult<verification_flow::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the live flow for an email and kind, if any.
    pub async fn delete_by_email(&self, email: &str, kind: FlowKind) -> AppResult<()> {
        VerificationFlow::delete_many()
            .filter(verification_flow::Column::Email.eq(email.to_lowercase()))
            .filter(verification_flow::Column::Kind.eq(kind))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete flows whose code expired before the given cutoff.
    pub async fn delete_expired(
        &self,
        cutoff: chrono::DateTime<chrono::FixedOffset>,
    ) -> AppResult<u64> {
        let result = VerificationFlow::delete_many()
            .filter(verification_flow::Column::ExpiresAt.lt(cutoff))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
