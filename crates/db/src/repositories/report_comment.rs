//! Report comment repository.

use std::sync::Arc;

use crate::entities::{ReportComment, report_comment};
use lingkod_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Report comment repository for database operations.
#[derive(Clone)]
pub struct ReportCommentRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportCommentRepository {
    /// Create a new report comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new comment.
    pub async fn create(
        &self,
        model: report_comment::ActiveModel,
    ) -> AppResult<report_comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List comments of a report, oldest first.
    pub async fn list_for_report(
        &self,
        report_id: &str,
    ) -> AppResult<Vec<report_comment::Model>> {
        ReportComment::find()
            .filter(report_comment::Column::ReportId.eq(report_id))
            .order_by_asc(report_comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
