//! Report type repository.

use std::sync::Arc;

use crate::entities::{ReportType, report_type};
use lingkod_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
    sea_query::{Expr, Func},
};

/// Report type repository for database operations.
#[derive(Clone)]
pub struct ReportTypeRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportTypeRepository {
    /// Create a new report type repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a report type by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<report_type::Model>> {
        ReportType::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a report type by name (case-insensitive).
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<report_type::Model>> {
        ReportType::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(report_type::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all report types, alphabetical.
    pub async fn list(&self) -> AppResult<Vec<report_type::Model>> {
        ReportType::find()
            .order_by_asc(report_type::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new report type.
    pub async fn create(&self, model: report_type::ActiveModel) -> AppResult<report_type::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a report type.
    pub async fn update(&self, model: report_type::ActiveModel) -> AppResult<report_type::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a report type.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let report_type = self.find_by_id(id).await?;
        if let Some(t) = report_type {
            t.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
