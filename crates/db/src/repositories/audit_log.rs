//! Audit log repository.

use std::sync::Arc;

use crate::entities::{AuditLog, audit_log};
use lingkod_common::{AppError, AppResult};
use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

/// Audit log repository for database operations.
#[derive(Clone)]
pub struct AuditLogRepository {
    db: Arc<DatabaseConnection>,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a log entry.
    pub async fn create(&self, model: audit_log::ActiveModel) -> AppResult<audit_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn ranged(
        from: Option<DateTime<FixedOffset>>,
        to: Option<DateTime<FixedOffset>>,
    ) -> Select<AuditLog> {
        let mut query = AuditLog::find();
        if let Some(from) = from {
            query = query.filter(audit_log::Column::CreatedAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(audit_log::Column::CreatedAt.lte(to));
        }
        query
    }

    /// List log entries in a date range (paginated, newest first).
    pub async fn list(
        &self,
        from: Option<DateTime<FixedOffset>>,
        to: Option<DateTime<FixedOffset>>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<audit_log::Model>> {
        Self::ranged(from, to)
            .order_by_desc(audit_log::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count log entries in a date range.
    pub async fn count(
        &self,
        from: Option<DateTime<FixedOffset>>,
        to: Option<DateTime<FixedOffset>>,
    ) -> AppResult<u64> {
        Self::ranged(from, to)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List the most recent entries.
    pub async fn list_recent(&self, limit: u64) -> AppResult<Vec<audit_log::Model>> {
        AuditLog::find()
            .order_by_desc(audit_log::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete all entries inside an inclusive date range.
    pub async fn delete_range(
        &self,
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
    ) -> AppResult<u64> {
        let result = AuditLog::delete_many()
            .filter(audit_log::Column::CreatedAt.gte(from))
            .filter(audit_log::Column::CreatedAt.lte(to))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
