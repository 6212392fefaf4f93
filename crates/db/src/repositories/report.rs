//! Report repository.

use std::sync::Arc;

use crate::entities::{
    Report, ReportAttachment, report::{self, ReportStatus}, report_attachment,
};
use lingkod_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};

/// Filters for report listings.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Free-text search over the title.
    pub search: Option<String>,
    /// Restrict to a reporting year.
    pub year: Option<i32>,
    /// Restrict to a report type.
    pub report_type_id: Option<String>,
    /// Restrict to a status.
    pub status: Option<ReportStatus>,
    /// Restrict to a barangay.
    pub barangay_id: Option<String>,
    /// Restrict to a submitter.
    pub submitted_by: Option<String>,
}

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a report by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReportNotFound(id.to_string()))
    }

    /// Create a new report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a report.
    pub async fn update(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a report (attachments and comments cascade).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let report = self.find_by_id(id).await?;
        if let Some(r) = report {
            r.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    fn filtered(filter: &ReportFilter) -> Select<Report> {
        let mut query = Report::find();

        if let Some(ref search) = filter.search {
            query = query.filter(report::Column::Title.like(format!("%{search}%")));
        }
        if let Some(year) = filter.year {
            query = query.filter(report::Column::Year.eq(year));
        }
        if let Some(ref type_id) = filter.report_type_id {
            query = query.filter(report::Column::ReportTypeId.eq(type_id.clone()));
        }
        if let Some(status) = filter.status {
            query = query.filter(report::Column::Status.eq(status));
        }
        if let Some(ref barangay_id) = filter.barangay_id {
            query = query.filter(report::Column::BarangayId.eq(barangay_id.clone()));
        }
        if let Some(ref submitter) = filter.submitted_by {
            query = query.filter(report::Column::SubmittedBy.eq(submitter.clone()));
        }

        query
    }

    /// List reports matching the filter (paginated, newest first).
    pub async fn list(
        &self,
        filter: &ReportFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        Self::filtered(filter)
            .order_by_desc(report::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reports matching the filter.
    pub async fn count(&self, filter: &ReportFilter) -> AppResult<u64> {
        Self::filtered(filter)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reports with the given status.
    pub async fn count_by_status(&self, status: ReportStatus) -> AppResult<u64> {
        Report::find()
            .filter(report::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reports for a barangay in a year.
    pub async fn count_for_barangay(&self, barangay_id: &str, year: i32) -> AppResult<u64> {
        Report::find()
            .filter(report::Column::BarangayId.eq(barangay_id))
            .filter(report::Column::Year.eq(year))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether any report references the given barangay.
    pub async fn any_for_barangay(&self, barangay_id: &str) -> AppResult<bool> {
        let count = Report::find()
            .filter(report::Column::BarangayId.eq(barangay_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Whether any report references the given report type.
    pub async fn any_for_report_type(&self, report_type_id: &str) -> AppResult<bool> {
        let count = Report::find()
            .filter(report::Column::ReportTypeId.eq(report_type_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    // === Attachments ===

    /// Add an attachment row.
    pub async fn add_attachment(
        &self,
        model: report_attachment::ActiveModel,
    ) -> AppResult<report_attachment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List attachments of a report.
    pub async fn list_attachments(
        &self,
        report_id: &str,
    ) -> AppResult<Vec<report_attachment::Model>> {
        ReportAttachment::find()
            .filter(report_attachment::Column::ReportId.eq(report_id))
            .order_by_asc(report_attachment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an attachment row.
    pub async fn delete_attachment(&self, id: &str) -> AppResult<()> {
        ReportAttachment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
