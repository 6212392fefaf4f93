//! Report service.
//!
//! Submission, review workflow (PENDING → APPROVED | REJECTED), attachments
//! and comments. Visibility: secretaries see only their own barangay's
//! reports, staff see everything.

use std::sync::Arc;

use chrono::Utc;
use lingkod_common::{AppError, AppResult, IdGenerator, StorageBackend, generate_storage_key};
use lingkod_db::{
    entities::{
        notification::NotificationType,
        report::{self, ReportStatus},
        report_attachment, report_comment,
        user::{self, UserRole},
    },
    repositories::{
        ReportCommentRepository, ReportFilter, ReportRepository, ReportTypeRepository,
    },
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::audit::AuditService;
use crate::services::notification::NotificationService;

/// Maximum attachment size in bytes (10 MB).
pub const MAX_ATTACHMENT_SIZE: usize = 10 * 1024 * 1024;

/// Content types accepted for report attachments.
pub const ALLOWED_ATTACHMENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Input for creating a report.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportInput {
    pub report_type_id: String,

    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
}

/// Input for updating a pending report.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReportInput {
    pub report_type_id: Option<String>,

    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(range(min = 2000, max = 2100))]
    pub year: Option<i32>,
}

/// An uploaded file ready to be attached to a report.
#[derive(Debug)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A report with its attachments and comments.
#[derive(Debug, Serialize)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: report::Model,
    pub attachments: Vec<report_attachment::Model>,
    pub comments: Vec<report_comment::Model>,
}

/// Report service for business logic.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    comment_repo: ReportCommentRepository,
    report_type_repo: ReportTypeRepository,
    storage: Arc<dyn StorageBackend>,
    notifications: NotificationService,
    audit: AuditService,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub fn new(
        report_repo: ReportRepository,
        comment_repo: ReportCommentRepository,
        report_type_repo: ReportTypeRepository,
        storage: Arc<dyn StorageBackend>,
        notifications: NotificationService,
        audit: AuditService,
    ) -> Self {
        Self {
            report_repo,
            comment_repo,
            report_type_repo,
            storage,
            notifications,
            audit,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new report with at least one attachment.
    pub async fn create(
        &self,
        submitter: &user::Model,
        input: CreateReportInput,
        attachments: Vec<AttachmentUpload>,
    ) -> AppResult<ReportDetail> {
        input.validate()?;

        let barangay_id = submitter.barangay_id.clone().ok_or_else(|| {
            AppError::BadRequest("Your account has no assigned barangay".to_string())
        })?;

        if attachments.is_empty() {
            return Err(AppError::Validation(
                "At least one attachment is required".to_string(),
            ));
        }
        for upload in &attachments {
            validate_attachment(upload)?;
        }

        if self
            .report_type_repo
            .find_by_id(&input.report_type_id)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest("Unknown report type".to_string()));
        }

        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            barangay_id: Set(barangay_id),
            report_type_id: Set(input.report_type_id),
            submitted_by: Set(submitter.id.clone()),
            title: Set(input.title),
            year: Set(input.year),
            status: Set(ReportStatus::Pending),
            reject_reason: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let created = self.report_repo.create(model).await?;

        let mut stored = Vec::with_capacity(attachments.len());
        for upload in attachments {
            stored.push(self.store_attachment(&created.id, &submitter.id, upload).await?);
        }

        self.audit
            .record(
                submitter,
                "report.submit",
                Some(format!("Submitted report \"{}\"", created.title)),
            )
            .await?;

        tracing::info!(report_id = %created.id, submitter = %submitter.id, "Report submitted");

        Ok(ReportDetail {
            report: created,
            attachments: stored,
            comments: Vec::new(),
        })
    }

    /// List reports visible to the caller, with the total count.
    pub async fn list(
        &self,
        caller: &user::Model,
        mut filter: ReportFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<report::Model>, u64)> {
        if caller.role == UserRole::BarangaySecretary {
            filter.barangay_id = caller.barangay_id.clone();
        }

        let reports = self.report_repo.list(&filter, limit, offset).await?;
        let total = self.report_repo.count(&filter).await?;
        Ok((reports, total))
    }

    /// Get a report with attachments and comments.
    pub async fn get(&self, caller: &user::Model, id: &str) -> AppResult<ReportDetail> {
        let report = self.report_repo.get_by_id(id).await?;
        ensure_visible(caller, &report)?;

        let attachments = self.report_repo.list_attachments(id).await?;
        let comments = self.comment_repo.list_for_report(id).await?;

        Ok(ReportDetail {
            report,
            attachments,
            comments,
        })
    }

    /// Update a pending report owned by the caller.
    pub async fn update(
        &self,
        caller: &user::Model,
        id: &str,
        input: UpdateReportInput,
        new_attachments: Vec<AttachmentUpload>,
    ) -> AppResult<ReportDetail> {
        input.validate()?;

        let report = self.report_repo.get_by_id(id).await?;

        if report.submitted_by != caller.id {
            return Err(AppError::Forbidden(
                "Only the submitter can edit this report".to_string(),
            ));
        }
        if report.status != ReportStatus::Pending {
            return Err(AppError::BadRequest(
                "Only pending reports can be edited".to_string(),
            ));
        }

        for upload in &new_attachments {
            validate_attachment(upload)?;
        }

        if let Some(report_type_id) = &input.report_type_id {
            if self.report_type_repo.find_by_id(report_type_id).await?.is_none() {
                return Err(AppError::BadRequest("Unknown report type".to_string()));
            }
        }

        let mut active: report::ActiveModel = report.into();
        if let Some(report_type_id) = input.report_type_id {
            active.report_type_id = Set(report_type_id);
        }
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(year) = input.year {
            active.year = Set(year);
        }
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.report_repo.update(active).await?;

        for upload in new_attachments {
            self.store_attachment(&updated.id, &caller.id, upload).await?;
        }

        let attachments = self.report_repo.list_attachments(id).await?;
        let comments = self.comment_repo.list_for_report(id).await?;

        Ok(ReportDetail {
            report: updated,
            attachments,
            comments,
        })
    }

    /// Remove an attachment from a pending report owned by the caller.
    ///
    /// A report keeps at least one attachment; removing the last one is
    /// rejected.
    pub async fn remove_attachment(
        &self,
        caller: &user::Model,
        report_id: &str,
        attachment_id: &str,
    ) -> AppResult<()> {
        let report = self.report_repo.get_by_id(report_id).await?;

        if report.submitted_by != caller.id {
            return Err(AppError::Forbidden(
                "Only the submitter can edit this report".to_string(),
            ));
        }
        if report.status != ReportStatus::Pending {
            return Err(AppError::BadRequest(
                "Only pending reports can be edited".to_string(),
            ));
        }

        let attachments = self.report_repo.list_attachments(report_id).await?;
        if !attachments.iter().any(|a| a.id == attachment_id) {
            return Err(AppError::NotFound("Attachment not found".to_string()));
        }
        if attachments.len() == 1 {
            return Err(AppError::BadRequest(
                "A report must keep at least one attachment".to_string(),
            ));
        }

        self.report_repo.delete_attachment(attachment_id).await
    }

    /// Delete a pending report. Owners delete their own; staff can delete any
    /// pending report.
    pub async fn delete(&self, caller: &user::Model, id: &str) -> AppResult<()> {
        let report = self.report_repo.get_by_id(id).await?;

        let is_staff = caller.role == UserRole::MlgooStaff;
        if !is_staff && report.submitted_by != caller.id {
            return Err(AppError::Forbidden(
                "Only the submitter can delete this report".to_string(),
            ));
        }
        if report.status != ReportStatus::Pending {
            return Err(AppError::BadRequest(
                "Only pending reports can be deleted".to_string(),
            ));
        }

        let title = report.title.clone();
        self.report_repo.delete(id).await?;

        self.audit
            .record(caller, "report.delete", Some(format!("Deleted report \"{title}\"")))
            .await?;

        Ok(())
    }

    /// Approve a pending report.
    pub async fn approve(&self, staff: &user::Model, id: &str) -> AppResult<report::Model> {
        let report = self.report_repo.get_by_id(id).await?;

        if report.status != ReportStatus::Pending {
            return Err(AppError::BadRequest(
                "Only pending reports can be approved".to_string(),
            ));
        }

        let submitter_id = report.submitted_by.clone();
        let title = report.title.clone();

        let mut active: report::ActiveModel = report.into();
        active.status = Set(ReportStatus::Approved);
        active.reject_reason = Set(None);
        active.reviewed_by = Set(Some(staff.id.clone()));
        active.reviewed_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.report_repo.update(active).await?;

        self.notifications
            .notify_user(
                &submitter_id,
                "Report approved",
                &format!("Your report \"{title}\" has been approved."),
                NotificationType::Success,
            )
            .await?;

        self.audit
            .record(staff, "report.approve", Some(format!("Approved report \"{title}\"")))
            .await?;

        tracing::info!(report_id = %updated.id, staff_id = %staff.id, "Report approved");

        Ok(updated)
    }

    /// Reject a pending report with a reason.
    pub async fn reject(
        &self,
        staff: &user::Model,
        id: &str,
        reason: &str,
    ) -> AppResult<report::Model> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "A rejection reason is required".to_string(),
            ));
        }

        let report = self.report_repo.get_by_id(id).await?;

        if report.status != ReportStatus::Pending {
            return Err(AppError::BadRequest(
                "Only pending reports can be rejected".to_string(),
            ));
        }

        let submitter_id = report.submitted_by.clone();
        let title = report.title.clone();

        let mut active: report::ActiveModel = report.into();
        active.status = Set(ReportStatus::Rejected);
        active.reject_reason = Set(Some(reason.to_string()));
        active.reviewed_by = Set(Some(staff.id.clone()));
        active.reviewed_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.report_repo.update(active).await?;

        self.notifications
            .notify_user(
                &submitter_id,
                "Report rejected",
                &format!("Your report \"{title}\" was rejected: {reason}"),
                NotificationType::Alert,
            )
            .await?;

        self.audit
            .record(
                staff,
                "report.reject",
                Some(format!("Rejected report \"{title}\": {reason}")),
            )
            .await?;

        Ok(updated)
    }

    /// Add a comment to a report the caller can see.
    pub async fn add_comment(
        &self,
        caller: &user::Model,
        report_id: &str,
        body: &str,
    ) -> AppResult<report_comment::Model> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("Comment cannot be empty".to_string()));
        }

        let report = self.report_repo.get_by_id(report_id).await?;
        ensure_visible(caller, &report)?;

        let model = report_comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            report_id: Set(report_id.to_string()),
            author_id: Set(caller.id.clone()),
            body: Set(body.to_string()),
            created_at: Set(Utc::now().into()),
        };
        self.comment_repo.create(model).await
    }

    async fn store_attachment(
        &self,
        report_id: &str,
        owner_id: &str,
        upload: AttachmentUpload,
    ) -> AppResult<report_attachment::Model> {
        let key = generate_storage_key(owner_id, &upload.file_name);
        let stored = self
            .storage
            .upload(&key, &upload.data, &upload.content_type)
            .await?;

        let model = report_attachment::ActiveModel {
            id: Set(self.id_gen.generate()),
            report_id: Set(report_id.to_string()),
            file_name: Set(upload.file_name),
            content_type: Set(stored.content_type),
            size: Set(stored.size as i64),
            url: Set(stored.url),
            md5: Set(stored.md5),
            created_at: Set(Utc::now().into()),
        };
        self.report_repo.add_attachment(model).await
    }
}

/// Validate an attachment's content type and size.
fn validate_attachment(upload: &AttachmentUpload) -> AppResult<()> {
    if !ALLOWED_ATTACHMENT_TYPES.contains(&upload.content_type.as_str()) {
        return Err(AppError::Validation(format!(
            "File type {} is not allowed",
            upload.content_type
        )));
    }
    if upload.data.len() > MAX_ATTACHMENT_SIZE {
        return Err(AppError::Validation(format!(
            "File {} exceeds the 10MB limit",
            upload.file_name
        )));
    }
    if upload.data.is_empty() {
        return Err(AppError::Validation(format!(
            "File {} is empty",
            upload.file_name
        )));
    }
    Ok(())
}

fn ensure_visible(caller: &user::Model, report: &report::Model) -> AppResult<()> {
    if caller.role == UserRole::MlgooStaff {
        return Ok(());
    }
    if caller.barangay_id.as_deref() == Some(report.barangay_id.as_str()) {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "This report belongs to another barangay".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingkod_common::LocalStorage;
    use lingkod_db::{
        entities::user::{ActiveStatus, CreationStatus},
        repositories::{AuditLogRepository, NotificationRepository, UserRepository},
    };
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_secretary(id: &str, barangay_id: Option<&str>) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            email_lower: format!("{id}@example.com"),
            password_hash: "hash".to_string(),
            token: None,
            role: UserRole::BarangaySecretary,
            first_name: "Ana".to_string(),
            last_name: "Santos".to_string(),
            middle_name: None,
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            contact_number: None,
            barangay_id: barangay_id.map(String::from),
            valid_id_type_id: None,
            id_front_url: None,
            id_back_url: None,
            creation_status: CreationStatus::Approved,
            reject_reason: None,
            active_status: Some(ActiveStatus::Active),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_staff(id: &str) -> user::Model {
        let mut user = create_secretary(id, None);
        user.role = UserRole::MlgooStaff;
        user
    }

    fn sample_report(id: &str, status: ReportStatus) -> report::Model {
        report::Model {
            id: id.to_string(),
            barangay_id: "brgy1".to_string(),
            report_type_id: "rt1".to_string(),
            submitted_by: "sec1".to_string(),
            title: "Annual accomplishment report".to_string(),
            year: 2026,
            status,
            reject_reason: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn sample_upload(content_type: &str, size: usize) -> AttachmentUpload {
        AttachmentUpload {
            file_name: "report.pdf".to_string(),
            content_type: content_type.to_string(),
            data: vec![0u8; size],
        }
    }

    fn create_test_service(report_db: Arc<sea_orm::DatabaseConnection>) -> ReportService {
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let storage = Arc::new(LocalStorage::new(
            std::env::temp_dir().join("lingkod-test-files"),
            "/files".to_string(),
        ));
        ReportService::new(
            ReportRepository::new(report_db),
            ReportCommentRepository::new(empty()),
            ReportTypeRepository::new(empty()),
            storage,
            NotificationService::new(
                NotificationRepository::new(empty()),
                UserRepository::new(empty()),
            ),
            AuditService::new(AuditLogRepository::new(empty())),
        )
    }

    #[test]
    fn test_attachment_validation_accepts_allowed_types() {
        assert!(validate_attachment(&sample_upload("application/pdf", 100)).is_ok());
        assert!(validate_attachment(&sample_upload("image/png", 100)).is_ok());
    }

    #[test]
    fn test_attachment_validation_rejects_bad_type() {
        let result = validate_attachment(&sample_upload("application/zip", 100));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_attachment_validation_rejects_oversize() {
        let result = validate_attachment(&sample_upload("application/pdf", MAX_ATTACHMENT_SIZE + 1));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_attachment_validation_rejects_empty_file() {
        let result = validate_attachment(&sample_upload("application/pdf", 0));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_visibility_staff_sees_all() {
        let staff = create_staff("staff1");
        let report = sample_report("r1", ReportStatus::Pending);
        assert!(ensure_visible(&staff, &report).is_ok());
    }

    #[test]
    fn test_visibility_other_barangay_forbidden() {
        let secretary = create_secretary("sec2", Some("brgy2"));
        let report = sample_report("r1", ReportStatus::Pending);
        assert!(matches!(
            ensure_visible(&secretary, &report),
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_create_requires_attachment() {
        let report_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(report_db);
        let secretary = create_secretary("sec1", Some("brgy1"));

        let input = CreateReportInput {
            report_type_id: "rt1".to_string(),
            title: "Annual report".to_string(),
            year: 2026,
        };

        let result = service.create(&secretary, input, Vec::new()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_requires_barangay() {
        let report_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(report_db);
        let secretary = create_secretary("sec1", None);

        let input = CreateReportInput {
            report_type_id: "rt1".to_string(),
            title: "Annual report".to_string(),
            year: 2026,
        };

        let result = service
            .create(&secretary, input, vec![sample_upload("application/pdf", 10)])
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_approve_non_pending_rejected() {
        let report = sample_report("r1", ReportStatus::Approved);
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );
        let service = create_test_service(report_db);
        let staff = create_staff("staff1");

        let result = service.approve(&staff, "r1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let report_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(report_db);
        let staff = create_staff("staff1");

        let result = service.reject(&staff, "r1", "").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_reject_non_pending_rejected() {
        let report = sample_report("r1", ReportStatus::Rejected);
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );
        let service = create_test_service(report_db);
        let staff = create_staff("staff1");

        let result = service.reject(&staff, "r1", "Late submission").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_by_non_owner_forbidden() {
        let report = sample_report("r1", ReportStatus::Pending);
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );
        let service = create_test_service(report_db);
        let other = create_secretary("sec2", Some("brgy1"));

        let result = service
            .update(&other, "r1", UpdateReportInput::default(), Vec::new())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_approved_report_rejected() {
        let report = sample_report("r1", ReportStatus::Approved);
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );
        let service = create_test_service(report_db);
        let owner = create_secretary("sec1", Some("brgy1"));

        let result = service.delete(&owner, "r1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_remove_last_attachment_rejected() {
        let report = sample_report("r1", ReportStatus::Pending);
        let attachment = report_attachment::Model {
            id: "att1".to_string(),
            report_id: "r1".to_string(),
            file_name: "report.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size: 100,
            url: "/files/report.pdf".to_string(),
            md5: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
            created_at: Utc::now().into(),
        };
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .append_query_results([[attachment]])
                .into_connection(),
        );
        let service = create_test_service(report_db);
        let owner = create_secretary("sec1", Some("brgy1"));

        let result = service.remove_attachment(&owner, "r1", "att1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_add_comment_empty_body_rejected() {
        let report_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(report_db);
        let staff = create_staff("staff1");

        let result = service.add_comment(&staff, "r1", "  ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
