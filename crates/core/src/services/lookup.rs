//! Lookup table management: barangays, report types, valid ID types.
//!
//! Names are unique per table (case-insensitive). Deleting an entry still
//! referenced by a report or user is a conflict.

use chrono::Utc;
use lingkod_common::{AppError, AppResult, IdGenerator};
use lingkod_db::{
    entities::{barangay, report_type, user, valid_id_type},
    repositories::{
        BarangayRepository, ReportRepository, ReportTypeRepository, UserRepository,
        ValidIdTypeRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::audit::AuditService;

/// Input for creating or updating a barangay.
#[derive(Debug, Deserialize, Validate)]
pub struct BarangayInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(max = 128))]
    pub captain_name: Option<String>,

    #[validate(length(max = 32))]
    pub contact_number: Option<String>,
}

/// Input for creating or updating a report type.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportTypeInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(max = 32))]
    pub shortname: Option<String>,

    #[validate(length(max = 1024))]
    pub description: Option<String>,
}

/// Input for creating or updating a valid ID type.
#[derive(Debug, Deserialize, Validate)]
pub struct ValidIdTypeInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(max = 1024))]
    pub description: Option<String>,
}

/// Lookup management service for business logic.
#[derive(Clone)]
pub struct LookupService {
    barangay_repo: BarangayRepository,
    report_type_repo: ReportTypeRepository,
    valid_id_type_repo: ValidIdTypeRepository,
    report_repo: ReportRepository,
    user_repo: UserRepository,
    audit: AuditService,
    id_gen: IdGenerator,
}

impl LookupService {
    /// Create a new lookup service.
    #[must_use]
    pub fn new(
        barangay_repo: BarangayRepository,
        report_type_repo: ReportTypeRepository,
        valid_id_type_repo: ValidIdTypeRepository,
        report_repo: ReportRepository,
        user_repo: UserRepository,
        audit: AuditService,
    ) -> Self {
        Self {
            barangay_repo,
            report_type_repo,
            valid_id_type_repo,
            report_repo,
            user_repo,
            audit,
            id_gen: IdGenerator::new(),
        }
    }

    // --- Barangays ---

    /// List all barangays.
    pub async fn list_barangays(&self) -> AppResult<Vec<barangay::Model>> {
        self.barangay_repo.list().await
    }

    /// Get a barangay by ID.
    pub async fn get_barangay(&self, id: &str) -> AppResult<barangay::Model> {
        self.barangay_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Barangay {id} not found")))
    }

    /// Create a barangay.
    pub async fn create_barangay(
        &self,
        staff: &user::Model,
        input: BarangayInput,
    ) -> AppResult<barangay::Model> {
        input.validate()?;

        if self.barangay_repo.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Barangay \"{}\" already exists",
                input.name
            )));
        }

        let model = barangay::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.clone()),
            captain_name: Set(input.captain_name),
            contact_number: Set(input.contact_number),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let created = self.barangay_repo.create(model).await?;

        self.audit
            .record(staff, "barangay.create", Some(format!("Added barangay \"{}\"", input.name)))
            .await?;

        Ok(created)
    }

    /// Update a barangay.
    pub async fn update_barangay(
        &self,
        staff: &user::Model,
        id: &str,
        input: BarangayInput,
    ) -> AppResult<barangay::Model> {
        input.validate()?;

        let existing = self.get_barangay(id).await?;

        if let Some(other) = self.barangay_repo.find_by_name(&input.name).await? {
            if other.id != existing.id {
                return Err(AppError::Conflict(format!(
                    "Barangay \"{}\" already exists",
                    input.name
                )));
            }
        }

        let mut active: barangay::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.captain_name = Set(input.captain_name);
        active.contact_number = Set(input.contact_number);
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.barangay_repo.update(active).await?;

        self.audit
            .record(staff, "barangay.update", Some(format!("Updated barangay \"{}\"", input.name)))
            .await?;

        Ok(updated)
    }

    /// Delete a barangay not referenced by any report or user.
    pub async fn delete_barangay(&self, staff: &user::Model, id: &str) -> AppResult<()> {
        let existing = self.get_barangay(id).await?;

        if self.report_repo.any_for_barangay(id).await? {
            return Err(AppError::Conflict(
                "Barangay has reports and cannot be deleted".to_string(),
            ));
        }
        if self.user_repo.any_in_barangay(id).await? {
            return Err(AppError::Conflict(
                "Barangay has assigned users and cannot be deleted".to_string(),
            ));
        }

        self.barangay_repo.delete(id).await?;

        self.audit
            .record(
                staff,
                "barangay.delete",
                Some(format!("Removed barangay \"{}\"", existing.name)),
            )
            .await?;

        Ok(())
    }

    // --- Report types ---

    /// List all report types.
    pub async fn list_report_types(&self) -> AppResult<Vec<report_type::Model>> {
        self.report_type_repo.list().await
    }

    /// Create a report type.
    pub async fn create_report_type(
        &self,
        staff: &user::Model,
        input: ReportTypeInput,
    ) -> AppResult<report_type::Model> {
        input.validate()?;

        if self
            .report_type_repo
            .find_by_name(&input.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Report type \"{}\" already exists",
                input.name
            )));
        }

        let model = report_type::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.clone()),
            shortname: Set(input.shortname),
            description: Set(input.description),
            created_at: Set(Utc::now().into()),
        };
        let created = self.report_type_repo.create(model).await?;

        self.audit
            .record(
                staff,
                "report_type.create",
                Some(format!("Added report type \"{}\"", input.name)),
            )
            .await?;

        Ok(created)
    }

    /// Update a report type.
    pub async fn update_report_type(
        &self,
        staff: &user::Model,
        id: &str,
        input: ReportTypeInput,
    ) -> AppResult<report_type::Model> {
        input.validate()?;

        let existing = self
            .report_type_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report type {id} not found")))?;

        if let Some(other) = self.report_type_repo.find_by_name(&input.name).await? {
            if other.id != existing.id {
                return Err(AppError::Conflict(format!(
                    "Report type \"{}\" already exists",
                    input.name
                )));
            }
        }

        let mut active: report_type::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.shortname = Set(input.shortname);
        active.description = Set(input.description);
        let updated = self.report_type_repo.update(active).await?;

        self.audit
            .record(
                staff,
                "report_type.update",
                Some(format!("Updated report type \"{}\"", input.name)),
            )
            .await?;

        Ok(updated)
    }

    /// Delete a report type not referenced by any report.
    pub async fn delete_report_type(&self, staff: &user::Model, id: &str) -> AppResult<()> {
        let existing = self
            .report_type_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report type {id} not found")))?;

        if self.report_repo.any_for_report_type(id).await? {
            return Err(AppError::Conflict(
                "Report type is in use and cannot be deleted".to_string(),
            ));
        }

        self.report_type_repo.delete(id).await?;

        self.audit
            .record(
                staff,
                "report_type.delete",
                Some(format!("Removed report type \"{}\"", existing.name)),
            )
            .await?;

        Ok(())
    }

    // --- Valid ID types ---

    /// List all valid ID types.
    pub async fn list_valid_id_types(&self) -> AppResult<Vec<valid_id_type::Model>> {
        self.valid_id_type_repo.list().await
    }

    /// Create a valid ID type.
    pub async fn create_valid_id_type(
        &self,
        staff: &user::Model,
        input: ValidIdTypeInput,
    ) -> AppResult<valid_id_type::Model> {
        input.validate()?;

        if self
            .valid_id_type_repo
            .find_by_name(&input.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Valid ID type \"{}\" already exists",
                input.name
            )));
        }

        let model = valid_id_type::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.clone()),
            description: Set(input.description),
            created_at: Set(Utc::now().into()),
        };
        let created = self.valid_id_type_repo.create(model).await?;

        self.audit
            .record(
                staff,
                "valid_id_type.create",
                Some(format!("Added valid ID type \"{}\"", input.name)),
            )
            .await?;

        Ok(created)
    }

    /// Update a valid ID type.
    pub async fn update_valid_id_type(
        &self,
        staff: &user::Model,
        id: &str,
        input: ValidIdTypeInput,
    ) -> AppResult<valid_id_type::Model> {
        input.validate()?;

        let existing = self
            .valid_id_type_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Valid ID type {id} not found")))?;

        if let Some(other) = self.valid_id_type_repo.find_by_name(&input.name).await? {
            if other.id != existing.id {
                return Err(AppError::Conflict(format!(
                    "Valid ID type \"{}\" already exists",
                    input.name
                )));
            }
        }

        let mut active: valid_id_type::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.description = Set(input.description);
        let updated = self.valid_id_type_repo.update(active).await?;

        self.audit
            .record(
                staff,
                "valid_id_type.update",
                Some(format!("Updated valid ID type \"{}\"", input.name)),
            )
            .await?;

        Ok(updated)
    }

    /// Delete a valid ID type.
    pub async fn delete_valid_id_type(&self, staff: &user::Model, id: &str) -> AppResult<()> {
        let existing = self
            .valid_id_type_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Valid ID type {id} not found")))?;

        self.valid_id_type_repo.delete(id).await?;

        self.audit
            .record(
                staff,
                "valid_id_type.delete",
                Some(format!("Removed valid ID type \"{}\"", existing.name)),
            )
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingkod_db::{
        entities::user::{ActiveStatus, CreationStatus, UserRole},
        repositories::AuditLogRepository,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_staff() -> user::Model {
        user::Model {
            id: "staff1".to_string(),
            email: "staff@example.com".to_string(),
            email_lower: "staff@example.com".to_string(),
            password_hash: "hash".to_string(),
            token: None,
            role: UserRole::MlgooStaff,
            first_name: "Jun".to_string(),
            last_name: "Reyes".to_string(),
            middle_name: None,
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1985, 6, 1).unwrap(),
            contact_number: None,
            barangay_id: None,
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

    fn sample_barangay(id: &str, name: &str) -> barangay::Model {
        barangay::Model {
            id: id.to_string(),
            name: name.to_string(),
            captain_name: None,
            contact_number: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_service(
        barangay_db: Arc<sea_orm::DatabaseConnection>,
        report_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
    ) -> LookupService {
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        LookupService::new(
            BarangayRepository::new(barangay_db),
            ReportTypeRepository::new(empty()),
            ValidIdTypeRepository::new(empty()),
            ReportRepository::new(report_db),
            UserRepository::new(user_db),
            AuditService::new(AuditLogRepository::new(empty())),
        )
    }

    #[tokio::test]
    async fn test_create_barangay_duplicate_name() {
        let barangay_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[sample_barangay("b1", "Poblacion")]])
                .into_connection(),
        );
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(barangay_db, empty(), empty());
        let staff = create_staff();

        let result = service
            .create_barangay(
                &staff,
                BarangayInput {
                    name: "Poblacion".to_string(),
                    captain_name: None,
                    contact_number: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_barangay_empty_name_rejected() {
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(empty(), empty(), empty());
        let staff = create_staff();

        let result = service
            .create_barangay(
                &staff,
                BarangayInput {
                    name: String::new(),
                    captain_name: None,
                    contact_number: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_barangay_with_reports_conflicts() {
        let barangay_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[sample_barangay("b1", "Poblacion")]])
                .into_connection(),
        );
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .into_connection(),
        );
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(barangay_db, report_db, empty());
        let staff = create_staff();

        let result = service.delete_barangay(&staff, "b1").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_barangay_not_found() {
        let barangay_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<barangay::Model>::new()])
                .into_connection(),
        );
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(barangay_db, empty(), empty());

        let result = service.get_barangay("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
