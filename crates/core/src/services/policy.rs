//! Policy document service.
//!
//! Ordered sections for the privacy policy and terms of service. New
//! sections append at the end; reordering is a pairwise swap with the
//! adjacent section, so a double move restores the original order.

use chrono::Utc;
use lingkod_common::{AppError, AppResult, IdGenerator};
use lingkod_db::{
    entities::{
        policy_section::{self, PolicyDocument},
        user,
    },
    repositories::PolicySectionRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::audit::AuditService;

/// Input for creating or updating a policy section.
#[derive(Debug, Deserialize, Validate)]
pub struct PolicySectionInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 16384))]
    pub body: String,
}

/// Direction of a pairwise reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Policy document service for business logic.
#[derive(Clone)]
pub struct PolicyService {
    repo: PolicySectionRepository,
    audit: AuditService,
    id_gen: IdGenerator,
}

impl PolicyService {
    /// Create a new policy service.
    #[must_use]
    pub fn new(repo: PolicySectionRepository, audit: AuditService) -> Self {
        Self {
            repo,
            audit,
            id_gen: IdGenerator::new(),
        }
    }

    /// List a document's sections in display order.
    pub async fn list(&self, document: PolicyDocument) -> AppResult<Vec<policy_section::Model>> {
        self.repo.list_for_document(document).await
    }

    /// Append a section at the end of a document.
    pub async fn create(
        &self,
        staff: &user::Model,
        document: PolicyDocument,
        input: PolicySectionInput,
    ) -> AppResult<policy_section::Model> {
        input.validate()?;

        // Orders are dense from 0, so the next slot is the current count.
        let next_order = self.repo.count_for_document(document).await? as i32;

        let model = policy_section::ActiveModel {
            id: Set(self.id_gen.generate()),
            document: Set(document),
            title: Set(input.title.clone()),
            body: Set(input.body),
            display_order: Set(next_order),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let created = self.repo.create(model).await?;

        self.audit
            .record(
                staff,
                "policy.create",
                Some(format!("Added section \"{}\"", input.title)),
            )
            .await?;

        Ok(created)
    }

    /// Update a section's title and body.
    pub async fn update(
        &self,
        staff: &user::Model,
        id: &str,
        input: PolicySectionInput,
    ) -> AppResult<policy_section::Model> {
        input.validate()?;

        let existing = self.get(id).await?;

        let mut active: policy_section::ActiveModel = existing.into();
        active.title = Set(input.title.clone());
        active.body = Set(input.body);
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.repo.update(active).await?;

        self.audit
            .record(
                staff,
                "policy.update",
                Some(format!("Updated section \"{}\"", input.title)),
            )
            .await?;

        Ok(updated)
    }

    /// Swap a section with its neighbor above or below.
    pub async fn move_section(
        &self,
        staff: &user::Model,
        id: &str,
        direction: MoveDirection,
    ) -> AppResult<()> {
        let section = self.get(id).await?;

        let neighbor_order = match direction {
            MoveDirection::Up => section.display_order - 1,
            MoveDirection::Down => section.display_order + 1,
        };

        let sections = self.repo.list_for_document(section.document).await?;
        let neighbor = sections
            .into_iter()
            .find(|s| s.display_order == neighbor_order)
            .ok_or_else(|| {
                AppError::BadRequest(match direction {
                    MoveDirection::Up => "Section is already first".to_string(),
                    MoveDirection::Down => "Section is already last".to_string(),
                })
            })?;

        self.repo.swap_orders(&section, &neighbor).await?;

        self.audit
            .record(
                staff,
                "policy.reorder",
                Some(format!("Moved section \"{}\"", section.title)),
            )
            .await?;

        Ok(())
    }

    /// Delete a section, closing the display-order gap.
    pub async fn delete(&self, staff: &user::Model, id: &str) -> AppResult<()> {
        let section = self.get(id).await?;

        self.repo.delete_and_renumber(&section).await?;

        self.audit
            .record(
                staff,
                "policy.delete",
                Some(format!("Removed section \"{}\"", section.title)),
            )
            .await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> AppResult<policy_section::Model> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Policy section {id} not found")))
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

    fn sample_section(id: &str, order: i32) -> policy_section::Model {
        policy_section::Model {
            id: id.to_string(),
            document: PolicyDocument::PrivacyPolicy,
            title: format!("Section {order}"),
            body: "Body text".to_string(),
            display_order: order,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_service(policy_db: Arc<sea_orm::DatabaseConnection>) -> PolicyService {
        let audit_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        PolicyService::new(
            PolicySectionRepository::new(policy_db),
            AuditService::new(AuditLogRepository::new(audit_db)),
        )
    }

    #[tokio::test]
    async fn test_move_first_section_up_fails() {
        let first = sample_section("s1", 0);
        let second = sample_section("s2", 1);

        let policy_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![first.clone()]])
                .append_query_results([vec![first, second]])
                .into_connection(),
        );

        let service = create_test_service(policy_db);
        let staff = create_staff();

        let result = service.move_section(&staff, "s1", MoveDirection::Up).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_move_last_section_down_fails() {
        let first = sample_section("s1", 0);
        let second = sample_section("s2", 1);

        let policy_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![second.clone()]])
                .append_query_results([vec![first, second]])
                .into_connection(),
        );

        let service = create_test_service(policy_db);
        let staff = create_staff();

        let result = service.move_section(&staff, "s2", MoveDirection::Down).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_renumbers_following_sections() {
        use lingkod_db::entities::audit_log;
        use sea_orm::MockExecResult;

        let second = sample_section("s2", 1);
        let third = sample_section("s3", 2);
        let fourth = sample_section("s4", 3);

        let mut third_after = third.clone();
        third_after.display_order = 1;
        let mut fourth_after = fourth.clone();
        fourth_after.display_order = 2;

        let policy_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![second.clone()]])
                .append_query_results([vec![third, fourth]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([vec![third_after]])
                .append_query_results([vec![fourth_after]])
                .into_connection(),
        );
        let audit_entry = audit_log::Model {
            id: "log1".to_string(),
            actor_id: Some("staff1".to_string()),
            actor_name: "Reyes, Jun".to_string(),
            action: "policy.delete".to_string(),
            details: None,
            created_at: Utc::now().into(),
        };
        let audit_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![audit_entry]])
                .into_connection(),
        );

        let service = PolicyService::new(
            PolicySectionRepository::new(policy_db),
            AuditService::new(AuditLogRepository::new(audit_db)),
        );
        let staff = create_staff();

        // Each follower is decremented by its own UPDATE; deleting a middle
        // section must not trip the unique (document, display_order) index.
        service.delete(&staff, "s2").await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_section() {
        let policy_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<policy_section::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(policy_db);
        let staff = create_staff();

        let result = service
            .update(
                &staff,
                "missing",
                PolicySectionInput {
                    title: "Title".to_string(),
                    body: "Body".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let policy_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(policy_db);
        let staff = create_staff();

        let result = service
            .create(
                &staff,
                PolicyDocument::TermsOfService,
                PolicySectionInput {
                    title: String::new(),
                    body: "Body".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
