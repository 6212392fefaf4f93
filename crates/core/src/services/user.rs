//! User management service.
//!
//! Staff-side account administration (approval workflow, activation,
//! deletion) plus self-service profile updates.

use chrono::Utc;
use lingkod_common::{AppError, AppResult};
use lingkod_db::{
    entities::{
        notification::NotificationType,
        user::{self, ActiveStatus, CreationStatus, UserRole},
    },
    repositories::{UserFilter, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::audit::AuditService;
use crate::services::auth::{hash_password, validate_password, verify_password};
use crate::services::notification::NotificationService;

/// Input for updating one's own profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 128))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub last_name: Option<String>,

    #[validate(length(max = 128))]
    pub middle_name: Option<String>,

    #[validate(length(max = 32))]
    pub contact_number: Option<String>,
}

/// Input for changing one's own password.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

/// User management service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    notifications: NotificationService,
    audit: AuditService,
}

impl UserService {
    /// Create a new user management service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        notifications: NotificationService,
        audit: AuditService,
    ) -> Self {
        Self {
            user_repo,
            notifications,
            audit,
        }
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List users with filters, returning the page and the total count.
    pub async fn list(
        &self,
        filter: UserFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<user::Model>, u64)> {
        let users = self.user_repo.list(&filter, limit, offset).await?;
        let total = self.user_repo.count(&filter).await?;
        Ok((users, total))
    }

    /// List accounts awaiting approval.
    pub async fn list_pending(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<user::Model>, u64)> {
        let filter = UserFilter {
            creation_status: Some(CreationStatus::Pending),
            ..Default::default()
        };
        self.list(filter, limit, offset).await
    }

    /// Approve a pending signup. The account becomes active and can sign in.
    pub async fn approve(&self, staff: &user::Model, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if user.creation_status != CreationStatus::Pending {
            return Err(AppError::BadRequest(
                "Only pending accounts can be approved".to_string(),
            ));
        }

        let name = user.display_name();
        let mut active: user::ActiveModel = user.into();
        active.creation_status = Set(CreationStatus::Approved);
        active.active_status = Set(Some(ActiveStatus::Active));
        active.reject_reason = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));
        let user = self.user_repo.update(active).await?;

        self.audit
            .record(staff, "user.approve", Some(format!("Approved account of {name}")))
            .await?;

        tracing::info!(user_id = %user.id, staff_id = %staff.id, "Account approved");

        Ok(user)
    }

    /// Reject a pending signup with a reason.
    pub async fn reject(
        &self,
        staff: &user::Model,
        user_id: &str,
        reason: &str,
    ) -> AppResult<user::Model> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "A rejection reason is required".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;

        if user.creation_status != CreationStatus::Pending {
            return Err(AppError::BadRequest(
                "Only pending accounts can be rejected".to_string(),
            ));
        }

        let name = user.display_name();
        let mut active: user::ActiveModel = user.into();
        active.creation_status = Set(CreationStatus::Rejected);
        active.reject_reason = Set(Some(reason.to_string()));
        active.active_status = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));
        let user = self.user_repo.update(active).await?;

        self.audit
            .record(
                staff,
                "user.reject",
                Some(format!("Rejected account of {name}: {reason}")),
            )
            .await?;

        Ok(user)
    }

    /// Reactivate a deactivated account.
    pub async fn activate(&self, staff: &user::Model, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if user.creation_status != CreationStatus::Approved {
            return Err(AppError::BadRequest(
                "Only approved accounts can be activated".to_string(),
            ));
        }

        let name = user.display_name();
        let mut active: user::ActiveModel = user.into();
        active.active_status = Set(Some(ActiveStatus::Active));
        active.updated_at = Set(Some(Utc::now().into()));
        let user = self.user_repo.update(active).await?;

        self.audit
            .record(staff, "user.activate", Some(format!("Activated account of {name}")))
            .await?;

        Ok(user)
    }

    /// Deactivate an account, killing its session.
    pub async fn deactivate(&self, staff: &user::Model, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if user.creation_status != CreationStatus::Approved {
            return Err(AppError::BadRequest(
                "Only approved accounts can be deactivated".to_string(),
            ));
        }

        if user.id == staff.id {
            return Err(AppError::BadRequest(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let name = user.display_name();
        let mut active: user::ActiveModel = user.into();
        active.active_status = Set(Some(ActiveStatus::Deactivated));
        // Clearing the token signs the user out everywhere.
        active.token = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));
        let user = self.user_repo.update(active).await?;

        self.audit
            .record(
                staff,
                "user.deactivate",
                Some(format!("Deactivated account of {name}")),
            )
            .await?;

        Ok(user)
    }

    /// Delete an account permanently.
    pub async fn delete(&self, staff: &user::Model, user_id: &str) -> AppResult<()> {
        if user_id == staff.id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        let name = user.display_name();

        self.user_repo.delete(user_id).await?;

        self.audit
            .record(staff, "user.delete", Some(format!("Deleted account of {name}")))
            .await?;

        tracing::info!(user_id = %user_id, staff_id = %staff.id, "Account deleted");

        Ok(())
    }

    /// Update the caller's own profile.
    pub async fn update_profile(
        &self,
        user: user::Model,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let mut active: user::ActiveModel = user.into();

        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(middle_name) = input.middle_name {
            active.middle_name = Set(Some(middle_name));
        }
        if let Some(contact_number) = input.contact_number {
            active.contact_number = Set(Some(contact_number));
        }

        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Change the caller's password after checking the current one.
    pub async fn change_password(
        &self,
        user: user::Model,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        if !verify_password(&input.current_password, &user.password_hash)? {
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        validate_password(&input.new_password)?;

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(hash_password(&input.new_password)?);
        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await?;

        Ok(())
    }

    /// Notify all staff that a new signup awaits review.
    pub async fn notify_staff_of_signup(&self, new_user: &user::Model) -> AppResult<()> {
        let filter = UserFilter {
            role: Some(UserRole::MlgooStaff),
            creation_status: Some(CreationStatus::Approved),
            active_status: Some(ActiveStatus::Active),
            ..Default::default()
        };
        let staff = self.user_repo.list(&filter, 100, 0).await?;

        for member in staff {
            self.notifications
                .notify_user(
                    &member.id,
                    "New account awaiting approval",
                    &format!("{} registered and is awaiting review.", new_user.display_name()),
                    NotificationType::System,
                )
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingkod_db::repositories::{AuditLogRepository, NotificationRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, status: CreationStatus) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            email_lower: format!("{id}@example.com"),
            password_hash: "hash".to_string(),
            token: Some("tok".to_string()),
            role: UserRole::BarangaySecretary,
            first_name: "Ana".to_string(),
            last_name: "Santos".to_string(),
            middle_name: None,
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            contact_number: None,
            barangay_id: Some("brgy1".to_string()),
            valid_id_type_id: None,
            id_front_url: None,
            id_back_url: None,
            creation_status: status,
            reject_reason: None,
            active_status: match status {
                CreationStatus::Approved => Some(ActiveStatus::Active),
                _ => None,
            },
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_staff() -> user::Model {
        let mut staff = create_test_user("staff1", CreationStatus::Approved);
        staff.role = UserRole::MlgooStaff;
        staff.barangay_id = None;
        staff
    }

    fn create_test_service(user_db: Arc<sea_orm::DatabaseConnection>) -> UserService {
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        UserService::new(
            UserRepository::new(user_db),
            NotificationService::new(
                NotificationRepository::new(empty()),
                UserRepository::new(empty()),
            ),
            AuditService::new(AuditLogRepository::new(empty())),
        )
    }

    #[tokio::test]
    async fn test_approve_requires_pending() {
        let user = create_test_user("user1", CreationStatus::Approved);
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = create_test_service(user_db);
        let staff = create_staff();

        let result = service.approve(&staff, "user1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db);
        let staff = create_staff();

        let result = service.reject(&staff, "user1", "   ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_reject_requires_pending() {
        let user = create_test_user("user1", CreationStatus::Rejected);
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = create_test_service(user_db);
        let staff = create_staff();

        let result = service.reject(&staff, "user1", "Incomplete ID images").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_deactivate_self_forbidden() {
        let staff = create_staff();
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[staff.clone()]])
                .into_connection(),
        );

        let service = create_test_service(user_db);

        let result = service.deactivate(&staff, "staff1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_self_forbidden() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db);
        let staff = create_staff();

        let result = service.delete(&staff, "staff1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_activate_pending_account_rejected() {
        let user = create_test_user("user1", CreationStatus::Pending);
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = create_test_service(user_db);
        let staff = create_staff();

        let result = service.activate(&staff, "user1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let mut user = create_test_user("user1", CreationStatus::Approved);
        user.password_hash = crate::services::auth::hash_password("Secret123").unwrap();

        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(user_db);

        let result = service
            .change_password(
                user,
                ChangePasswordInput {
                    current_password: "Wrong1234".to_string(),
                    new_password: "NewSecret1".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_change_password_weak_new_password() {
        let mut user = create_test_user("user1", CreationStatus::Approved);
        user.password_hash = crate::services::auth::hash_password("Secret123").unwrap();

        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(user_db);

        let result = service
            .change_password(
                user,
                ChangePasswordInput {
                    current_password: "Secret123".to_string(),
                    new_password: "weak".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
