//! User repository.

use std::sync::Arc;

use crate::entities::{
    User,
    user::{self, ActiveStatus, CreationStatus, UserRole},
};
use lingkod_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

/// Filters for user listings.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Free-text search over name and email.
    pub search: Option<String>,
    /// Restrict to a role.
    pub role: Option<UserRole>,
    /// Restrict to a creation status.
    pub creation_status: Option<CreationStatus>,
    /// Restrict to an active status.
    pub active_status: Option<ActiveStatus>,
    /// Restrict to a barangay.
    pub barangay_id: Option<String>,
}

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find users by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        User::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::EmailLower.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a user.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let user = self.find_by_id(id).await?;
        if let Some(u) = user {
            u.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    fn filtered(filter: &UserFilter) -> Select<User> {
        let mut query = User::find();

        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role));
        }
        if let Some(status) = filter.creation_status {
            query = query.filter(user::Column::CreationStatus.eq(status));
        }
        if let Some(status) = filter.active_status {
            query = query.filter(user::Column::ActiveStatus.eq(status));
        }
        if let Some(ref barangay_id) = filter.barangay_id {
            query = query.filter(user::Column::BarangayId.eq(barangay_id.clone()));
        }
        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(user::Column::EmailLower.like(pattern.clone()))
                    .add(user::Column::FirstName.like(pattern.clone()))
                    .add(user::Column::LastName.like(pattern)),
            );
        }

        query
    }

    /// List users matching the filter (paginated, newest first).
    pub async fn list(
        &self,
        filter: &UserFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        Self::filtered(filter)
            .order_by_desc(user::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users matching the filter.
    pub async fn count(&self, filter: &UserFilter) -> AppResult<u64> {
        Self::filtered(filter)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count accounts awaiting approval.
    pub async fn count_pending(&self) -> AppResult<u64> {
        User::find()
            .filter(user::Column::CreationStatus.eq(CreationStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active approved secretaries (for notification recipient pickers).
    pub async fn list_active_secretaries(&self) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::Role.eq(UserRole::BarangaySecretary))
            .filter(user::Column::CreationStatus.eq(CreationStatus::Approved))
            .filter(user::Column::ActiveStatus.eq(ActiveStatus::Active))
            .order_by_asc(user::Column::LastName)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether any user is assigned to the given barangay.
    pub async fn any_in_barangay(&self, barangay_id: &str) -> AppResult<bool> {
        let count = User::find()
            .filter(user::Column::BarangayId.eq(barangay_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }
}
