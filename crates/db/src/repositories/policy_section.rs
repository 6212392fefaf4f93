//! Policy section repository.

use std::sync::Arc;

use crate::entities::{
    PolicySection,
    policy_section::{self, PolicyDocument},
};
use lingkod_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// Policy section repository for database operations.
#[derive(Clone)]
pub struct PolicySectionRepository {
    db: Arc<DatabaseConnection>,
}

impl PolicySectionRepository {
    /// Create a new policy section repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a section by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<policy_section::Model>> {
        PolicySection::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List sections of a document in display order.
    pub async fn list_for_document(
        &self,
        document: PolicyDocument,
    ) -> AppResult<Vec<policy_section::Model>> {
        PolicySection::find()
            .filter(policy_section::Column::Document.eq(document))
            .order_by_asc(policy_section::Column::DisplayOrder)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of sections in a document.
    pub async fn count_for_document(&self, document: PolicyDocument) -> AppResult<u64> {
        PolicySection::find()
            .filter(policy_section::Column::Document.eq(document))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new section.
    pub async fn create(
        &self,
        model: policy_section::ActiveModel,
    ) -> AppResult<policy_section::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a section.
    pub async fn update(
        &self,
        model: policy_section::ActiveModel,
    ) -> AppResult<policy_section::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Swap the display orders of two sections of the same document.
    ///
    /// Runs in a transaction; a temporary order value sidesteps the unique
    /// (document, display_order) index while the two rows trade places.
    pub async fn swap_orders(
        &self,
        a: &policy_section::Model,
        b: &policy_section::Model,
    ) -> AppResult<()> {
        let (a_order, b_order) = (a.display_order, b.display_order);
        let now = chrono::Utc::now();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut first: policy_section::ActiveModel = a.clone().into();
        first.display_order = Set(-1);
        first
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut second: policy_section::ActiveModel = b.clone().into();
        second.display_order = Set(a_order);
        second.updated_at = Set(Some(now.into()));
        second
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut first: policy_section::ActiveModel = a.clone().into();
        first.display_order = Set(b_order);
        first.updated_at = Set(Some(now.into()));
        first
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a section and close the order gap it leaves behind.
    pub async fn delete_and_renumber(&self, section: &policy_section::Model) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let followers = PolicySection::find()
            .filter(policy_section::Column::Document.eq(section.document))
            .filter(policy_section::Column::DisplayOrder.gt(section.display_order))
            .order_by_asc(policy_section::Column::DisplayOrder)
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        PolicySection::delete_by_id(&section.id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Shift followers down one at a time in ascending order: each
        // decrement lands in the slot freed just before it, so the unique
        // (document, display_order) index is never violated mid-update.
        for follower in followers {
            let order = follower.display_order;
            let mut active: policy_section::ActiveModel = follower.into();
            active.display_order = Set(order - 1);
            active
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
