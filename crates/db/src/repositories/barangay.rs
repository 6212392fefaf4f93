//! Barangay repository.

use std::sync::Arc;

use crate::entities::{Barangay, barangay};
use lingkod_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
    sea_query::{Expr, Func},
};

/// Barangay repository for database operations.
#[derive(Clone)]
pub struct BarangayRepository {
    db: Arc<DatabaseConnection>,
}

impl BarangayRepository {
    /// Create a new barangay repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a barangay by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<barangay::Model>> {
        Barangay::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a barangay by name (case-insensitive).
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<barangay::Model>> {
        Barangay::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(barangay::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all barangays, alphabetical.
    pub async fn list(&self) -> AppResult<Vec<barangay::Model>> {
        Barangay::find()
            .order_by_asc(barangay::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new barangay.
    pub async fn create(&self, model: barangay::ActiveModel) -> AppResult<barangay::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a barangay.
    pub async fn update(&self, model: barangay::ActiveModel) -> AppResult<barangay::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a barangay.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let barangay = self.find_by_id(id).await?;
        if let Some(b) = barangay {
            b.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
