//! Valid ID type repository.

use std::sync::Arc;

use crate::entities::{ValidIdType, valid_id_type};
use lingkod_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
    sea_query::{Expr, Func},
};

/// Valid ID type repository for database operations.
#[derive(Clone)]
pub struct ValidIdTypeRepository {
    db: Arc<DatabaseConnection>,
}

impl ValidIdTypeRepository {
    /// Create a new valid ID type repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a valid ID type by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<valid_id_type::Model>> {
        ValidIdType::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a valid ID type by name (case-insensitive).
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<valid_id_type::Model>> {
        ValidIdType::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(valid_id_type::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all valid ID types, alphabetical.
    pub async fn list(&self) -> AppResult<Vec<valid_id_type::Model>> {
        ValidIdType::find()
            .order_by_asc(valid_id_type::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new valid ID type.
    pub async fn create(
        &self,
        model: valid_id_type::ActiveModel,
    ) -> AppResult<valid_id_type::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a valid ID type.
    pub async fn update(
        &self,
        model: valid_id_type::ActiveModel,
    ) -> AppResult<valid_id_type::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a valid ID type.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id_type = self.find_by_id(id).await?;
        if let Some(t) = id_type {
            t.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
