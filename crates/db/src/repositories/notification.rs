//! Notification repository.

use std::sync::Arc;

use crate::entities::{
    Notification, NotificationRecipient, notification, notification_recipient,
};
use lingkod_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a notification.
    pub async fn create(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a recipient row.
    pub async fn add_recipient(
        &self,
        model: notification_recipient::ActiveModel,
    ) -> AppResult<notification_recipient::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a recipient row by ID.
    pub async fn find_recipient_by_id(
        &self,
        id: &str,
    ) -> AppResult<Option<notification_recipient::Model>> {
        NotificationRecipient::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List recipient rows for a user (paginated, newest first).
    pub async fn list_for_recipient(
        &self,
        recipient_id: &str,
        limit: u64,
        offset: u64,
        unread_only: bool,
    ) -> AppResult<Vec<notification_recipient::Model>> {
        let mut query = NotificationRecipient::find()
            .filter(notification_recipient::Column::RecipientId.eq(recipient_id))
            .order_by_desc(notification_recipient::Column::Id);

        if unread_only {
            query = query.filter(notification_recipient::Column::IsRead.eq(false));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a recipient row.
    pub async fn update_recipient(
        &self,
        model: notification_recipient::ActiveModel,
    ) -> AppResult<notification_recipient::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark all notifications as read for a recipient.
    pub async fn mark_all_as_read(&self, recipient_id: &str) -> AppResult<u64> {
        let result = NotificationRecipient::update_many()
            .filter(notification_recipient::Column::RecipientId.eq(recipient_id))
            .filter(notification_recipient::Column::IsRead.eq(false))
            .col_expr(notification_recipient::Column::IsRead, true.into())
            .col_expr(
                notification_recipient::Column::ReadAt,
                Expr::value(chrono::Utc::now()),
            )
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Count unread notifications for a recipient.
    pub async fn count_unread(&self, recipient_id: &str) -> AppResult<u64> {
        NotificationRecipient::find()
            .filter(notification_recipient::Column::RecipientId.eq(recipient_id))
            .filter(notification_recipient::Column::IsRead.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List notifications sent by a user (paginated, newest first).
    pub async fn list_sent(
        &self,
        sender_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::SenderId.eq(sender_id))
            .order_by_desc(notification::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List recipient rows of a notification.
    pub async fn list_recipients(
        &self,
        notification_id: &str,
    ) -> AppResult<Vec<notification_recipient::Model>> {
        NotificationRecipient::find()
            .filter(notification_recipient::Column::NotificationId.eq(notification_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
