//! Notification service.
//!
//! Staff compose a notification once; the service fans it out as one
//! recipient row per secretary, each with its own read flag.

use chrono::Utc;
use lingkod_common::{AppError, AppResult, IdGenerator};
use lingkod_db::{
    entities::{
        notification::{self, NotificationPriority, NotificationType},
        notification_recipient,
        user::{self, ActiveStatus, CreationStatus, UserRole},
    },
    repositories::{NotificationRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Unread notifications expose only this many characters of the message.
const PREVIEW_LENGTH: usize = 80;

/// Input for composing a notification.
#[derive(Debug, Deserialize, Validate)]
pub struct SendNotificationInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 4096))]
    pub message: String,

    pub notification_type: NotificationType,

    #[serde(default)]
    pub priority: NotificationPriority,

    /// Recipient user IDs; empty means broadcast to all active secretaries.
    #[serde(default)]
    pub recipient_ids: Vec<String>,
}

/// A recipient's view of a notification.
///
/// Unread rows carry a truncated preview instead of the full message. This
/// is a UX gate, not a security boundary: the full content unlocks when the
/// row is marked read.
#[derive(Debug, Serialize)]
pub struct NotificationView {
    pub id: String,
    pub notification_id: String,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub is_read: bool,
    pub read_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

/// Read statistics for a sent notification.
#[derive(Debug, Serialize)]
pub struct SentNotificationView {
    #[serde(flatten)]
    pub notification: notification::Model,
    pub recipient_count: u64,
    pub read_count: u64,
}

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new(notification_repo: NotificationRepository, user_repo: UserRepository) -> Self {
        Self {
            notification_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Compose a notification and fan it out to the selected recipients.
    ///
    /// An empty recipient list broadcasts to every active secretary.
    pub async fn send(
        &self,
        sender: &user::Model,
        input: SendNotificationInput,
    ) -> AppResult<notification::Model> {
        input.validate()?;

        let recipients = if input.recipient_ids.is_empty() {
            self.user_repo.list_active_secretaries().await?
        } else {
            let found = self.user_repo.find_by_ids(&input.recipient_ids).await?;
            if found.len() != input.recipient_ids.len() {
                return Err(AppError::BadRequest(
                    "One or more recipients do not exist".to_string(),
                ));
            }
            // Same audience as the broadcast path: only active approved
            // secretaries receive notifications.
            if found.iter().any(|u| {
                u.role != UserRole::BarangaySecretary
                    || u.creation_status != CreationStatus::Approved
                    || u.active_status != Some(ActiveStatus::Active)
            }) {
                return Err(AppError::BadRequest(
                    "Recipients must be active secretary accounts".to_string(),
                ));
            }
            found
        };

        if recipients.is_empty() {
            return Err(AppError::BadRequest(
                "Notification has no recipients".to_string(),
            ));
        }

        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            sender_id: Set(Some(sender.id.clone())),
            title: Set(input.title),
            message: Set(input.message),
            notification_type: Set(input.notification_type),
            priority: Set(input.priority),
            created_at: Set(Utc::now().into()),
        };
        let created = self.notification_repo.create(model).await?;

        for recipient in &recipients {
            let row = notification_recipient::ActiveModel {
                id: Set(self.id_gen.generate()),
                notification_id: Set(created.id.clone()),
                recipient_id: Set(recipient.id.clone()),
                is_read: Set(false),
                read_at: Set(None),
            };
            self.notification_repo.add_recipient(row).await?;
        }

        tracing::info!(
            notification_id = %created.id,
            sender_id = %sender.id,
            recipients = recipients.len(),
            "Notification sent"
        );

        Ok(created)
    }

    /// Send a system-generated notification to a single user.
    pub async fn notify_user(
        &self,
        recipient_id: &str,
        title: &str,
        message: &str,
        notification_type: NotificationType,
    ) -> AppResult<()> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            sender_id: Set(None),
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            notification_type: Set(notification_type),
            priority: Set(NotificationPriority::Normal),
            created_at: Set(Utc::now().into()),
        };
        let created = self.notification_repo.create(model).await?;

        let row = notification_recipient::ActiveModel {
            id: Set(self.id_gen.generate()),
            notification_id: Set(created.id.clone()),
            recipient_id: Set(recipient_id.to_string()),
            is_read: Set(false),
            read_at: Set(None),
        };
        self.notification_repo.add_recipient(row).await?;

        Ok(())
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
        unread_only: bool,
    ) -> AppResult<Vec<NotificationView>> {
        let rows = self
            .notification_repo
            .list_for_recipient(user_id, limit, offset, unread_only)
            .await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(notification) = self
                .notification_repo
                .find_by_id(&row.notification_id)
                .await?
            else {
                continue;
            };
            views.push(build_view(&row, notification));
        }

        Ok(views)
    }

    /// Count a user's unread notifications.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }

    /// Mark one notification as read and return the unlocked view.
    pub async fn mark_as_read(
        &self,
        user_id: &str,
        recipient_row_id: &str,
    ) -> AppResult<NotificationView> {
        let row = self
            .notification_repo
            .find_recipient_by_id(recipient_row_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if row.recipient_id != user_id {
            return Err(AppError::Forbidden(
                "This notification belongs to another user".to_string(),
            ));
        }

        let row = if row.is_read {
            row
        } else {
            let mut active: notification_recipient::ActiveModel = row.into();
            active.is_read = Set(true);
            active.read_at = Set(Some(Utc::now().into()));
            self.notification_repo.update_recipient(active).await?
        };

        let notification = self
            .notification_repo
            .find_by_id(&row.notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        Ok(build_view(&row, notification))
    }

    /// Mark all of a user's notifications as read.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// List notifications sent by a staff member, with read statistics.
    pub async fn list_sent(
        &self,
        sender_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<SentNotificationView>> {
        let sent = self
            .notification_repo
            .list_sent(sender_id, limit, offset)
            .await?;

        let mut views = Vec::with_capacity(sent.len());
        for notification in sent {
            let recipients = self
                .notification_repo
                .list_recipients(&notification.id)
                .await?;
            let read_count = recipients.iter().filter(|r| r.is_read).count() as u64;
            views.push(SentNotificationView {
                notification,
                recipient_count: recipients.len() as u64,
                read_count,
            });
        }

        Ok(views)
    }
}

fn build_view(
    row: &notification_recipient::Model,
    notification: notification::Model,
) -> NotificationView {
    let message = if row.is_read {
        notification.message
    } else {
        truncate_preview(&notification.message)
    };

    NotificationView {
        id: row.id.clone(),
        notification_id: notification.id,
        title: notification.title,
        message,
        notification_type: notification.notification_type,
        priority: notification.priority,
        is_read: row.is_read,
        read_at: row.read_at,
        created_at: notification.created_at,
    }
}

fn truncate_preview(message: &str) -> String {
    if message.chars().count() <= PREVIEW_LENGTH {
        message.to_string()
    } else {
        let preview: String = message.chars().take(PREVIEW_LENGTH).collect();
        format!("{preview}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn sample_notification(id: &str, message: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            sender_id: Some("staff1".to_string()),
            title: "Deadline reminder".to_string(),
            message: message.to_string(),
            notification_type: NotificationType::Reminder,
            priority: NotificationPriority::High,
            created_at: Utc::now().into(),
        }
    }

    fn sample_row(id: &str, notification_id: &str, is_read: bool) -> notification_recipient::Model {
        notification_recipient::Model {
            id: id.to_string(),
            notification_id: notification_id.to_string(),
            recipient_id: "sec1".to_string(),
            is_read,
            read_at: None,
        }
    }

    fn create_test_service(
        notification_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
    ) -> NotificationService {
        NotificationService::new(
            NotificationRepository::new(notification_db),
            UserRepository::new(user_db),
        )
    }

    #[test]
    fn test_short_message_not_truncated() {
        let view = build_view(
            &sample_row("r1", "n1", false),
            sample_notification("n1", "Submit by Friday"),
        );
        assert_eq!(view.message, "Submit by Friday");
    }

    #[test]
    fn test_unread_long_message_truncated() {
        let long = "x".repeat(200);
        let view = build_view(&sample_row("r1", "n1", false), sample_notification("n1", &long));
        assert!(view.message.chars().count() < 200);
        assert!(view.message.ends_with('…'));
    }

    #[test]
    fn test_read_message_unlocked() {
        let long = "x".repeat(200);
        let view = build_view(&sample_row("r1", "n1", true), sample_notification("n1", &long));
        assert_eq!(view.message, long);
    }

    fn sample_secretary(id: &str) -> user::Model {
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
            barangay_id: Some("brgy1".to_string()),
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

    fn sample_staff(id: &str) -> user::Model {
        let mut user = sample_secretary(id);
        user.role = UserRole::MlgooStaff;
        user.barangay_id = None;
        user
    }

    #[tokio::test]
    async fn test_send_creates_one_recipient_row_per_recipient() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[sample_secretary("sec1"), sample_secretary("sec2")]])
                .into_connection(),
        );
        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[sample_notification("n1", "Submit by Friday")]])
                .append_query_results([[sample_row("r1", "n1", false)]])
                .append_query_results([[sample_row("r2", "n1", false)]])
                .into_connection(),
        );

        let service = create_test_service(Arc::clone(&notification_db), user_db);

        let created = service
            .send(
                &sample_staff("staff1"),
                SendNotificationInput {
                    title: "Deadline reminder".to_string(),
                    message: "Submit by Friday".to_string(),
                    notification_type: NotificationType::Reminder,
                    priority: NotificationPriority::High,
                    recipient_ids: vec!["sec1".to_string(), "sec2".to_string()],
                },
            )
            .await
            .unwrap();
        assert_eq!(created.id, "n1");

        drop(service);
        let Ok(conn) = Arc::try_unwrap(notification_db) else {
            panic!("connection still shared");
        };

        let recipient_inserts: Vec<String> = conn
            .into_transaction_log()
            .iter()
            .map(|t| format!("{t:?}"))
            .filter(|s| s.contains(r#"INSERT INTO \"notification_recipient\""#))
            .collect();
        assert_eq!(recipient_inserts.len(), 2);
        for insert in &recipient_inserts {
            assert!(insert.contains("Bool(Some(false))"), "recipient row must start unread");
        }
    }

    #[tokio::test]
    async fn test_send_rejects_non_secretary_recipient() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[sample_staff("staff2")]])
                .into_connection(),
        );
        let notification_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(notification_db, user_db);

        let result = service
            .send(
                &sample_staff("staff1"),
                SendNotificationInput {
                    title: "Heads up".to_string(),
                    message: "Body".to_string(),
                    notification_type: NotificationType::Info,
                    priority: NotificationPriority::Normal,
                    recipient_ids: vec!["staff2".to_string()],
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_send_rejects_deactivated_recipient() {
        let mut deactivated = sample_secretary("sec1");
        deactivated.active_status = Some(ActiveStatus::Deactivated);

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[deactivated]])
                .into_connection(),
        );
        let notification_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(notification_db, user_db);

        let result = service
            .send(
                &sample_staff("staff1"),
                SendNotificationInput {
                    title: "Heads up".to_string(),
                    message: "Body".to_string(),
                    notification_type: NotificationType::Info,
                    priority: NotificationPriority::Normal,
                    recipient_ids: vec!["sec1".to_string()],
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_send_input_validation() {
        let input = SendNotificationInput {
            title: String::new(),
            message: "Body".to_string(),
            notification_type: NotificationType::Info,
            priority: NotificationPriority::Normal,
            recipient_ids: vec!["sec1".to_string()],
        };
        assert!(input.validate().is_err());
    }

    #[tokio::test]
    async fn test_mark_as_read_wrong_owner() {
        let mut row = sample_row("r1", "n1", false);
        row.recipient_id = "someone_else".to_string();

        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(notification_db, user_db);

        let result = service.mark_as_read("sec1", "r1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_mark_as_read_not_found() {
        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification_recipient::Model>::new()])
                .into_connection(),
        );
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(notification_db, user_db);

        let result = service.mark_as_read("sec1", "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
