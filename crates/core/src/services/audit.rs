//! Audit log service.

use chrono::{DateTime, FixedOffset, Utc};
use lingkod_common::{AppResult, IdGenerator};
use lingkod_db::{
    entities::{audit_log, user},
    repositories::AuditLogRepository,
};
use sea_orm::Set;

/// Audit log service for business logic.
#[derive(Clone)]
pub struct AuditService {
    repo: AuditLogRepository,
    id_gen: IdGenerator,
}

impl AuditService {
    /// Create a new audit log service.
    #[must_use]
    pub fn new(repo: AuditLogRepository) -> Self {
        Self {
            repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append an entry for an action performed by a user.
    pub async fn record(
        &self,
        actor: &user::Model,
        action: &str,
        details: Option<String>,
    ) -> AppResult<audit_log::Model> {
        self.append(Some(actor.id.clone()), actor.display_name(), action, details)
            .await
    }

    async fn append(
        &self,
        actor_id: Option<String>,
        actor_name: String,
        action: &str,
        details: Option<String>,
    ) -> AppResult<audit_log::Model> {
        let model = audit_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            actor_id: Set(actor_id),
            actor_name: Set(actor_name),
            action: Set(action.to_string()),
            details: Set(details),
            created_at: Set(Utc::now().into()),
        };
        self.repo.create(model).await
    }

    /// List entries in a date range, newest first, with the total count.
    pub async fn list(
        &self,
        from: Option<DateTime<FixedOffset>>,
        to: Option<DateTime<FixedOffset>>,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<audit_log::Model>, u64)> {
        let entries = self.repo.list(from, to, limit, offset).await?;
        let total = self.repo.count(from, to).await?;
        Ok((entries, total))
    }

    /// List the most recent entries.
    pub async fn list_recent(&self, limit: u64) -> AppResult<Vec<audit_log::Model>> {
        self.repo.list_recent(limit).await
    }

    /// Delete all entries inside an inclusive date range.
    ///
    /// The purge itself is recorded as a new entry attributed to the actor.
    pub async fn delete_range(
        &self,
        actor: &user::Model,
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
    ) -> AppResult<u64> {
        let removed = self.repo.delete_range(from, to).await?;

        tracing::info!(removed, actor_id = %actor.id, "Audit log entries purged");

        self.record(
            actor,
            "logs.purge",
            Some(format!(
                "Deleted {removed} entries between {from} and {to}"
            )),
        )
        .await?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingkod_db::entities::user::{ActiveStatus, CreationStatus, UserRole};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user() -> user::Model {
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

    fn sample_entry(id: &str, action: &str) -> audit_log::Model {
        audit_log::Model {
            id: id.to_string(),
            actor_id: Some("staff1".to_string()),
            actor_name: "Reyes, Jun".to_string(),
            action: action.to_string(),
            details: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_record_inserts_entry() {
        let entry = sample_entry("log1", "report.approve");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry]])
                .into_connection(),
        );

        let service = AuditService::new(AuditLogRepository::new(db));
        let actor = create_test_user();

        let result = service.record(&actor, "report.approve", None).await.unwrap();
        assert_eq!(result.action, "report.approve");
        assert_eq!(result.actor_name, "Reyes, Jun");
    }

    #[tokio::test]
    async fn test_delete_range_records_purge() {
        let purge_entry = sample_entry("log2", "logs.purge");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 7,
                }])
                .append_query_results([[purge_entry]])
                .into_connection(),
        );

        let service = AuditService::new(AuditLogRepository::new(db));
        let actor = create_test_user();

        let from = Utc::now().fixed_offset() - chrono::Duration::days(30);
        let to = Utc::now().fixed_offset();
        let removed = service.delete_range(&actor, from, to).await.unwrap();
        assert_eq!(removed, 7);
    }
}
