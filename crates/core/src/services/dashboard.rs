//! Dashboard aggregation service.

use lingkod_common::{AppError, AppResult};
use lingkod_db::{
    entities::{audit_log, report::ReportStatus, user},
    repositories::{AuditLogRepository, BarangayRepository, ReportFilter, ReportRepository, UserRepository},
};
use serde::Serialize;

/// Submission count for one barangay.
#[derive(Debug, Serialize)]
pub struct BarangaySubmissions {
    pub barangay_id: String,
    pub barangay_name: String,
    pub count: u64,
}

/// Aggregates for the staff dashboard.
#[derive(Debug, Serialize)]
pub struct StaffDashboard {
    pub pending_reports: u64,
    pub approved_reports: u64,
    pub rejected_reports: u64,
    pub pending_users: u64,
    pub submissions_by_barangay: Vec<BarangaySubmissions>,
    pub recent_activity: Vec<audit_log::Model>,
}

/// Aggregates for a secretary's dashboard, scoped to their barangay.
#[derive(Debug, Serialize)]
pub struct SecretaryDashboard {
    pub pending_reports: u64,
    pub approved_reports: u64,
    pub rejected_reports: u64,
}

/// Dashboard service for business logic.
#[derive(Clone)]
pub struct DashboardService {
    report_repo: ReportRepository,
    user_repo: UserRepository,
    barangay_repo: BarangayRepository,
    audit_repo: AuditLogRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        user_repo: UserRepository,
        barangay_repo: BarangayRepository,
        audit_repo: AuditLogRepository,
    ) -> Self {
        Self {
            report_repo,
            user_repo,
            barangay_repo,
            audit_repo,
        }
    }

    /// Build the staff dashboard for a reporting year.
    pub async fn staff_dashboard(&self, year: i32) -> AppResult<StaffDashboard> {
        let pending_reports = self.report_repo.count_by_status(ReportStatus::Pending).await?;
        let approved_reports = self
            .report_repo
            .count_by_status(ReportStatus::Approved)
            .await?;
        let rejected_reports = self
            .report_repo
            .count_by_status(ReportStatus::Rejected)
            .await?;
        let pending_users = self.user_repo.count_pending().await?;

        let mut submissions_by_barangay = Vec::new();
        for barangay in self.barangay_repo.list().await? {
            let count = self.report_repo.count_for_barangay(&barangay.id, year).await?;
            submissions_by_barangay.push(BarangaySubmissions {
                barangay_id: barangay.id,
                barangay_name: barangay.name,
                count,
            });
        }

        let recent_activity = self.audit_repo.list_recent(10).await?;

        Ok(StaffDashboard {
            pending_reports,
            approved_reports,
            rejected_reports,
            pending_users,
            submissions_by_barangay,
            recent_activity,
        })
    }

    /// Build a secretary's dashboard scoped to their own barangay.
    pub async fn secretary_dashboard(&self, caller: &user::Model) -> AppResult<SecretaryDashboard> {
        let barangay_id = caller.barangay_id.clone().ok_or_else(|| {
            AppError::BadRequest("Your account has no assigned barangay".to_string())
        })?;

        let count_for = |status: ReportStatus| ReportFilter {
            barangay_id: Some(barangay_id.clone()),
            status: Some(status),
            ..Default::default()
        };

        Ok(SecretaryDashboard {
            pending_reports: self.report_repo.count(&count_for(ReportStatus::Pending)).await?,
            approved_reports: self
                .report_repo
                .count(&count_for(ReportStatus::Approved))
                .await?,
            rejected_reports: self
                .report_repo
                .count(&count_for(ReportStatus::Rejected))
                .await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingkod_db::entities::user::{ActiveStatus, CreationStatus, UserRole};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_service() -> DashboardService {
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        DashboardService::new(
            ReportRepository::new(empty()),
            UserRepository::new(empty()),
            BarangayRepository::new(empty()),
            AuditLogRepository::new(empty()),
        )
    }

    #[tokio::test]
    async fn test_secretary_dashboard_requires_barangay() {
        let service = create_test_service();

        let caller = user::Model {
            id: "sec1".to_string(),
            email: "sec@example.com".to_string(),
            email_lower: "sec@example.com".to_string(),
            password_hash: "hash".to_string(),
            token: None,
            role: UserRole::BarangaySecretary,
            first_name: "Ana".to_string(),
            last_name: "Santos".to_string(),
            middle_name: None,
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            contact_number: None,
            barangay_id: None,
            valid_id_type_id: None,
            id_front_url: None,
            id_back_url: None,
            creation_status: CreationStatus::Approved,
            reject_reason: None,
            active_status: Some(ActiveStatus::Active),
            created_at: chrono::Utc::now().into(),
            updated_at: None,
        };

        let result = service.secretary_dashboard(&caller).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
