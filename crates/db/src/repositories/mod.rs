//! Database repositories.

mod audit_log;
mod barangay;
mod notification;
mod policy_section;
mod report;
mod report_comment;
mod report_type;
mod user;
mod valid_id_type;
mod verification_flow;

pub use audit_log::AuditLogRepository;
pub use barangay::BarangayRepository;
pub use notification::NotificationRepository;
pub use policy_section::PolicySectionRepository;
pub use report::{ReportFilter, ReportRepository};
pub use report_comment::ReportCommentRepository;
pub use report_type::ReportTypeRepository;
pub use user::{UserFilter, UserRepository};
pub use valid_id_type::ValidIdTypeRepository;
pub use verification_flow::VerificationFlowRepository;
