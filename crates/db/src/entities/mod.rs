//! Database entities.

pub mod audit_log;
pub mod barangay;
pub mod notification;
pub mod notification_recipient;
pub mod policy_section;
pub mod report;
pub mod report_attachment;
pub mod report_comment;
pub mod report_type;
pub mod user;
pub mod valid_id_type;
pub mod verification_flow;

pub use audit_log::Entity as AuditLog;
pub use barangay::Entity as Barangay;
pub use notification::Entity as Notification;
pub use notification_recipient::Entity as NotificationRecipient;
pub use policy_section::Entity as PolicySection;
pub use report::Entity as Report;
pub use report_attachment::Entity as ReportAttachment;
pub use report_comment::Entity as ReportComment;
pub use report_type::Entity as ReportType;
pub use user::Entity as User;
pub use valid_id_type::Entity as ValidIdType;
pub use verification_flow::Entity as VerificationFlow;
