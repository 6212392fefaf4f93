//! Business logic services.

pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod email;
pub mod lookup;
pub mod notification;
pub mod policy;
pub mod report;
pub mod user;

pub use audit::AuditService;
pub use auth::{AuthService, SigninOutcome, SignupInput, validate_password};
pub use dashboard::{BarangaySubmissions, DashboardService, SecretaryDashboard, StaffDashboard};
pub use email::EmailService;
pub use lookup::{BarangayInput, LookupService, ReportTypeInput, ValidIdTypeInput};
pub use notification::{
    NotificationService, NotificationView, SendNotificationInput, SentNotificationView,
};
pub use policy::{MoveDirection, PolicyService, PolicySectionInput};
pub use report::{
    ALLOWED_ATTACHMENT_TYPES, AttachmentUpload, CreateReportInput, MAX_ATTACHMENT_SIZE,
    ReportDetail, ReportService, UpdateReportInput,
};
pub use user::{ChangePasswordInput, UpdateProfileInput, UserService};
