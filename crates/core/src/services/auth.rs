//! Authentication service.
//!
//! Covers sign-in/sign-out plus the two email verification flows (signup
//! and password reset). Flow state lives server-side in the
//! `verification_flow` table and advances only through
//! [`crate::flow::transition`].

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, NaiveDate, Utc};
use lingkod_common::{AppError, AppResult, Config, IdGenerator};
use lingkod_db::{
    entities::{
        user::{self, ActiveStatus, CreationStatus, UserRole},
        verification_flow::{self, FlowKind, FlowState},
    },
    repositories::{UserRepository, VerificationFlowRepository},
};
use rand::Rng;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::flow::{FlowEvent, transition};
use crate::services::email::EmailService;

/// Input for completing a signup after email verification.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(email)]
    pub email: String,

    pub password: String,

    /// Requested role; secretaries additionally need a barangay and ID images.
    pub role: UserRole,

    #[validate(length(min = 1, max = 128))]
    pub first_name: String,

    #[validate(length(min = 1, max = 128))]
    pub last_name: String,

    #[validate(length(max = 128))]
    pub middle_name: Option<String>,

    pub date_of_birth: NaiveDate,

    #[validate(length(max = 32))]
    pub contact_number: Option<String>,

    /// Barangay the secretary is assigned to.
    pub barangay_id: Option<String>,

    /// Type of the submitted verification ID.
    pub valid_id_type_id: Option<String>,

    /// URL of the uploaded ID front image.
    pub id_front_url: Option<String>,

    /// URL of the uploaded ID back image.
    pub id_back_url: Option<String>,
}

/// Result of a successful sign-in.
#[derive(Debug)]
pub struct SigninOutcome {
    pub user: user::Model,
    pub token: String,
}

/// Authentication service for business logic.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    flow_repo: VerificationFlowRepository,
    email: EmailService,
    id_gen: IdGenerator,
    otp_ttl_minutes: i64,
    otp_max_attempts: i32,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        flow_repo: VerificationFlowRepository,
        email: EmailService,
        config: &Config,
    ) -> Self {
        Self {
            user_repo,
            flow_repo,
            email,
            id_gen: IdGenerator::new(),
            otp_ttl_minutes: config.auth.otp_ttl_minutes,
            otp_max_attempts: config.auth.otp_max_attempts,
        }
    }

    /// Sign in with email and password, issuing a fresh access token.
    pub async fn signin(&self, email: &str, password: &str) -> AppResult<SigninOutcome> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        match user.creation_status {
            CreationStatus::Pending => {
                return Err(AppError::Forbidden(
                    "Your account is awaiting approval".to_string(),
                ));
            }
            CreationStatus::Rejected => {
                return Err(AppError::Forbidden(
                    "Your account registration was rejected".to_string(),
                ));
            }
            CreationStatus::Approved => {}
        }

        if user.active_status != Some(ActiveStatus::Active) {
            return Err(AppError::Forbidden(
                "Your account has been deactivated".to_string(),
            ));
        }

        let token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(token.clone()));
        active.updated_at = Set(Some(Utc::now().into()));
        let user = self.user_repo.update(active).await?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(SigninOutcome { user, token })
    }

    /// Sign out by invalidating the user's access token.
    pub async fn signout(&self, user: user::Model) -> AppResult<()> {
        let user_id = user.id.clone();
        let mut active: user::ActiveModel = user.into();
        active.token = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await?;

        tracing::info!(user_id = %user_id, "User signed out");
        Ok(())
    }

    /// Request a one-time code for a new signup.
    ///
    /// Replaces any live flow for the email; re-requesting resets the code
    /// and attempt counter.
    pub async fn request_signup_code(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        self.start_flow(&email, FlowKind::Signup).await
    }

    /// Request a one-time code for a password reset.
    ///
    /// Succeeds silently for unknown emails so the endpoint cannot be used
    /// to probe which addresses have accounts.
    pub async fn request_password_reset_code(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);

        if self.user_repo.find_by_email(&email).await?.is_none() {
            tracing::debug!(email = %email, "Password reset requested for unknown email");
            return Ok(());
        }

        self.start_flow(&email, FlowKind::PasswordReset).await
    }

    /// Verify a one-time code, moving the flow to `CodeVerified`.
    ///
    /// Wrong codes count against the attempt limit; once the limit is hit
    /// the flow is discarded and a new code must be requested.
    pub async fn verify_code(&self, email: &str, kind: FlowKind, code: &str) -> AppResult<()> {
        let email = normalize_email(email);

        let flow = self
            .flow_repo
            .find_by_email(&email, kind)
            .await?
            .ok_or_else(|| AppError::BadRequest("No verification in progress".to_string()))?;

        let next = transition(flow.state, FlowEvent::VerifyCode).ok_or_else(|| {
            AppError::BadRequest("Code has already been verified".to_string())
        })?;

        if flow.expires_at < Utc::now() {
            self.flow_repo.delete_by_email(&email, kind).await?;
            return Err(AppError::BadRequest(
                "Code has expired, request a new one".to_string(),
            ));
        }

        if flow.code != code {
            let attempts = flow.attempts + 1;
            if attempts >= self.otp_max_attempts {
                self.flow_repo.delete_by_email(&email, kind).await?;
                return Err(AppError::BadRequest(
                    "Too many incorrect attempts, request a new code".to_string(),
                ));
            }

            let mut active: verification_flow::ActiveModel = flow.into();
            active.attempts = Set(attempts);
            active.updated_at = Set(Some(Utc::now().into()));
            self.flow_repo.update(active).await?;

            return Err(AppError::BadRequest("Incorrect code".to_string()));
        }

        let mut active: verification_flow::ActiveModel = flow.into();
        active.state = Set(next);
        active.updated_at = Set(Some(Utc::now().into()));
        self.flow_repo.update(active).await?;

        Ok(())
    }

    /// Complete a verified signup by creating the account.
    ///
    /// The account starts as PENDING and cannot sign in until staff
    /// approve it.
    pub async fn complete_signup(&self, input: SignupInput) -> AppResult<user::Model> {
        input.validate()?;
        validate_password(&input.password)?;

        if input.role == UserRole::BarangaySecretary {
            if input.barangay_id.is_none() {
                return Err(AppError::Validation(
                    "A barangay assignment is required for secretaries".to_string(),
                ));
            }
            if input.valid_id_type_id.is_none()
                || input.id_front_url.is_none()
                || input.id_back_url.is_none()
            {
                return Err(AppError::Validation(
                    "A valid ID type and both ID images are required for secretaries".to_string(),
                ));
            }
        }

        let email = normalize_email(&input.email);

        let flow = self
            .flow_repo
            .find_by_email(&email, FlowKind::Signup)
            .await?
            .ok_or_else(|| AppError::BadRequest("No verification in progress".to_string()))?;

        transition(flow.state, FlowEvent::Complete).ok_or_else(|| {
            AppError::BadRequest("Email has not been verified".to_string())
        })?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(input.email.clone()),
            email_lower: Set(email.clone()),
            password_hash: Set(password_hash),
            token: Set(None),
            role: Set(input.role),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            middle_name: Set(input.middle_name),
            date_of_birth: Set(input.date_of_birth),
            contact_number: Set(input.contact_number),
            barangay_id: Set(input.barangay_id),
            valid_id_type_id: Set(input.valid_id_type_id),
            id_front_url: Set(input.id_front_url),
            id_back_url: Set(input.id_back_url),
            creation_status: Set(CreationStatus::Pending),
            reject_reason: Set(None),
            active_status: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;

        self.flow_repo.delete_by_email(&email, FlowKind::Signup).await?;

        tracing::info!(user_id = %user.id, "Signup completed, account pending approval");

        Ok(user)
    }

    /// Complete a verified password reset by setting the new password.
    ///
    /// Invalidates the user's token so existing sessions are signed out.
    pub async fn complete_password_reset(&self, email: &str, new_password: &str) -> AppResult<()> {
        validate_password(new_password)?;

        let email = normalize_email(email);

        let flow = self
            .flow_repo
            .find_by_email(&email, FlowKind::PasswordReset)
            .await?
            .ok_or_else(|| AppError::BadRequest("No verification in progress".to_string()))?;

        transition(flow.state, FlowEvent::Complete).ok_or_else(|| {
            AppError::BadRequest("Email has not been verified".to_string())
        })?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::UserNotFound(email.clone()))?;

        let user_id = user.id.clone();
        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(hash_password(new_password)?);
        active.token = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await?;

        self.flow_repo
            .delete_by_email(&email, FlowKind::PasswordReset)
            .await?;

        tracing::info!(user_id = %user_id, "Password reset completed");

        Ok(())
    }

    /// Authenticate a user by access token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.can_sign_in() {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Remove flows whose codes have expired.
    pub async fn purge_expired_flows(&self) -> AppResult<u64> {
        let removed = self.flow_repo.delete_expired(Utc::now().into()).await?;
        if removed > 0 {
            tracing::debug!(removed, "Purged expired verification flows");
        }
        Ok(removed)
    }

    /// Create or reset the flow for an email and send the code.
    async fn start_flow(&self, email: &str, kind: FlowKind) -> AppResult<()> {
        let code = generate_code();
        let expires_at = Utc::now() + Duration::minutes(self.otp_ttl_minutes);

        // A resend replaces the live flow wholesale.
        self.flow_repo.delete_by_email(email, kind).await?;

        let model = verification_flow::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email.to_string()),
            kind: Set(kind),
            state: Set(FlowState::CodeRequested),
            code: Set(code.clone()),
            attempts: Set(0),
            expires_at: Set(expires_at.into()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        self.flow_repo.create(model).await?;

        self.email
            .send_verification_code(email, &code, self.otp_ttl_minutes)
            .await?;

        Ok(())
    }
}

/// Check a password against the account password policy:
/// 8 to 16 characters with at least one uppercase letter, one lowercase
/// letter, and one digit.
pub fn validate_password(password: &str) -> AppResult<()> {
    let length = password.chars().count();
    if !(8..=16).contains(&length) {
        return Err(AppError::Validation(
            "Password must be 8 to 16 characters long".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "Password must contain an uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::Validation(
            "Password must contain a lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain a digit".to_string(),
        ));
    }
    Ok(())
}

/// Hash a password using Argon2.
pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Generate a 6-digit one-time code.
fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingkod_common::config::{
        AuthSettings, DatabaseConfig, ServerConfig, StorageSettings,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                url: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            storage: StorageSettings::default(),
            email: None,
            auth: AuthSettings::default(),
        }
    }

    fn create_test_user(id: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: email.to_string(),
            email_lower: email.to_lowercase(),
            password_hash: hash_password("Secret123").unwrap(),
            token: Some("test_token".to_string()),
            role: UserRole::BarangaySecretary,
            first_name: "Ana".to_string(),
            last_name: "Santos".to_string(),
            middle_name: None,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            contact_number: None,
            barangay_id: Some("brgy1".to_string()),
            valid_id_type_id: Some("vid1".to_string()),
            id_front_url: Some("/files/front.jpg".to_string()),
            id_back_url: Some("/files/back.jpg".to_string()),
            creation_status: CreationStatus::Approved,
            reject_reason: None,
            active_status: Some(ActiveStatus::Active),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_service(
        user_db: Arc<sea_orm::DatabaseConnection>,
        flow_db: Arc<sea_orm::DatabaseConnection>,
    ) -> AuthService {
        let user_repo = UserRepository::new(user_db);
        let flow_repo = VerificationFlowRepository::new(flow_db);
        let email = EmailService::new(None).unwrap();
        let config = create_test_config();
        AuthService::new(user_repo, flow_repo, email, &config)
    }

    #[test]
    fn test_password_policy_accepts_valid() {
        assert!(validate_password("Abcdef12").is_ok());
        assert!(validate_password("LongerPass123456").is_ok());
    }

    #[test]
    fn test_password_policy_length_bounds() {
        assert!(validate_password("Abc1234").is_err()); // 7 chars
        assert!(validate_password("Abcdefghijklmno12").is_err()); // 17 chars
    }

    #[test]
    fn test_password_policy_character_classes() {
        assert!(validate_password("abcdefg1").is_err()); // no uppercase
        assert!(validate_password("ABCDEFG1").is_err()); // no lowercase
        assert!(validate_password("Abcdefgh").is_err()); // no digit
    }

    #[test]
    fn test_generate_code_format() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("Secret123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Secret123", &hash).unwrap());
        assert!(!verify_password("Wrong1234", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_signin_unknown_email() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let flow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, flow_db);

        let result = service.signin("nobody@example.com", "Secret123").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_signin_wrong_password() {
        let user = create_test_user("user1", "ana@example.com");
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let flow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, flow_db);

        let result = service.signin("ana@example.com", "Wrong1234").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_signin_pending_account_rejected() {
        let mut user = create_test_user("user1", "ana@example.com");
        user.creation_status = CreationStatus::Pending;
        user.active_status = None;

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let flow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, flow_db);

        let result = service.signin("ana@example.com", "Secret123").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_signin_deactivated_account_rejected() {
        let mut user = create_test_user("user1", "ana@example.com");
        user.active_status = Some(ActiveStatus::Deactivated);

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let flow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, flow_db);

        let result = service.signin("ana@example.com", "Secret123").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_request_signup_code_existing_email_conflicts() {
        let user = create_test_user("user1", "ana@example.com");
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let flow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, flow_db);

        let result = service.request_signup_code("ana@example.com").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_verify_code_without_flow() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let flow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<verification_flow::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, flow_db);

        let result = service
            .verify_code("ana@example.com", FlowKind::Signup, "123456")
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    fn create_signup_input(role: UserRole) -> SignupInput {
        let secretary = role == UserRole::BarangaySecretary;
        SignupInput {
            email: "new@example.com".to_string(),
            password: "Secret123".to_string(),
            role,
            first_name: "Ana".to_string(),
            last_name: "Santos".to_string(),
            middle_name: None,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            contact_number: None,
            barangay_id: secretary.then(|| "brgy1".to_string()),
            valid_id_type_id: secretary.then(|| "vid1".to_string()),
            id_front_url: secretary.then(|| "/files/front.jpg".to_string()),
            id_back_url: secretary.then(|| "/files/back.jpg".to_string()),
        }
    }

    fn sample_flow(kind: FlowKind, state: FlowState) -> verification_flow::Model {
        verification_flow::Model {
            id: "flow1".to_string(),
            email: "new@example.com".to_string(),
            kind,
            state,
            code: "123456".to_string(),
            attempts: 0,
            expires_at: (Utc::now() + Duration::minutes(10)).into(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_complete_signup_secretary_requires_barangay() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let flow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, flow_db);

        let mut input = create_signup_input(UserRole::BarangaySecretary);
        input.barangay_id = None;

        let result = service.complete_signup(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_complete_signup_secretary_requires_id_images() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let flow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, flow_db);

        let mut input = create_signup_input(UserRole::BarangaySecretary);
        input.id_front_url = None;

        let result = service.complete_signup(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_complete_signup_staff_without_barangay() {
        use sea_orm::MockExecResult;

        let mut created = create_test_user("staff2", "new@example.com");
        created.role = UserRole::MlgooStaff;
        created.barangay_id = None;
        created.valid_id_type_id = None;
        created.id_front_url = None;
        created.id_back_url = None;
        created.creation_status = CreationStatus::Pending;
        created.active_status = None;
        created.token = None;

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );
        let flow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[sample_flow(FlowKind::Signup, FlowState::CodeVerified)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = create_test_service(user_db, flow_db);

        let user = service
            .complete_signup(create_signup_input(UserRole::MlgooStaff))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::MlgooStaff);
        assert_eq!(user.creation_status, CreationStatus::Pending);
        assert!(user.barangay_id.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_by_token_not_found() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let flow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, flow_db);

        let result = service.authenticate_by_token("invalid").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_deactivated() {
        let mut user = create_test_user("user1", "ana@example.com");
        user.active_status = Some(ActiveStatus::Deactivated);

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let flow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, flow_db);

        let result = service.authenticate_by_token("test_token").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
