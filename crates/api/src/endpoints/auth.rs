//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::{get, post},
};
use chrono::NaiveDate;
use lingkod_common::{AppError, AppResult, generate_storage_key};
use lingkod_core::SignupInput;
use lingkod_db::entities::{user::UserRole, verification_flow::FlowKind};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::users::UserResponse,
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
};

/// Maximum ID image size in bytes (5 MB).
const MAX_ID_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Content types accepted for ID verification images.
const ALLOWED_ID_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Signin request.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Signin response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Sign in to an existing account.
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<ApiResponse<SigninResponse>> {
    let outcome = state.auth_service.signin(&req.email, &req.password).await?;

    Ok(ApiResponse::ok(SigninResponse {
        token: outcome.token,
        user: outcome.user.into(),
    }))
}

/// Sign out by invalidating the current token.
async fn signout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.auth_service.signout(user).await?;
    Ok(crate::response::ok())
}

/// Return the current user for a valid token (session restore).
async fn session(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Email-only request used by both OTP request endpoints.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Code verification request.
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// Request a signup verification code.
async fn signup_request_otp(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.auth_service.request_signup_code(&req.email).await?;
    Ok(crate::response::ok())
}

/// Verify a signup code.
async fn signup_verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyCodeRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .auth_service
        .verify_code(&req.email, FlowKind::Signup, &req.code)
        .await?;
    Ok(crate::response::ok())
}

/// Complete a verified signup.
///
/// Multipart form: profile fields plus the two ID images (`id_front`,
/// `id_back`, jpeg/png, ≤5MB each).
async fn signup_complete(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UserResponse>> {
    let mut fields = SignupForm::default();
    let mut id_front: Option<IdImage> = None;
    let mut id_back: Option<IdImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "id_front" => id_front = Some(read_id_image(field).await?),
            "id_back" => id_back = Some(read_id_image(field).await?),
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                fields.set(&name, value);
            }
        }
    }

    let role = match fields.role.as_str() {
        "BARANGAY_SECRETARY" => UserRole::BarangaySecretary,
        "MLGOO_STAFF" => UserRole::MlgooStaff,
        _ => return Err(AppError::Validation("Invalid role".to_string())),
    };

    // ID verification is a secretary requirement; staff signups carry none.
    if role == UserRole::BarangaySecretary && (id_front.is_none() || id_back.is_none()) {
        return Err(AppError::Validation(
            "Both ID images are required".to_string(),
        ));
    }

    if fields.password != fields.password_confirmation {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }

    let date_of_birth = fields
        .date_of_birth
        .parse::<NaiveDate>()
        .map_err(|_| AppError::Validation("Invalid date of birth".to_string()))?;

    // Store the images; the URLs go on the user row for staff review. The
    // keys are remembered so a failed completion does not leave orphans.
    let mut uploaded_keys = Vec::new();
    let mut id_front_url = None;
    let mut id_back_url = None;
    if let Some(image) = &id_front {
        let key = generate_storage_key("signup", &image.file_name);
        let stored = state
            .storage
            .upload(&key, &image.data, &image.content_type)
            .await?;
        uploaded_keys.push(key);
        id_front_url = Some(stored.url);
    }
    if let Some(image) = &id_back {
        let key = generate_storage_key("signup", &image.file_name);
        let stored = state
            .storage
            .upload(&key, &image.data, &image.content_type)
            .await?;
        uploaded_keys.push(key);
        id_back_url = Some(stored.url);
    }

    let input = SignupInput {
        email: fields.email,
        password: fields.password,
        role,
        first_name: fields.first_name,
        last_name: fields.last_name,
        middle_name: fields.middle_name,
        date_of_birth,
        contact_number: fields.contact_number,
        barangay_id: fields.barangay_id,
        valid_id_type_id: fields.valid_id_type_id,
        id_front_url,
        id_back_url,
    };

    let user = match state.auth_service.complete_signup(input).await {
        Ok(user) => user,
        Err(err) => {
            for key in &uploaded_keys {
                if let Err(delete_err) = state.storage.delete(key).await {
                    tracing::warn!(key = %key, error = %delete_err, "Failed to remove stored ID image after signup failure");
                }
            }
            return Err(err);
        }
    };

    state.user_service.notify_staff_of_signup(&user).await?;

    Ok(ApiResponse::ok(user.into()))
}

/// Request a password reset code.
async fn reset_request_otp(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .auth_service
        .request_password_reset_code(&req.email)
        .await?;
    Ok(crate::response::ok())
}

/// Verify a password reset code.
async fn reset_verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyCodeRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .auth_service
        .verify_code(&req.email, FlowKind::PasswordReset, &req.code)
        .await?;
    Ok(crate::response::ok())
}

/// Password reset completion request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetCompleteRequest {
    pub email: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

/// Complete a verified password reset.
async fn reset_complete(
    State(state): State<AppState>,
    Json(req): Json<ResetCompleteRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    if req.new_password != req.new_password_confirmation {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }

    state
        .auth_service
        .complete_password_reset(&req.email, &req.new_password)
        .await?;
    Ok(crate::response::ok())
}

/// Collected text fields of the signup form.
#[derive(Debug, Default)]
struct SignupForm {
    email: String,
    password: String,
    password_confirmation: String,
    role: String,
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
    date_of_birth: String,
    contact_number: Option<String>,
    barangay_id: Option<String>,
    valid_id_type_id: Option<String>,
}

impl SignupForm {
    fn set(&mut self, name: &str, value: String) {
        match name {
            "email" => self.email = value,
            "password" => self.password = value,
            "password_confirmation" => self.password_confirmation = value,
            "role" => self.role = value,
            "first_name" => self.first_name = value,
            "last_name" => self.last_name = value,
            "middle_name" => self.middle_name = Some(value),
            "date_of_birth" => self.date_of_birth = value,
            "contact_number" => self.contact_number = Some(value),
            "barangay_id" => self.barangay_id = Some(value),
            "valid_id_type_id" => self.valid_id_type_id = Some(value),
            _ => {}
        }
    }
}

struct IdImage {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

async fn read_id_image(field: axum::extract::multipart::Field<'_>) -> AppResult<IdImage> {
    let file_name = field.file_name().unwrap_or("id-image").to_string();
    let content_type = field.content_type().unwrap_or("").to_string();

    if !ALLOWED_ID_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::Validation(
            "ID images must be JPEG or PNG".to_string(),
        ));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if data.len() > MAX_ID_IMAGE_SIZE {
        return Err(AppError::Validation(
            "ID images must be 5MB or smaller".to_string(),
        ));
    }
    if data.is_empty() {
        return Err(AppError::Validation("ID image is empty".to_string()));
    }

    Ok(IdImage {
        file_name,
        content_type,
        data: data.to_vec(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signin", post(signin))
        .route("/signout", post(signout))
        .route("/session", get(session))
        .route("/signup/request-otp", post(signup_request_otp))
        .route("/signup/verify-otp", post(signup_verify_otp))
        .route("/signup/complete", post(signup_complete))
        .route("/password-reset/request-otp", post(reset_request_otp))
        .route("/password-reset/verify-otp", post(reset_verify_otp))
        .route("/password-reset/complete", post(reset_complete))
}
