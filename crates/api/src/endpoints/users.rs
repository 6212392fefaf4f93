//! User management endpoints (staff-only).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use lingkod_common::AppResult;
use lingkod_db::{
    entities::user::{self, ActiveStatus, CreationStatus, UserRole},
    repositories::UserFilter,
};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::StaffUser,
    middleware::AppState,
    response::{ApiResponse, Paginated},
};

/// A user as exposed over the API. Never includes the password hash or
/// access token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub date_of_birth: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barangay_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_id_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_front_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_back_url: Option<String>,
    pub creation_status: CreationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_status: Option<ActiveStatus>,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            role: u.role,
            first_name: u.first_name,
            last_name: u.last_name,
            middle_name: u.middle_name,
            date_of_birth: u.date_of_birth.to_string(),
            contact_number: u.contact_number,
            barangay_id: u.barangay_id,
            valid_id_type_id: u.valid_id_type_id,
            id_front_url: u.id_front_url,
            id_back_url: u.id_back_url,
            creation_status: u.creation_status,
            reject_reason: u.reject_reason,
            active_status: u.active_status,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// User list query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub creation_status: Option<CreationStatus>,
    pub active_status: Option<ActiveStatus>,
    pub barangay_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// List users with filters.
async fn list_users(
    StaffUser(_staff): StaffUser,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<ApiResponse<Paginated<UserResponse>>> {
    let filter = UserFilter {
        search: query.search,
        role: query.role,
        creation_status: query.creation_status,
        active_status: query.active_status,
        barangay_id: query.barangay_id,
    };

    let (users, total) = state
        .user_service
        .list(filter, query.limit.min(100), query.offset)
        .await?;

    Ok(ApiResponse::ok(Paginated {
        items: users.into_iter().map(UserResponse::from).collect(),
        total,
    }))
}

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// List accounts awaiting approval.
async fn list_pending(
    StaffUser(_staff): StaffUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<UserResponse>>> {
    let (users, total) = state
        .user_service
        .list_pending(query.limit.min(100), query.offset)
        .await?;

    Ok(ApiResponse::ok(Paginated {
        items: users.into_iter().map(UserResponse::from).collect(),
        total,
    }))
}

/// Get one user.
async fn get_user(
    StaffUser(_staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(&id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Approve a pending signup.
async fn approve_user(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.approve(&staff, &id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Rejection request.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// Reject a pending signup.
async fn reject_user(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.reject(&staff, &id, &req.reason).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Reactivate an account.
async fn activate_user(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.activate(&staff, &id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Deactivate an account.
async fn deactivate_user(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.deactivate(&staff, &id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Delete an account.
async fn delete_user(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.user_service.delete(&staff, &id).await?;
    Ok(crate::response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/pending", get(list_pending))
        .route("/{id}", get(get_user).delete(delete_user))
        .route("/{id}/approve", post(approve_user))
        .route("/{id}/reject", post(reject_user))
        .route("/{id}/activate", post(activate_user))
        .route("/{id}/deactivate", post(deactivate_user))
}
