//! Barangay lookup endpoints.
//!
//! Reads are available to any signed-in user (secretaries pick their
//! barangay from this list); writes are staff-only.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use lingkod_common::AppResult;
use lingkod_core::BarangayInput;
use lingkod_db::entities::barangay;

use crate::{
    extractors::{AuthUser, StaffUser},
    middleware::AppState,
    response::ApiResponse,
};

async fn list_barangays(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<barangay::Model>>> {
    let barangays = state.lookup_service.list_barangays().await?;
    Ok(ApiResponse::ok(barangays))
}

async fn get_barangay(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<barangay::Model>> {
    let barangay = state.lookup_service.get_barangay(&id).await?;
    Ok(ApiResponse::ok(barangay))
}

async fn create_barangay(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Json(input): Json<BarangayInput>,
) -> AppResult<ApiResponse<barangay::Model>> {
    let created = state.lookup_service.create_barangay(&staff, input).await?;
    Ok(ApiResponse::ok(created))
}

async fn update_barangay(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<BarangayInput>,
) -> AppResult<ApiResponse<barangay::Model>> {
    let updated = state
        .lookup_service
        .update_barangay(&staff, &id, input)
        .await?;
    Ok(ApiResponse::ok(updated))
}

async fn delete_barangay(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.lookup_service.delete_barangay(&staff, &id).await?;
    Ok(crate::response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_barangays).post(create_barangay))
        .route(
            "/{id}",
            get(get_barangay).put(update_barangay).delete(delete_barangay),
        )
}
