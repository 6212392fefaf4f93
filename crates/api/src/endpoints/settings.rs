//! Settings endpoints: report types, valid ID types, and the policy
//! documents shown in the app.
//!
//! Policy reads are public (the signup screen links to them before a
//! session exists); everything else is staff-only except the lookup
//! reads, which any signed-in user can see.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use lingkod_common::{AppError, AppResult};
use lingkod_core::{MoveDirection, PolicySectionInput, ReportTypeInput, ValidIdTypeInput};
use lingkod_db::entities::{policy_section, policy_section::PolicyDocument, report_type, valid_id_type};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, StaffUser},
    middleware::AppState,
    response::ApiResponse,
};

// --- Report types ---

async fn list_report_types(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<report_type::Model>>> {
    let types = state.lookup_service.list_report_types().await?;
    Ok(ApiResponse::ok(types))
}

async fn create_report_type(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Json(input): Json<ReportTypeInput>,
) -> AppResult<ApiResponse<report_type::Model>> {
    let created = state
        .lookup_service
        .create_report_type(&staff, input)
        .await?;
    Ok(ApiResponse::ok(created))
}

async fn update_report_type(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ReportTypeInput>,
) -> AppResult<ApiResponse<report_type::Model>> {
    let updated = state
        .lookup_service
        .update_report_type(&staff, &id, input)
        .await?;
    Ok(ApiResponse::ok(updated))
}

async fn delete_report_type(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.lookup_service.delete_report_type(&staff, &id).await?;
    Ok(crate::response::ok())
}

// --- Valid ID types ---

async fn list_valid_id_types(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<valid_id_type::Model>>> {
    let types = state.lookup_service.list_valid_id_types().await?;
    Ok(ApiResponse::ok(types))
}

async fn create_valid_id_type(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Json(input): Json<ValidIdTypeInput>,
) -> AppResult<ApiResponse<valid_id_type::Model>> {
    let created = state
        .lookup_service
        .create_valid_id_type(&staff, input)
        .await?;
    Ok(ApiResponse::ok(created))
}

async fn update_valid_id_type(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ValidIdTypeInput>,
) -> AppResult<ApiResponse<valid_id_type::Model>> {
    let updated = state
        .lookup_service
        .update_valid_id_type(&staff, &id, input)
        .await?;
    Ok(ApiResponse::ok(updated))
}

async fn delete_valid_id_type(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .lookup_service
        .delete_valid_id_type(&staff, &id)
        .await?;
    Ok(crate::response::ok())
}

// --- Policy documents ---

fn parse_document(slug: &str) -> AppResult<PolicyDocument> {
    match slug {
        "privacy-policy" => Ok(PolicyDocument::PrivacyPolicy),
        "terms-of-service" => Ok(PolicyDocument::TermsOfService),
        _ => Err(AppError::NotFound(format!("Unknown policy document: {slug}"))),
    }
}

async fn list_policy_sections(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> AppResult<ApiResponse<Vec<policy_section::Model>>> {
    let document = parse_document(&document)?;
    let sections = state.policy_service.list(document).await?;
    Ok(ApiResponse::ok(sections))
}

async fn create_policy_section(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(document): Path<String>,
    Json(input): Json<PolicySectionInput>,
) -> AppResult<ApiResponse<policy_section::Model>> {
    let document = parse_document(&document)?;
    let created = state
        .policy_service
        .create(&staff, document, input)
        .await?;
    Ok(ApiResponse::ok(created))
}

async fn update_policy_section(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PolicySectionInput>,
) -> AppResult<ApiResponse<policy_section::Model>> {
    let updated = state.policy_service.update(&staff, &id, input).await?;
    Ok(ApiResponse::ok(updated))
}

#[derive(Debug, Deserialize)]
pub struct MoveSectionRequest {
    pub direction: MoveDirection,
}

async fn move_policy_section(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveSectionRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .policy_service
        .move_section(&staff, &id, req.direction)
        .await?;
    Ok(crate::response::ok())
}

async fn delete_policy_section(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.policy_service.delete(&staff, &id).await?;
    Ok(crate::response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/report-types",
            get(list_report_types).post(create_report_type),
        )
        .route(
            "/report-types/{id}",
            axum::routing::put(update_report_type).delete(delete_report_type),
        )
        .route(
            "/valid-id-types",
            get(list_valid_id_types).post(create_valid_id_type),
        )
        .route(
            "/valid-id-types/{id}",
            axum::routing::put(update_valid_id_type).delete(delete_valid_id_type),
        )
        .route(
            "/policies/{document}",
            get(list_policy_sections).post(create_policy_section),
        )
        .route(
            "/policies/sections/{id}",
            axum::routing::put(update_policy_section).delete(delete_policy_section),
        )
        .route("/policies/sections/{id}/move", post(move_policy_section))
}
