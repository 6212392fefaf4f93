//! Report submission and review endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
};
use lingkod_common::{AppError, AppResult};
use lingkod_core::{AttachmentUpload, CreateReportInput, ReportDetail, UpdateReportInput};
use lingkod_db::{entities::report::ReportStatus, repositories::ReportFilter};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, StaffUser},
    middleware::AppState,
    response::{ApiResponse, Paginated},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsQuery {
    pub search: Option<String>,
    pub year: Option<i32>,
    pub report_type_id: Option<String>,
    pub status: Option<ReportStatus>,
    pub barangay_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    20
}

async fn list_reports(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> AppResult<ApiResponse<Paginated<lingkod_db::entities::report::Model>>> {
    let filter = ReportFilter {
        search: query.search,
        year: query.year,
        report_type_id: query.report_type_id,
        status: query.status,
        barangay_id: query.barangay_id,
        submitted_by: None,
    };

    let (items, total) = state
        .report_service
        .list(&user, filter, query.limit.min(100), query.offset)
        .await?;

    Ok(ApiResponse::ok(Paginated { items, total }))
}

/// Create a report from a multipart form.
///
/// Text fields: `report_type_id`, `title`, `year`. Every `attachments`
/// field is an uploaded file; at least one is required.
async fn create_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<ReportDetail>> {
    let (input, attachments) = read_report_form(multipart).await?;

    let input = CreateReportInput {
        report_type_id: input
            .report_type_id
            .ok_or_else(|| AppError::Validation("Report type is required".to_string()))?,
        title: input
            .title
            .ok_or_else(|| AppError::Validation("Title is required".to_string()))?,
        year: input
            .year
            .ok_or_else(|| AppError::Validation("Year is required".to_string()))?,
    };

    let detail = state.report_service.create(&user, input, attachments).await?;
    Ok(ApiResponse::ok(detail))
}

async fn get_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReportDetail>> {
    let detail = state.report_service.get(&user, &id).await?;
    Ok(ApiResponse::ok(detail))
}

/// Update a pending report; same multipart shape as create, all text
/// fields optional, new files are appended to the attachment list.
async fn update_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<ReportDetail>> {
    let (fields, attachments) = read_report_form(multipart).await?;

    let input = UpdateReportInput {
        report_type_id: fields.report_type_id,
        title: fields.title,
        year: fields.year,
    };

    let detail = state
        .report_service
        .update(&user, &id, input, attachments)
        .await?;
    Ok(ApiResponse::ok(detail))
}

async fn remove_attachment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((id, attachment_id)): Path<(String, String)>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .report_service
        .remove_attachment(&user, &id, &attachment_id)
        .await?;
    Ok(crate::response::ok())
}

async fn delete_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.report_service.delete(&user, &id).await?;
    Ok(crate::response::ok())
}

async fn approve_report(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<lingkod_db::entities::report::Model>> {
    let report = state.report_service.approve(&staff, &id).await?;
    Ok(ApiResponse::ok(report))
}

#[derive(Debug, Deserialize)]
pub struct RejectReportRequest {
    pub reason: String,
}

async fn reject_report(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RejectReportRequest>,
) -> AppResult<ApiResponse<lingkod_db::entities::report::Model>> {
    let report = state.report_service.reject(&staff, &id, &req.reason).await?;
    Ok(ApiResponse::ok(report))
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> AppResult<ApiResponse<lingkod_db::entities::report_comment::Model>> {
    let comment = state
        .report_service
        .add_comment(&user, &id, &req.body)
        .await?;
    Ok(ApiResponse::ok(comment))
}

/// Text fields collected from a report multipart form.
#[derive(Debug, Default)]
struct ReportForm {
    report_type_id: Option<String>,
    title: Option<String>,
    year: Option<i32>,
}

async fn read_report_form(
    mut multipart: Multipart,
) -> AppResult<(ReportForm, Vec<AttachmentUpload>)> {
    let mut form = ReportForm::default();
    let mut attachments = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "attachments" => {
                let file_name = field.file_name().unwrap_or("attachment").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;

                attachments.push(AttachmentUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;

                match name.as_str() {
                    "report_type_id" => form.report_type_id = Some(value),
                    "title" => form.title = Some(value),
                    "year" => {
                        form.year = Some(value.parse().map_err(|_| {
                            AppError::Validation("Year must be a number".to_string())
                        })?);
                    }
                    _ => {}
                }
            }
        }
    }

    Ok((form, attachments))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route(
            "/{id}",
            get(get_report).put(update_report).delete(delete_report),
        )
        .route(
            "/{id}/attachments/{attachment_id}",
            axum::routing::delete(remove_attachment),
        )
        .route("/{id}/approve", post(approve_report))
        .route("/{id}/reject", post(reject_report))
        .route("/{id}/comments", post(add_comment))
}
