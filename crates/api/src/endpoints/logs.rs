//! Audit log endpoints (staff-only).

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use lingkod_common::{AppError, AppResult};
use lingkod_db::entities::audit_log;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::StaffUser,
    middleware::AppState,
    response::{ApiResponse, Paginated},
};

#[derive(Debug, Deserialize)]
pub struct ListLogsQuery {
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    50
}

async fn list_logs(
    StaffUser(_staff): StaffUser,
    State(state): State<AppState>,
    Query(query): Query<ListLogsQuery>,
) -> AppResult<ApiResponse<Paginated<audit_log::Model>>> {
    let (items, total) = state
        .audit_service
        .list(query.from, query.to, query.limit.min(200), query.offset)
        .await?;
    Ok(ApiResponse::ok(Paginated { items, total }))
}

#[derive(Debug, Deserialize)]
pub struct PurgeLogsRequest {
    pub from: DateTime<FixedOffset>,
    pub to: DateTime<FixedOffset>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeLogsResponse {
    pub removed: u64,
}

/// Bulk-delete entries inside an inclusive date range. The purge itself
/// stays in the log as a fresh entry.
async fn purge_logs(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<PurgeLogsRequest>,
) -> AppResult<ApiResponse<PurgeLogsResponse>> {
    if req.from > req.to {
        return Err(AppError::BadRequest(
            "Range start must not be after range end".to_string(),
        ));
    }

    let removed = state
        .audit_service
        .delete_range(&staff, req.from, req.to)
        .await?;
    Ok(ApiResponse::ok(PurgeLogsResponse { removed }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_logs).delete(purge_logs))
}
