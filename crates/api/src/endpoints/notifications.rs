//! Notification endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use lingkod_common::AppResult;
use lingkod_core::{NotificationView, SendNotificationInput, SentNotificationView};
use lingkod_db::entities::notification;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, StaffUser},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub unread_only: bool,
}

fn default_limit() -> u64 {
    20
}

async fn list_notifications(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<ApiResponse<Vec<NotificationView>>> {
    let items = state
        .notification_service
        .list_for_user(&user.id, query.limit.min(100), query.offset, query.unread_only)
        .await?;
    Ok(ApiResponse::ok(items))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: u64,
}

async fn unread_count(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = state.notification_service.count_unread(&user.id).await?;
    Ok(ApiResponse::ok(UnreadCountResponse { count }))
}

async fn send_notification(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Json(input): Json<SendNotificationInput>,
) -> AppResult<ApiResponse<notification::Model>> {
    let sent = state.notification_service.send(&staff, input).await?;
    Ok(ApiResponse::ok(sent))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

async fn list_sent(
    StaffUser(staff): StaffUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<SentNotificationView>>> {
    let items = state
        .notification_service
        .list_sent(&staff.id, query.limit.min(100), query.offset)
        .await?;
    Ok(ApiResponse::ok(items))
}

/// Marking a notification as read is what unlocks the full message.
async fn mark_as_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<NotificationView>> {
    let view = state.notification_service.mark_as_read(&user.id, &id).await?;
    Ok(ApiResponse::ok(view))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllResponse {
    pub updated: u64,
}

async fn mark_all_as_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MarkAllResponse>> {
    let updated = state.notification_service.mark_all_as_read(&user.id).await?;
    Ok(ApiResponse::ok(MarkAllResponse { updated }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications).post(send_notification))
        .route("/unread-count", get(unread_count))
        .route("/sent", get(list_sent))
        .route("/{id}/read", post(mark_as_read))
        .route("/read-all", post(mark_all_as_read))
}
