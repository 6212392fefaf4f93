//! Dashboard endpoint.
//!
//! One route; the payload shape depends on the caller's role.

use axum::{Json, Router, extract::Query, extract::State, routing::get};
use chrono::Datelike;
use lingkod_common::AppResult;
use lingkod_db::entities::user::UserRole;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub year: Option<i32>,
}

async fn dashboard(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let payload = match user.role {
        UserRole::MlgooStaff => {
            let year = query.year.unwrap_or_else(|| chrono::Utc::now().year());
            let dashboard = state.dashboard_service.staff_dashboard(year).await?;
            serde_json::to_value(dashboard)
        }
        UserRole::BarangaySecretary => {
            let dashboard = state.dashboard_service.secretary_dashboard(&user).await?;
            serde_json::to_value(dashboard)
        }
    }
    .map_err(|e| lingkod_common::AppError::Internal(e.to_string()))?;

    Ok(ApiResponse::ok(payload))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}
