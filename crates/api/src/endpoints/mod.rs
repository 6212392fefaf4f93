//! HTTP endpoint modules.

use axum::Router;

use crate::middleware::AppState;

pub mod auth;
pub mod barangays;
pub mod dashboard;
pub mod logs;
pub mod notifications;
pub mod profile;
pub mod reports;
pub mod settings;
pub mod users;

/// Build the API router with all endpoint groups.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/profile", profile::router())
        .nest("/reports", reports::router())
        .nest("/barangays", barangays::router())
        .nest("/settings", settings::router())
        .nest("/notifications", notifications::router())
        .nest("/logs", logs::router())
        .nest("/dashboard", dashboard::router())
}
