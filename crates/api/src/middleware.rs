//! API middleware.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use lingkod_common::{AppError, StorageBackend};
use lingkod_core::{
    AuditService, AuthService, DashboardService, LookupService, NotificationService,
    PolicyService, ReportService, UserService,
};

use crate::access;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub report_service: ReportService,
    pub lookup_service: LookupService,
    pub policy_service: PolicyService,
    pub notification_service: NotificationService,
    pub audit_service: AuditService,
    pub dashboard_service: DashboardService,
    pub storage: Arc<dyn StorageBackend>,
}

/// Authentication middleware.
///
/// Resolves a bearer token to a user and stores it in request extensions
/// for the extractors. Authenticated requests are additionally checked
/// against the role access table; anonymous requests pass through and are
/// rejected by the extractors where auth is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.auth_service.authenticate_by_token(token).await
    {
        // The API router is nested under /api by the server.
        let path = req.uri().path();
        let path = path.strip_prefix("/api").unwrap_or(path);
        if !access::is_allowed(user.role, path) {
            tracing::warn!(user_id = %user.id, path, "Route access denied");
            return AppError::Forbidden("You do not have access to this resource".to_string())
                .into_response();
        }
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
