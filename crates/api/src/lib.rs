//! HTTP API layer for lingkod.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: resource routers for auth, users, reports, lookups,
//!   policies, notifications, logs, and the dashboard
//! - **Extractors**: `AuthUser` / `StaffUser` authentication gates
//! - **Middleware**: bearer-token resolution and role-based route access
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod access;
pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
