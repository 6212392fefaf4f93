//! Lingkod server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, middleware};
use lingkod_api::{middleware::AppState, router as api_router};
use lingkod_common::{Config, LocalStorage, StorageBackend};
use lingkod_core::{
    AuditService, AuthService, DashboardService, EmailService, LookupService,
    NotificationService, PolicyService, ReportService, UserService,
};
use lingkod_db::repositories::{
    AuditLogRepository, BarangayRepository, NotificationRepository, PolicySectionRepository,
    ReportCommentRepository, ReportRepository, ReportTypeRepository, UserRepository,
    ValidIdTypeRepository, VerificationFlowRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Spawns the background sweep that removes expired verification flows.
fn spawn_flow_sweeper(auth_service: AuthService) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(15 * 60));
        loop {
            interval.tick().await;
            match auth_service.purge_expired_flows().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Expired verification flows removed"),
                Err(e) => tracing::warn!(error = %e, "Verification flow sweep failed"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingkod=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting lingkod server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = lingkod_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    lingkod_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize file storage
    let storage_path = PathBuf::from(&config.storage.path);
    tokio::fs::create_dir_all(&storage_path).await?;
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        storage_path.clone(),
        config.storage.base_url.clone(),
    ));

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let flow_repo = VerificationFlowRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let comment_repo = ReportCommentRepository::new(Arc::clone(&db));
    let report_type_repo = ReportTypeRepository::new(Arc::clone(&db));
    let barangay_repo = BarangayRepository::new(Arc::clone(&db));
    let valid_id_type_repo = ValidIdTypeRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let policy_repo = PolicySectionRepository::new(Arc::clone(&db));
    let audit_repo = AuditLogRepository::new(Arc::clone(&db));

    // Initialize services
    let email = EmailService::new(config.email.as_ref())?;
    if config.email.is_none() {
        info!("No SMTP configured; verification codes will be logged");
    }

    let audit_service = AuditService::new(audit_repo.clone());
    let notification_service =
        NotificationService::new(notification_repo.clone(), user_repo.clone());
    let auth_service = AuthService::new(user_repo.clone(), flow_repo.clone(), email, &config);
    let user_service = UserService::new(
        user_repo.clone(),
        notification_service.clone(),
        audit_service.clone(),
    );
    let report_service = ReportService::new(
        report_repo.clone(),
        comment_repo.clone(),
        report_type_repo.clone(),
        Arc::clone(&storage),
        notification_service.clone(),
        audit_service.clone(),
    );
    let lookup_service = LookupService::new(
        barangay_repo.clone(),
        report_type_repo.clone(),
        valid_id_type_repo.clone(),
        report_repo.clone(),
        user_repo.clone(),
        audit_service.clone(),
    );
    let policy_service = PolicyService::new(policy_repo.clone(), audit_service.clone());
    let dashboard_service = DashboardService::new(
        report_repo.clone(),
        user_repo.clone(),
        barangay_repo.clone(),
        audit_repo.clone(),
    );

    spawn_flow_sweeper(auth_service.clone());

    // Create app state
    let state = AppState {
        auth_service,
        user_service,
        report_service,
        lookup_service,
        policy_service,
        notification_service,
        audit_service,
        dashboard_service,
        storage,
    };

    // Build router; uploaded files are served from the storage directory
    let files_route = config.storage.base_url.trim_end_matches('/').to_string();
    let app = Router::new()
        .nest("/api", api_router())
        .nest_service(&files_route, ServeDir::new(storage_path))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            lingkod_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
