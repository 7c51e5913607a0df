//! Redline service binary.
//!
//! Wires the postgres adapters, the workflow handlers, and the HTTP
//! surface together and serves the versioning API.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redline::adapters::events::LoggingEventPublisher;
use redline::adapters::http::{version_routes, VersionHandlers};
use redline::adapters::{PostgresAuditTrail, PostgresVersionStore};
use redline::application::handlers::version::{
    ApproveVersionHandler, CreateDraftHandler, GetAuditTrailHandler, GetVersionHistoryHandler,
    PublishVersionHandler, RequestChangesHandler, RollbackToVersionHandler,
    SubmitForReviewHandler,
};
use redline::config::{AppConfig, ServerConfig};
use redline::ports::{AuditTrail, EventPublisher, VersionStore};

#[tokio::main]
async fn main() {
    // --- Configuration ---
    let config = AppConfig::load().expect("Failed to load configuration");
    config.validate().expect("Invalid configuration");

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        "Loaded server configuration"
    );

    // --- Database ---
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database migrations applied");
    }

    // --- Adapters ---
    let store: Arc<dyn VersionStore> = Arc::new(PostgresVersionStore::new(pool.clone()));
    let audit_trail: Arc<dyn AuditTrail> = Arc::new(PostgresAuditTrail::new(pool.clone()));
    let event_publisher: Arc<dyn EventPublisher> = Arc::new(LoggingEventPublisher::new());

    // --- Handlers ---
    let handlers = VersionHandlers::new(
        Arc::new(CreateDraftHandler::new(
            store.clone(),
            event_publisher.clone(),
        )),
        Arc::new(SubmitForReviewHandler::new(
            store.clone(),
            event_publisher.clone(),
        )),
        Arc::new(ApproveVersionHandler::new(
            store.clone(),
            event_publisher.clone(),
        )),
        Arc::new(RequestChangesHandler::new(
            store.clone(),
            event_publisher.clone(),
        )),
        Arc::new(PublishVersionHandler::new(
            store.clone(),
            event_publisher.clone(),
        )),
        Arc::new(RollbackToVersionHandler::new(
            store.clone(),
            event_publisher.clone(),
        )),
        Arc::new(GetVersionHistoryHandler::new(store.clone())),
        Arc::new(GetAuditTrailHandler::new(audit_trail.clone())),
    );

    // --- Router ---
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", version_routes(handlers))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(build_cors_layer(&config.server))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    // --- Serve ---
    let addr = config
        .server
        .socket_addr()
        .expect("Invalid server address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!(%addr, "Redline listening");

    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}

async fn health() -> &'static str {
    "ok"
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
