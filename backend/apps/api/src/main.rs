//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors render through
//! `kernel::error::AppError` inside the library crates.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::application::manage_users::ManageUsersUseCase;
use auth::router::{admin_user_routes, auth_routes, with_auth_layers};
use auth::{AuthAppState, PgAuthRepository};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, header},
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use works::{PgWorksRepository, WorksConfig, works_routes};

use crate::config::ServerConfig;

/// JSON bodies above this are rejected with 413
const BODY_LIMIT_BYTES: usize = 100 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,works=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(env = ?config.app_env, "Configuration loaded");

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_config = Arc::new(config.auth);
    let user_repo = Arc::new(PgAuthRepository::new(pool.clone()));

    // Bootstrap admin. A failure here aborts startup
    if let Some(admin) = config.bootstrap_admin {
        let created = ManageUsersUseCase::new(user_repo.clone(), auth_config.clone())
            .ensure_admin(&admin.username, admin.password)
            .await?;
        if !created {
            tracing::info!(user_name = %admin.username, "Bootstrap admin already present");
        }
    }

    let auth_state = AuthAppState {
        repo: user_repo,
        config: auth_config.clone(),
    };
    let works_repo = Arc::new(PgWorksRepository::new(pool));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_bytes(auth_config.csrf_header_name.as_bytes())?,
            HeaderName::from_bytes(auth_config.legacy_token_header.as_bytes())?,
        ]))
        .allow_credentials(true);

    // Build router
    let router = Router::new()
        .nest("/api/auth", auth_routes(auth_state.clone()))
        .nest("/api/admin", admin_user_routes(auth_state.clone()))
        .nest("/api", works_routes(works_repo, WorksConfig::default()));

    let app = with_auth_layers(router, auth_state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("same-site"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Gracefully shutdown");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
