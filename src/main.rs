use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use wallet_ledger_api::{config::Config, database, handlers, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_ledger_api=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting wallet ledger API server...");

    // Load configuration
    let config = Arc::new(Config::from_env()?);
    info!("Configuration loaded");

    // Initialize database pool and schema
    let db_pool = database::new_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&*db_pool).await?;
    info!("Database connection pool created");

    // Build application state
    let app_state = AppState::new(db_pool, config.clone());

    // Build API routes
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/wallets", post(handlers::create_wallet))
        .route("/api/v1/wallets", get(handlers::list_wallets))
        .route("/api/v1/wallets/:id", get(handlers::get_wallet))
        .route("/api/v1/wallets/:id", patch(handlers::update_wallet))
        .route(
            "/api/v1/wallets/:id/transactions",
            get(handlers::get_wallet_transactions),
        )
        .route("/api/v1/transfers", post(handlers::create_transfer))
        .route("/api/v1/transactions", get(handlers::list_transactions))
        .route("/api/v1/transactions", post(handlers::filter_transactions))
        .route("/api/v1/transactions/:id", get(handlers::get_transaction))
        .route(
            "/api/v1/transactions-report",
            post(handlers::transactions_report),
        )
        .route(
            "/api/v1/generate_fake_data",
            post(handlers::generate_fake_data),
        )
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    // Graceful shutdown
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutting down gracefully...");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
