use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, Level};

use welder_gateway::core::config::Config;
use welder_gateway::core::startup::check_backend;
use welder_gateway::core::state::AppState;
use welder_gateway::core::{routes, tracing_init};
use welder_gateway::stores::session_store::SessionStore;
use welder_gateway::utils::time::current_timestamp;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("config.toml")
    };

    // Load and validate configuration
    let config = Config::from_file(&config_path)
        .context(format!(
            "Failed to load configuration from '{}'. \
            If this is your first time running the gateway, copy config.example.toml to config.toml and adjust the values.",
            config_path.display()
        ))?;

    // Initialize tracing/logging
    tracing_init::init_tracing(&config.logging);

    // Build Tokio runtime with configured number of threads
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.num_threads)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    // Run the async main function
    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        port = config.server.port,
        num_threads = config.server.num_threads,
        backend = %config.backend.url,
        oauth_provider = %config.backend.oauth_provider,
        log_level = %config.logging.level,
        log_format = %config.logging.format,
        "Account gateway starting"
    );

    // Create application state (backend clients + controllers)
    let state = AppState::new(config.clone())
        .context("Failed to create application state")?;

    // Probe the hosted backend; a failure is logged but not fatal
    check_backend(&state.auth, &config.backend.url).await;

    // Spawn background session sweeper task
    spawn_session_sweeper(
        Arc::clone(&state.sessions),
        config.session.sweep_interval_seconds,
        config.session.ttl_seconds,
    );

    info!(
        sweep_interval_seconds = config.session.sweep_interval_seconds,
        session_ttl_seconds = config.session.ttl_seconds,
        claim_cooldown_secs = config.points.claim_cooldown_secs,
        "Session sweeper started"
    );

    // Build the router with middleware
    let app = routes::build_router(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG))
                )
        );

    // Start the HTTP server
    let addr = format!("0.0.0.0:{}", config.server.port);
    info!(address = %addr, "Starting TCP listener");

    let listener = TcpListener::bind(&addr).await
        .context(format!("Failed to bind TCP listener to {}", addr))?;

    info!(address = %addr, "Account gateway startup complete");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutting down gracefully");

    Ok(())
}

/// Spawn a background task that periodically drops expired sessions
fn spawn_session_sweeper(sessions: Arc<SessionStore>, sweep_interval: u64, session_ttl: i64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(sweep_interval));

        loop {
            interval.tick().await;

            debug!("Running session sweep");
            let removed = sessions.cleanup_expired(session_ttl, current_timestamp());

            if removed > 0 {
                info!(
                    removed_sessions = removed,
                    active_sessions = sessions.len(),
                    "Session sweep completed"
                );
            } else {
                debug!("Session sweep completed, no expired sessions found");
            }
        }
    });
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
