use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salonkit::cli::{run_command, Cli};
use salonkit::config::Config;
use salonkit::AppState;

/// How often expired sessions and idle wizard drafts are swept
const CLEANUP_INTERVAL: Duration = Duration::from_secs(15 * 60);
/// Wizard drafts untouched for this long are dropped
const WIZARD_MAX_IDLE: Duration = Duration::from_secs(12 * 60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging: --log-level, then RUST_LOG, then the config file
    let filter = match &cli.log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if cli.command.is_some() {
        return run_command(&cli).await;
    }

    tracing::info!("Starting SalonKit v{}", env!("CARGO_PKG_VERSION"));

    // Initialize database
    let db = salonkit::db::init(&config.database).await?;

    // Ensure bootstrap admin user exists
    salonkit::api::auth::ensure_admin_user(
        &db,
        config.auth.admin_email.as_deref(),
        config.auth.admin_password.as_deref(),
    )
    .await?;

    if cli.skip_checks {
        tracing::warn!("Startup self-checks skipped");
    } else {
        let report = salonkit::startup::run_startup_checks(&config, &db).await;
        if !report.all_critical_passed {
            anyhow::bail!("Startup checks failed: {}", report.summary);
        }
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, db));

    spawn_cleanup_task(state.clone());

    let app = salonkit::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn spawn_cleanup_task(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;

            match salonkit::api::auth::purge_expired_sessions(&state.db).await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "Purged expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
            }

            let dropped = state.wizards.cleanup_idle(WIZARD_MAX_IDLE);
            if dropped > 0 {
                tracing::info!(count = dropped, "Dropped idle wizard drafts");
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
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
