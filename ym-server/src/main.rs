//! ym-server binary

use tokio_util::sync::CancellationToken;
use ym_server::ranking::ResetScheduler;
use ym_server::{AppState, Config, api};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ym_server=info,tower_http=info".into());
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = Config::from_env()?;

    tracing::info!(
        "Starting ym-server (env: {}, reset guard: {})",
        config.environment,
        if config.reset_guard_enabled { "on" } else { "off" }
    );

    let state = AppState::new(&config).await?;
    let shutdown = CancellationToken::new();

    let scheduler_handle = if config.reset_scheduler_enabled {
        let scheduler = ResetScheduler::new(state.clone(), shutdown.clone());
        Some(tokio::spawn(scheduler.run()))
    } else {
        None
    };

    let app = api::build_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("ym-server HTTP listening on {http_addr}");

    let signal_token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            signal_token.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Some(handle) = scheduler_handle {
        handle.await?;
    }

    tracing::info!("ym-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
