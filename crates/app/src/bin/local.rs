// Grow My Team - HTTP server

use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use growteam_app::{body_limit_layer, build_cors_layer, create_app};
use growteam_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging is configured from RUST_LOG inside Config, so it loads first
    let config = Config::from_env().inspect_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .pretty()
        .init();

    info!(?config, "Configuration loaded");
    if !config.secure_cookies {
        warn!("SECURE_COOKIES is off; session cookies will travel over plain HTTP");
    }

    let app = create_app(&config)
        .inspect_err(|e| error!(error = %e, "Failed to create application"))?
        // Applied innermost-first so each layer sees axum's Body type
        // (CorsLayer requires a Default response body); order is unchanged:
        // trace -> cors -> body limit -> routes.
        .layer(body_limit_layer(config.max_upload_bytes))
        .layer(build_cors_layer(config.cors_allowed_origins.as_deref()))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Grow My Team listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
