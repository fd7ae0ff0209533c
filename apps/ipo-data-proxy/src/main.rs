//! IPO Data Proxy Binary
//!
//! Starts the public API and the health server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin ipo-data-proxy
//! ```
//!
//! # Environment Variables
//!
//! ## Required for proxying
//! - `FINNHUB_API_KEY`: Upstream API key (requests fail with 500 until set)
//!
//! ## Optional
//! - `MARKET_DATA_BASE_URL`: Upstream base URL (default: <https://finnhub.io/api/v1>)
//! - `IPO_PROXY_HTTP_PORT`: API port (default: 3000)
//! - `IPO_PROXY_HEALTH_PORT`: Health check HTTP port (default: 8082)
//! - `IPO_PROXY_CACHE_TTL_SECS`: Cache freshness window (default: 3600)
//! - `IPO_PROXY_UPSTREAM_TIMEOUT_SECS`: Upstream deadline, 0 = none (default: 0)
//! - `OTEL_ENABLED`: Enable OpenTelemetry export (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4318>)
//! - `OTEL_SERVICE_NAME`: Service name (default: ipo-data-proxy)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use ipo_data_proxy::infrastructure::telemetry;
use ipo_data_proxy::{
    AppState, HealthServer, HealthServerState, MarketDataService, ProxyConfig, ResponseCache,
    UpstreamClient, create_router, init_metrics,
};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let _telemetry_guard = telemetry::init();

    tracing::info!("Starting IPO data proxy");

    let _metrics_handle = init_metrics();

    let config = ProxyConfig::from_env().context("invalid configuration")?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    let upstream = UpstreamClient::new(&config.upstream).context("failed to build upstream client")?;
    let market_data = Arc::new(MarketDataService::new(
        Arc::new(upstream),
        config.api_key(),
        ResponseCache::new(config.cache.ttl),
    ));

    // Health server
    let health_state = Arc::new(HealthServerState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        Arc::clone(&market_data),
    ));
    let health_server = HealthServer::new(
        config.server.health_port,
        health_state,
        shutdown_token.clone(),
    );
    tokio::spawn(async move {
        if let Err(e) = health_server.run().await {
            tracing::error!(error = %e, "Health server error");
        }
    });

    // Public API
    let app = create_router(AppState::new(market_data));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind API port {}", config.server.http_port))?;

    tracing::info!(addr = %addr, "API server listening");

    let api_shutdown = shutdown_token.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(api_shutdown.cancelled_owned())
            .await
    });

    await_shutdown(shutdown_token).await;

    server
        .await
        .context("API server task panicked")?
        .context("API server error")?;

    tracing::info!("IPO data proxy stopped");
    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &ProxyConfig) {
    tracing::info!(
        http_port = config.server.http_port,
        health_port = config.server.health_port,
        cache_ttl_secs = config.cache.ttl.as_secs(),
        upstream = %config.upstream.base_url,
        "Configuration loaded"
    );
    if config.credentials.is_none() {
        tracing::warn!("FINNHUB_API_KEY is not set; proxy requests will fail until it is configured");
    }
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
