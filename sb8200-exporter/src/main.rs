// SB8200 Exporter - Prometheus exporter for SB8200 cable modems
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # SB8200 Exporter
//!
//! Prometheus exporter for the Arris SB8200 cable modem status page.
//! Every `/metrics` request scrapes the modem afresh.
//!
//! ## Usage
//!
//! ```bash
//! # Serve metrics for the default modem address
//! sb8200-exporter --port 9200
//!
//! # Authenticated firmware over HTTPS
//! SB8200_PASSWORD=secret sb8200-exporter --scheme https
//!
//! # Print a single scrape and exit
//! sb8200-exporter --once
//!
//! # Dump the collected observations as JSON
//! sb8200-exporter --once --json
//! ```

mod client;
mod config;
mod error;
mod metrics;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use clap::Parser;
use client::{is_login_page, DeviceClient};
use config::{ExporterConfig, Scheme};
use error::Result;
use metrics::{content_type, FamilyRegistry};
use sb8200::{Collector, Labels, Observation};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// SB8200 Prometheus Exporter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "9200")]
    port: u16,

    /// Modem address (host or host:port)
    #[arg(short, long, env = "SB8200_ADDRESS", default_value = "192.168.100.1")]
    address: String,

    /// URL scheme used to reach the modem
    #[arg(long, value_enum, default_value_t = Scheme::Http)]
    scheme: Scheme,

    /// Username for the modem's web interface
    #[arg(short, long, env = "SB8200_USERNAME", default_value = "admin")]
    username: String,

    /// Password for the modem's web interface (no login when unset)
    #[arg(long, env = "SB8200_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Metric name prefix
    #[arg(long, default_value = sb8200::DEFAULT_PREFIX)]
    prefix: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Skip unrecognized tables instead of failing the scrape
    #[arg(long)]
    ignore_unknown_tables: bool,

    /// Scrape once, print the metrics and exit
    #[arg(long)]
    once: bool,

    /// With --once, print the observations as JSON instead
    #[arg(long, requires = "once")]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn exporter_config(&self) -> ExporterConfig {
        ExporterConfig {
            address: self.address.clone(),
            scheme: self.scheme,
            username: self.username.clone(),
            password: self.password.clone(),
            prefix: self.prefix.clone(),
            timeout: Duration::from_secs(self.timeout),
            ignore_unknown_tables: self.ignore_unknown_tables,
        }
    }
}

/// Application state shared across handlers.
///
/// Immutable: each scrape builds its own collector output and registry.
struct AppState {
    client: DeviceClient,
    collector: Collector,
    start_time: Instant,
}

impl AppState {
    fn new(config: ExporterConfig) -> Result<Self> {
        let collector = Collector::with_config(config.collector_config());
        Ok(Self {
            client: DeviceClient::new(config)?,
            collector,
            start_time: Instant::now(),
        })
    }

    /// Fetch the status page and collect its observations
    async fn observe(&self) -> Result<Vec<Observation>> {
        let page = self.client.fetch_page().await?;
        observe_page(&self.collector, &page)
    }

    /// Run one collection cycle and encode it
    async fn scrape(&self) -> Result<String> {
        let start = Instant::now();
        let observations = self.observe().await?;
        let elapsed = start.elapsed().as_secs_f64();

        debug!(
            "Collected {} observations in {:.3}s",
            observations.len(),
            elapsed
        );

        let mut registry = FamilyRegistry::new();
        registry.register_all(&observations)?;
        registry.register(
            &Observation::gauge(
                self.client.config().scrape_duration_name(),
                elapsed,
                Labels::new(),
            )
            .with_documentation("Duration of the modem status page scrape in seconds"),
        )?;
        registry.encode()
    }
}

/// Collect a fetched page. A login page means no data this cycle.
fn observe_page(collector: &Collector, page: &str) -> Result<Vec<Observation>> {
    if is_login_page(page) {
        warn!("Received login page, check username / password");
        return Ok(Vec::new());
    }
    Ok(collector.collect_page(page)?)
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(args).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.exporter_config();
    let state = Arc::new(AppState::new(config)?);

    if args.once {
        if args.json {
            let observations = state.observe().await?;
            println!("{}", serde_json::to_string_pretty(&observations)?);
        } else {
            print!("{}", state.scrape().await?);
        }
        return Ok(());
    }

    info!("SB8200 Exporter v{}", env!("CARGO_PKG_VERSION"));
    info!("Scraping {}", state.client.config().status_url());

    // Build router
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting server on http://{}", addr);
    info!("Metrics endpoint: http://{}/metrics", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Root handler - shows a simple HTML page.
async fn root_handler() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>SB8200 Exporter</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; }
        h1 { color: #2c3e50; }
        a { color: #3498db; text-decoration: none; }
        a:hover { text-decoration: underline; }
        .endpoints { background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0; }
        .endpoint { margin: 10px 0; }
        code { background: #e9ecef; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>SB8200 Exporter</h1>
    <p>Prometheus exporter for the Arris SB8200 cable modem status page.</p>

    <div class="endpoints">
        <h2>Endpoints</h2>
        <div class="endpoint"><a href="/metrics">/metrics</a> - Prometheus metrics (scrapes the modem)</div>
        <div class="endpoint"><a href="/health">/health</a> - Health check</div>
        <div class="endpoint"><a href="/status">/status</a> - Status information (JSON)</div>
    </div>

    <h2>Metrics</h2>
    <ul>
        <li><code>sb8200_downstream_*</code> - Per downstream channel (power, snr_mer, corrected, uncorrectables)</li>
        <li><code>sb8200_downstream_state</code> - Downstream channel lock status and modulation</li>
        <li><code>sb8200_upstream_*</code> - Per upstream channel (power)</li>
        <li><code>sb8200_upstream_state</code> - Upstream channel lock status, type and symbol rate</li>
        <li><code>sb8200_state</code> - Startup procedure status</li>
        <li><code>sb8200_exporter_scrape_duration_seconds</code> - Scrape duration</li>
    </ul>
</body>
</html>"#,
    )
}

/// Metrics handler - scrapes the modem and returns Prometheus text format.
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.scrape().await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Scrape failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Status information response.
#[derive(Serialize)]
struct StatusResponse {
    version: String,
    uptime_secs: u64,
    device: String,
    prefix: String,
    authenticated: bool,
}

/// Status handler - returns JSON status information.
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let config = state.client.config();
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        device: config.status_url(),
        prefix: config.prefix.clone(),
        authenticated: config.authenticated(),
    })
}
