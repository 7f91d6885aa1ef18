//! Filings Lens Server
//!
//! Serves the document analysis workflow over HTTP:
//!
//! - Document intake and text extraction (file, pasted text, peer filing)
//! - Peer benchmarking against an extracted peer filing
//! - Compliance questions against the primary filing
//!
//! ## Architecture
//!
//! Each browser gets a session (`POST /api/sessions`, then the
//! `x-session-id` header). Page routes return JSON views of that session's
//! state. Analysis runs in the background behind the `AnalysisProvider`
//! trait; clients poll the page route until the loading flag clears.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Router,
};
use clap::Parser;
use filings_core::{AnalysisProvider, Latencies, MockAnalysisProvider};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod sessions;
#[cfg(test)]
mod tests;

use api::{
    handle_accept_file, handle_ask, handle_benchmarking_page, handle_catalog, handle_compliance_page,
    handle_continue, handle_create_session, handle_extract_file, handle_extract_paste,
    handle_extract_peer, handle_health, handle_landing, handle_not_found, handle_remove_file,
    handle_run_benchmark, handle_set_compliance_filing_type, handle_set_focus_style,
    handle_set_input_mode, handle_set_question, handle_set_tab, handle_set_upload_filing_type,
    handle_toggle_preview, handle_upload_page,
};
use sessions::SessionRegistry;

/// How often idle sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Command-line arguments for the Filings Lens server
#[derive(Parser, Debug)]
#[command(name = "filings-server")]
#[command(about = "Filings Lens server for document intake, benchmarking and compliance review")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Simulated extraction time for uploaded or pasted text, in milliseconds
    #[arg(long, default_value = "1500")]
    extraction_ms: u64,

    /// Simulated peer filing extraction time, in milliseconds
    #[arg(long, default_value = "1500")]
    peer_extraction_ms: u64,

    /// Simulated benchmarking time, in milliseconds
    #[arg(long, default_value = "3000")]
    benchmark_ms: u64,

    /// Simulated compliance answer time, in milliseconds
    #[arg(long, default_value = "2500")]
    compliance_ms: u64,

    /// Minutes a session may sit idle before it is dropped
    #[arg(long, default_value = "30")]
    session_idle_mins: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn latencies(&self) -> Latencies {
        Latencies {
            extraction: Duration::from_millis(self.extraction_ms),
            peer_extraction: Duration::from_millis(self.peer_extraction_ms),
            benchmark: Duration::from_millis(self.benchmark_ms),
            compliance: Duration::from_millis(self.compliance_ms),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Analysis backend shared by every session
    pub provider: Arc<dyn AnalysisProvider>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            provider,
            sessions: Arc::new(SessionRegistry::default()),
        }
    }
}

/// Every route, without rate limiting
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Pages
        .route("/", get(handle_landing))
        .route("/upload", get(handle_upload_page))
        .route("/benchmarking", get(handle_benchmarking_page))
        .route("/compliance", get(handle_compliance_page))
        // API endpoints
        .route("/api/catalog", get(handle_catalog))
        .route("/api/sessions", post(handle_create_session))
        .route(
            "/api/upload/file",
            post(handle_accept_file).delete(handle_remove_file),
        )
        .route("/api/upload/extract", post(handle_extract_file))
        .route("/api/upload/paste", post(handle_extract_paste))
        .route("/api/upload/peer", post(handle_extract_peer))
        .route("/api/upload/tab", put(handle_set_tab))
        .route("/api/upload/input-mode", put(handle_set_input_mode))
        .route("/api/upload/focus-style", put(handle_set_focus_style))
        .route("/api/upload/filing-type", put(handle_set_upload_filing_type))
        .route("/api/upload/continue", post(handle_continue))
        .route("/api/benchmarking/run", post(handle_run_benchmark))
        .route("/api/compliance/question", put(handle_set_question))
        .route("/api/compliance/ask", post(handle_ask))
        .route("/api/compliance/preview", post(handle_toggle_preview))
        .route(
            "/api/compliance/filing-type",
            put(handle_set_compliance_filing_type),
        )
        .fallback(handle_not_found)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Filings Lens server on {}:{}", args.host, args.port);

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit: {}", args.rate_limit))?,
    );

    let latencies = args.latencies();
    let state = AppState::new(Arc::new(MockAnalysisProvider::new(latencies)));

    // Evict idle sessions in the background
    let idle = Duration::from_secs(args.session_idle_mins * 60);
    let sessions = Arc::clone(&state.sessions);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sessions.cleanup(idle).await;
        }
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Apply middleware
    let app = router(state)
        .layer(GovernorLayer {
            config: governor_conf,
        })
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Simulated latencies: {:?}", latencies);
    info!("Sessions expire after {} idle minutes", args.session_idle_mins);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
