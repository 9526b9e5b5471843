//! Agriculture Vision API Server
//!
//! HTTP front end for the analysis facade: accepts an image and an analysis
//! mode, returns the structured diagnostic report.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use agrivision::{AgricultureAnalyzer, AnalyzerConfig, Error, ImageInput};

/// Agriculture Vision API Server
#[derive(Parser, Debug)]
#[command(name = "agrivision-server")]
#[command(version)]
#[command(about = "HTTP API server for plant disease analysis")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Path to the model weights file
    #[arg(long, env = "AGRIVISION_WEIGHTS")]
    weights: Option<PathBuf>,
}

/// Shared application state
struct AppState {
    analyzer: AgricultureAnalyzer,
    started_at: Instant,
}

type SharedState = Arc<AppState>;

#[derive(Deserialize)]
struct AnalyzeRequest {
    /// Base64 data URI of the image to analyze
    image: Option<String>,
    /// Analysis mode; defaults to plant-disease
    #[serde(rename = "type")]
    analysis_type: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    uptime_seconds: u64,
    version: String,
    degraded_model: bool,
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        degraded_model: state.analyzer.is_degraded(),
    })
}

/// POST /api/agriculture/analyze - Analyze an uploaded image
async fn analyze(
    State(state): State<SharedState>,
    Json(request): Json<AnalyzeRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(image) = request.image else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No image provided" })),
        );
    };

    match state
        .analyzer
        .analyze(ImageInput::DataUri(image), request.analysis_type.as_deref())
    {
        Ok(report) => match serde_json::to_value(&report) {
            Ok(body) => (StatusCode::OK, Json(body)),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            ),
        },
        Err(Error::UnsupportedMode(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid analysis type" })),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let mut config = AnalyzerConfig::default();
    if let Some(weights) = cli.weights {
        config.classifier.weights_path = weights;
    }

    info!("Agriculture Vision API Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Weights path: {:?}", config.classifier.weights_path);

    // Load the classifier once; requests share it read-only
    let state = Arc::new(AppState {
        analyzer: AgricultureAnalyzer::new(&config),
        started_at: Instant::now(),
    });

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/agriculture/analyze", post(analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
