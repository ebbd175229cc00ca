//! voxcheckd - HTTP service for synthetic-speech detection.

mod server;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// HTTP service for synthetic-speech detection.
#[derive(Parser, Debug)]
#[command(name = "voxcheckd")]
#[command(about = "HTTP service for synthetic-speech detection")]
struct Args {
    /// Listen address (e.g. :8080 or 127.0.0.1:9000)
    #[arg(long, default_value = ":8080")]
    addr: String,

    /// Path to the classifier artifact (JSON random forest)
    #[arg(long, env = "VOXCHECKD_MODEL", default_value = "models/voice_detector.json")]
    model: PathBuf,

    /// API key for /api/voice-detection
    #[arg(long, env = "VOXCHECKD_API_KEY")]
    api_key: String,

    /// Comma-separated allowed CORS origins (empty disables CORS)
    #[arg(long, env = "VOXCHECKD_CORS_ORIGINS", default_value = "")]
    cors_origins: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let state = state::AppState::new(args.model.clone(), args.api_key);

    let mut app = server::router(state);
    if let Some(cors) = server::cors_layer(&args.cors_origins) {
        app = app.layer(cors);
    }

    let addr = parse_addr(&args.addr)?;
    tracing::info!("listening on http://{addr}, model artifact {}", args.model.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse address string to SocketAddr, treating ":8080" as all interfaces.
fn parse_addr(addr: &str) -> Result<SocketAddr> {
    let addr = if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    };
    Ok(addr.parse()?)
}
