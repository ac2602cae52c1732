//! Obstetric AI clinical decision-support service.
//!
//! # Usage
//!
//! ```bash
//! # Run with the default corpus and config search order
//! cargo run --release
//!
//! # Point at a specific corpus and address
//! cargo run --release -- --corpus data/knowledge-chunks.json --addr 0.0.0.0:9090
//! ```
//!
//! # Environment Variables
//!
//! - `OBS_CONFIG`: Path to a TOML configuration file
//! - `OBS_CORPUS_PATH`: Knowledge corpus JSON (ingestion pipeline output)
//! - `OBS_FHIR_BASE_URL`: Clinical-records service base address
//! - `OBS_AUTH_SECRET`: Session token secret (at least 32 bytes)
//! - `OBS_CORS_ORIGINS`: Comma-separated allowed CORS origins (dev only)
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use obstetric_ai::api::{self, ApiState};
use obstetric_ai::config::{self, AppConfig};
use obstetric_ai::retrieval::{ChunkStore, RetrievalEngine};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "obstetric-ai")]
#[command(about = "Obstetric AI Clinical Decision-Support Service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to a TOML configuration file (wins over OBS_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the knowledge corpus JSON produced by the ingestion pipeline
    #[arg(long)]
    corpus: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    // Resolve configuration once; CLI flags win over file and env
    let mut app_config = AppConfig::load(args.config.as_deref());
    if let Some(addr) = args.addr {
        app_config.server.addr = addr;
    }
    if let Some(corpus) = args.corpus {
        app_config.corpus.path = corpus;
    }
    app_config.validate();
    config::init(app_config);
    let cfg = config::get();

    // Build the retrieval engine — a corpus that fails validation is fatal,
    // the engine must not serve from it
    let store = ChunkStore::load(&cfg.corpus.path).with_context(|| {
        format!(
            "loading knowledge corpus from {}",
            cfg.corpus.path.display()
        )
    })?;
    info!(
        chunks = store.size(),
        path = %cfg.corpus.path.display(),
        "retrieval engine ready"
    );
    let engine = Arc::new(RetrievalEngine::new(Arc::new(store)));

    let app = api::create_app(ApiState::new(engine));

    let listener = tokio::net::TcpListener::bind(&cfg.server.addr)
        .await
        .with_context(|| format!("binding {}", cfg.server.addr))?;
    info!(addr = %cfg.server.addr, "serving");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => error!(error = %e, "failed to listen for shutdown signal"),
    }
}
