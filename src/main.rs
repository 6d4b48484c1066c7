use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use jobly_api::config::AppConfig;
use jobly_api::database::{self, MemoryStore, Store};
use jobly_api::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "jobly-api", version, about = "Jobly companies and users API")]
struct Args {
    /// Address to bind (overrides JOBLY_API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides JOBLY_API_PORT / PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Use the in-memory store even if DATABASE_URL is set
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobly_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    config.validate().context("invalid configuration")?;

    tracing::info!("Starting Jobly API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = if args.memory {
        tracing::info!("Using in-memory store (--memory)");
        Arc::new(MemoryStore::new())
    } else {
        database::open_store(&config.database).await.context("failed to open store")?
    };

    let bind_addr = config.bind_addr();
    let app = jobly_api::app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Jobly API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
