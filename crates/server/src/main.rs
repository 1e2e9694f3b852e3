mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::{
    load_config, validate_config, BlobStore, DatasetSource, Enricher, EnricherConfig, FsBlobStore,
    FsQueue, HttpDatasetSource, MetadataApi, OmdbClient, QueueConsumer, QueuePublisher, Selector,
};

use api::create_router;
use state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MARQUEE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully (version {})", VERSION);

    // Compute config hash for startup diagnostics
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Config hash: {}", &config_hash[..16]);

    // Create the dataset source
    let dataset_source = HttpDatasetSource::new(config.dataset.clone())
        .context("Failed to create dataset source")?;
    info!("Dataset source: {}", dataset_source.url());
    let dataset_source: Arc<dyn DatasetSource> = Arc::new(dataset_source);

    // Create the queue; one spool serves both the publisher and consumer
    // sides of this single-node deployment
    let queue = Arc::new(FsQueue::new(config.queue.clone()));
    info!("Queue spool directory: {:?}", queue.spool_dir());
    let publisher: Arc<dyn QueuePublisher> = queue.clone();
    let consumer: Arc<dyn QueueConsumer> = queue.clone();

    // Create the metadata API client
    let metadata_api =
        OmdbClient::new(config.metadata.clone()).context("Failed to create metadata client")?;
    info!("Metadata API client initialized");
    let metadata_api: Arc<dyn MetadataApi> = Arc::new(metadata_api);

    // Create the blob store
    let blob_store = FsBlobStore::new(config.store.clone());
    info!("Blob store root: {:?}", blob_store.root());
    let blob_store: Arc<dyn BlobStore> = Arc::new(blob_store);

    // Wire up the pipeline stages
    let selector = Selector::new(dataset_source, publisher, config.selector.clone());
    let enricher = Enricher::new(
        metadata_api,
        blob_store,
        EnricherConfig {
            date_partition: config.store.date_partition,
        },
    );
    info!(
        "Pipeline ready (top_count: {}, date_partition: {})",
        config.selector.top_count, config.store.date_partition
    );

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), selector, enricher, consumer));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
