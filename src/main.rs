//! FitLife API Server
//!
//! Run with: cargo run --bin fitlife
//!
//! # Configuration
//!
//! Settings come from `config.toml` (see `fitlife-cli config`) with
//! environment overrides:
//! - `FITLIFE_DATA_DIR`: Directory holding fitlife.db
//! - `FITLIFE_STORAGE_BACKEND`: `memory` or `sqlite`
//! - `FITLIFE_API_HOST` / `FITLIFE_API_PORT`: Bind address
//! - `API_KEY` (or `GEMINI_API_KEY`): Enables the generative text service
//! - `FITLIFE_LOG_LEVEL` / `FITLIFE_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Overrides the log filter entirely

use anyhow::Context;
use fitlife::ai::AiService;
use fitlife::config::StorageBackendKind;
use fitlife::store::{KeyValueBackend, LocalStore, MemoryBackend, SqliteBackend};
use fitlife::{serve, AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();

    init_tracing(&config);

    tracing::info!("Starting FitLife API server v{}", env!("CARGO_PKG_VERSION"));

    let backend = open_backend(&config)?;
    let store = LocalStore::with_prefix(backend, config.storage.app_prefix.clone());

    let ai = AiService::from_config(&config.ai);

    let state = AppState::new(store, ai, config);
    serve(state).await?;

    tracing::info!("FitLife API server stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("fitlife={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn open_backend(config: &Config) -> anyhow::Result<Arc<dyn KeyValueBackend>> {
    let quota = config.storage.quota_bytes;

    match config.storage.backend {
        StorageBackendKind::Memory => {
            tracing::info!("Using in-memory storage (data is lost on exit)");
            let backend = match quota {
                Some(bytes) => MemoryBackend::with_quota(bytes),
                None => MemoryBackend::new(),
            };
            Ok(Arc::new(backend))
        }
        StorageBackendKind::Sqlite => {
            let data_dir = config.storage.data_dir_path();
            std::fs::create_dir_all(&data_dir)
                .with_context(|| format!("creating data directory {}", data_dir.display()))?;
            let path = config.storage.database_path();
            tracing::info!("Data file: {:?}", path);
            let backend = SqliteBackend::open(&path)
                .with_context(|| format!("opening {}", path.display()))?
                .quota(quota);
            Ok(Arc::new(backend))
        }
    }
}
