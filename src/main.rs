use std::process::ExitCode;
use std::sync::Arc;

use timetravel::config::{Config, StoreLocation};
use timetravel::{http, InMemoryVersionStore, RecordService, SqliteVersionStore, VersionStore};

/// Initialize the global `tracing` subscriber with an `EnvFilter`.
///
/// Reads `RUST_LOG`; defaults to `"info"` when unset.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn run<S: VersionStore + 'static>(store: S, config: &Config) -> ExitCode {
    let service = Arc::new(RecordService::new(store));
    match http::serve(service, config.listen_addr).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.listen_addr, "server failed");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        listen_addr = %config.listen_addr,
        versioning = %config.versioning,
        "starting timetravel"
    );

    match &config.store {
        StoreLocation::InMemory => {
            tracing::warn!("using in-memory store; records are lost on exit");
            run(InMemoryVersionStore::with_strategy(config.versioning), &config).await
        }
        StoreLocation::File(path) => match SqliteVersionStore::open(path, config.versioning) {
            Ok(store) => run(store, &config).await,
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "failed to open store");
                ExitCode::FAILURE
            }
        },
    }
}
