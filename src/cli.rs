//! Bootstrap helpers shared by the `petchain` binary

use crate::config::{load_config, Config};
use crate::error::ChainError;
use crate::persistence::JsonFilePersistence;
use crate::service::{PetService, ServiceSettings};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second install (tests, embedding) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Open a service over the JSON store named by `config`.
pub fn open_service(config: &Config) -> Result<PetService, ChainError> {
    let persistence = Arc::new(JsonFilePersistence::from_config(&config.storage));
    let service = PetService::open(ServiceSettings::from_config(config), persistence)?;
    info!(
        "Opened ledger in {} (difficulty {})",
        config.storage.data_dir.display(),
        config.chain.difficulty
    );
    Ok(service)
}

/// Load the config at `config_path` and open a service over it.
pub fn load_service(config_path: &Path) -> Result<(Config, PetService), ChainError> {
    let config = load_config(config_path)?;
    let service = open_service(&config)?;
    Ok((config, service))
}

/// Abbreviate a hash for table display. Counts characters, not bytes, since
/// stored hashes are not checked on load.
pub fn short_hash(hash: &str) -> String {
    if hash.chars().count() > 16 {
        format!("{}...", hash.chars().take(13).collect::<String>())
    } else {
        hash.to_string()
    }
}
