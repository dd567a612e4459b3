//! Configuration management for PetChain

use crate::blockchain::ValidationPolicy;
use crate::crypto::DIGEST_HEX_LEN;
use crate::error::ChainError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    /// Cap on hashes tried per block; absent means mine until found.
    #[serde(default)]
    pub max_mining_iterations: Option<u64>,
    #[serde(default = "default_true")]
    pub verify_genesis: bool,
}

impl ChainConfig {
    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            verify_genesis: self.verify_genesis,
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            max_mining_iterations: None,
            verify_genesis: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_blockchain_file")]
    pub blockchain_file: String,
    #[serde(default = "default_pets_file")]
    pub pets_file: String,
    #[serde(default = "default_pet_hashes_file")]
    pub pet_hashes_file: String,
    /// Save ledger and registry after every successful create or trade.
    #[serde(default = "default_true")]
    pub persist_on_write: bool,
}

impl StorageConfig {
    pub fn blockchain_path(&self) -> PathBuf {
        self.data_dir.join(&self.blockchain_file)
    }

    pub fn pets_path(&self) -> PathBuf {
        self.data_dir.join(&self.pets_file)
    }

    pub fn pet_hashes_path(&self) -> PathBuf {
        self.data_dir.join(&self.pet_hashes_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            blockchain_file: default_blockchain_file(),
            pets_file: default_pets_file(),
            pet_hashes_file: default_pet_hashes_file(),
            persist_on_write: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self, ChainError> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ChainError> {
        if self.chain.difficulty as usize > DIGEST_HEX_LEN {
            return Err(ChainError::ConfigError(format!(
                "chain.difficulty must be at most {}, got {}",
                DIGEST_HEX_LEN, self.chain.difficulty
            )));
        }

        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ChainError::ConfigError(
                "storage.data_dir must not be empty".to_string(),
            ));
        }

        for (key, value) in [
            ("storage.blockchain_file", &self.storage.blockchain_file),
            ("storage.pets_file", &self.storage.pets_file),
            ("storage.pet_hashes_file", &self.storage.pet_hashes_file),
        ] {
            if value.trim().is_empty() {
                return Err(ChainError::ConfigError(format!("{} must not be empty", key)));
            }
        }

        Ok(())
    }
}

/// Load `path`, falling back to defaults when the file is absent or empty.
pub fn load_config(path: &Path) -> Result<Config, ChainError> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    Config::from_toml(&source)
}

fn default_difficulty() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_blockchain_file() -> String {
    "blockchain.json".to_string()
}

fn default_pets_file() -> String {
    "pets.json".to_string()
}

fn default_pet_hashes_file() -> String {
    "pet_blockhash.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
