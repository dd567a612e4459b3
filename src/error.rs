//! Error types for PetChain

use crate::blockchain::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Pet with ID {0} does not exist")]
    PetNotFound(String),
    #[error("Pet {pet_id} is not owned by {claimed} (owner is {actual})")]
    OwnershipMismatch {
        pet_id: String,
        claimed: String,
        actual: String,
    },
    #[error("Cannot trade pet to the same owner ({0})")]
    SameOwnerTrade(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),
    #[error("Difficulty {0} exceeds the digest length of 64")]
    InvalidDifficulty(u32),
    #[error("Mining gave up after {attempts} attempts")]
    MiningExhausted { attempts: u64 },
    #[error("Chain validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
