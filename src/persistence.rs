//! JSON file persistence for the ledger and the pet registry
//!
//! Blocks are stored exactly as held in memory; nothing is recomputed on
//! load. Integrity is only checked when the ledger is validated.

use crate::blockchain::{Ledger, PetRegistry};
use crate::config::StorageConfig;
use crate::error::ChainError;
use crate::pet::Pet;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Abstraction for persistence backends.
pub trait Persistence: Send + Sync {
    fn load_ledger(&self) -> Result<Ledger, ChainError>;
    fn save_ledger(&self, ledger: &Ledger) -> Result<(), ChainError>;
    fn load_registry(&self) -> Result<PetRegistry, ChainError>;
    fn save_registry(&self, registry: &PetRegistry) -> Result<(), ChainError>;
}

/// Three JSON documents: the block list, pets by id, and mint hashes by pet id.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    blockchain_path: PathBuf,
    pets_path: PathBuf,
    pet_hashes_path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(
        blockchain_path: impl Into<PathBuf>,
        pets_path: impl Into<PathBuf>,
        pet_hashes_path: impl Into<PathBuf>,
    ) -> Self {
        JsonFilePersistence {
            blockchain_path: blockchain_path.into(),
            pets_path: pets_path.into(),
            pet_hashes_path: pet_hashes_path.into(),
        }
    }

    pub fn from_config(storage: &StorageConfig) -> Self {
        Self::new(
            storage.blockchain_path(),
            storage.pets_path(),
            storage.pet_hashes_path(),
        )
    }

    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::from_config(&StorageConfig {
            data_dir: dir.to_path_buf(),
            ..StorageConfig::default()
        })
    }
}

/// Read a JSON document; a missing or blank file yields `T::default()`.
fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ChainError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("{} not found, starting empty", path.display());
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        info!("{} is empty, starting empty", path.display());
        return Ok(T::default());
    }

    Ok(serde_json::from_str(&content)?)
}

/// Write pretty JSON through a uniquely named temporary file in the target
/// directory and an atomic rename over `path`.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ChainError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(value)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.as_file().sync_all()?;

    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl Persistence for JsonFilePersistence {
    fn load_ledger(&self) -> Result<Ledger, ChainError> {
        let ledger: Ledger = read_json(&self.blockchain_path)?;
        info!("Blockchain loaded successfully. Blocks: {}", ledger.len());
        Ok(ledger)
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<(), ChainError> {
        write_json_atomic(&self.blockchain_path, ledger)?;
        info!("Blockchain saved successfully. Blocks: {}", ledger.len());
        Ok(())
    }

    fn load_registry(&self) -> Result<PetRegistry, ChainError> {
        let pets: HashMap<String, Pet> = read_json(&self.pets_path)?;
        let mint_hashes: HashMap<String, String> = read_json(&self.pet_hashes_path)?;
        let registry = PetRegistry::from_parts(pets, mint_hashes);
        info!("Pet registry loaded successfully. Pets: {}", registry.len());
        Ok(registry)
    }

    fn save_registry(&self, registry: &PetRegistry) -> Result<(), ChainError> {
        let pets: BTreeMap<&String, &Pet> = registry.pets().iter().collect();
        let mint_hashes: BTreeMap<&String, &String> = registry.mint_hashes().iter().collect();
        write_json_atomic(&self.pets_path, &pets)?;
        write_json_atomic(&self.pet_hashes_path, &mint_hashes)?;
        info!("Pet registry saved successfully. Pets: {}", registry.len());
        Ok(())
    }
}

/// Keeps the last saved state in memory; used by tests and throwaway runs.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    ledger: Mutex<Ledger>,
    registry: Mutex<PetRegistry>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for InMemoryPersistence {
    fn load_ledger(&self) -> Result<Ledger, ChainError> {
        Ok(self.ledger.lock().clone())
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<(), ChainError> {
        *self.ledger.lock() = ledger.clone();
        Ok(())
    }

    fn load_registry(&self) -> Result<PetRegistry, ChainError> {
        Ok(self.registry.lock().clone())
    }

    fn save_registry(&self, registry: &PetRegistry) -> Result<(), ChainError> {
        *self.registry.lock() = registry.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::Block;
    use crate::derivation::PetTraits;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn sample_registry() -> PetRegistry {
        let traits = PetTraits {
            category: "Fox",
            color: "Cyan",
            rarity: 4,
        };
        let mut registry = PetRegistry::new();
        registry.insert(Pet::mint("p1", "Rusty", traits, "alice", 10), "00aa");
        registry
    }

    #[test]
    fn test_missing_files_load_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFilePersistence::in_dir(dir.path());
        assert!(store.load_ledger().unwrap().is_empty());
        assert!(store.load_registry().unwrap().is_empty());
    }

    #[test]
    fn test_blank_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blockchain.json"), "  \n").unwrap();
        let store = JsonFilePersistence::in_dir(dir.path());
        assert!(store.load_ledger().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_keeps_stored_hashes() {
        let dir = TempDir::new().unwrap();
        let store = JsonFilePersistence::in_dir(dir.path());

        let mut tampered = Block::with_timestamp("payload", "0", 42);
        tampered.payload = "changed after hashing".to_string();
        let ledger = Ledger::from_blocks(vec![tampered.clone()]);

        store.save_ledger(&ledger).unwrap();
        let loaded = store.load_ledger().unwrap();

        assert_eq!(loaded, ledger);
        assert_eq!(loaded.all_blocks()[0].hash, tampered.hash);
        assert!(!loaded.all_blocks()[0].has_valid_hash());
    }

    #[test]
    fn test_registry_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFilePersistence::in_dir(&dir.path().join("nested"));
        let registry = sample_registry();

        store.save_registry(&registry).unwrap();
        assert_eq!(store.load_registry().unwrap(), registry);

        let raw = fs::read_to_string(dir.path().join("nested").join("pets.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["p1"]["type"], "Fox");
        assert_eq!(json["p1"]["owner"], "alice");
    }

    #[test]
    fn test_concurrent_saves_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFilePersistence::in_dir(dir.path()));
        let registry = sample_registry();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        store.save_registry(&registry).unwrap();
                        store.save_ledger(&Ledger::new()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load_registry().unwrap(), registry);
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| !name.to_string_lossy().ends_with(".json"))
            .collect();
        assert!(leftovers.is_empty(), "stray temp files: {:?}", leftovers);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blockchain.json"), "{ nope").unwrap();
        let store = JsonFilePersistence::in_dir(dir.path());
        assert!(matches!(
            store.load_ledger(),
            Err(ChainError::SerializationError(_))
        ));
    }

    #[test]
    fn test_in_memory_backend() {
        let store = InMemoryPersistence::new();
        let registry = sample_registry();
        store.save_registry(&registry).unwrap();
        assert_eq!(store.load_registry().unwrap(), registry);
        assert!(store.load_ledger().unwrap().is_empty());
    }
}
