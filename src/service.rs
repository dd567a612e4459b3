//! Pet service: the context object that owns the ledger and the registry
//!
//! Every mutation holds the write lock from reading the head hash until the
//! sealed block is appended and the registry updated, so two creators can
//! never link against the same head. Reads share the read lock.

use crate::blockchain::{
    now_millis, Block, Ledger, PetRegistry, ValidationError, ValidationPolicy,
};
use crate::config::Config;
use crate::crypto;
use crate::derivation::PetTraits;
use crate::error::ChainError;
use crate::history::LedgerProjector;
use crate::miner::Miner;
use crate::persistence::Persistence;
use crate::pet::Pet;
use crate::transaction::{encode, CreatePetTx, TradePetTx, Transaction, TxPayload};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Mining and validation parameters shared by every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    pub difficulty: u32,
    pub miner: Miner,
    pub policy: ValidationPolicy,
    pub persist_on_write: bool,
}

impl ServiceSettings {
    pub fn with_difficulty(difficulty: u32) -> Self {
        ServiceSettings {
            difficulty,
            miner: Miner::new(),
            policy: ValidationPolicy::default(),
            persist_on_write: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        ServiceSettings {
            difficulty: config.chain.difficulty,
            miner: Miner::with_limit(config.chain.max_mining_iterations),
            policy: config.chain.validation_policy(),
            persist_on_write: config.storage.persist_on_write,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStats {
    pub total_pets: usize,
    pub total_owners: usize,
    pub total_transactions: usize,
    pub blockchain_size: usize,
    pub difficulty: u32,
    pub blockchain_valid: bool,
}

#[derive(Debug, Default)]
struct ServiceState {
    ledger: Ledger,
    registry: PetRegistry,
}

#[derive(Clone)]
pub struct PetService {
    state: Arc<RwLock<ServiceState>>,
    settings: ServiceSettings,
    persistence: Option<Arc<dyn Persistence>>,
}

impl PetService {
    /// A service with no backing store.
    pub fn new(ledger: Ledger, registry: PetRegistry, settings: ServiceSettings) -> Self {
        PetService {
            state: Arc::new(RwLock::new(ServiceState { ledger, registry })),
            settings,
            persistence: None,
        }
    }

    /// Load ledger and registry from `persistence` and keep it for later saves.
    pub fn open(settings: ServiceSettings, persistence: Arc<dyn Persistence>) -> Result<Self, ChainError> {
        let ledger = persistence.load_ledger()?;
        let registry = persistence.load_registry()?;
        info!(
            "Service ready: {} blocks, {} pets, difficulty {}",
            ledger.len(),
            registry.len(),
            settings.difficulty
        );

        let mut service = Self::new(ledger, registry, settings);
        service.persistence = Some(persistence);
        Ok(service)
    }

    pub fn settings(&self) -> ServiceSettings {
        self.settings
    }

    pub fn difficulty(&self) -> u32 {
        self.settings.difficulty
    }

    /// Mint a pet for `owner` and record it in a freshly sealed block.
    ///
    /// A save failure after the block is appended is returned as an error,
    /// but the in-memory ledger and registry keep the new pet; [`PetService::save`]
    /// retries the write.
    pub fn create_pet(&self, owner: &str, name: &str) -> Result<Pet, ChainError> {
        let mut state = self.state.write();

        let now = now_millis();
        let tx = CreatePetTx::new(crypto::pet_id(owner, name, now), owner, name, now);
        tx.validate()?;
        if state.registry.contains(&tx.pet_id) {
            return Err(ChainError::InvalidTransaction(format!(
                "Pet {} already exists",
                tx.pet_id
            )));
        }

        let block = self.seal_payload(&state.ledger, &TxPayload::CreatePet(tx.clone()))?;
        let traits = PetTraits::from_hash(&block.hash)?;
        let pet = Pet::mint(tx.pet_id, name, traits, owner, now_millis());

        let mint_hash = block.hash.clone();
        state.ledger.append(block);
        state.registry.insert(pet.clone(), mint_hash);
        info!(
            "Pet {} minted for {}: {} {} (rarity {})",
            pet.id, pet.owner, pet.color, pet.category, pet.rarity
        );

        self.persist(&state)?;
        Ok(pet)
    }

    /// Move `pet_id` from `from_owner` to `to_owner`.
    ///
    /// All checks run before mining; a rejected trade leaves the ledger untouched.
    /// Save failures are reported as for [`PetService::create_pet`].
    pub fn trade_pet(&self, pet_id: &str, from_owner: &str, to_owner: &str) -> Result<Pet, ChainError> {
        let mut state = self.state.write();

        let tx = TradePetTx::new(pet_id, from_owner, to_owner, now_millis());
        tx.validate(&state.registry)?;

        let block = self.seal_payload(&state.ledger, &TxPayload::TradePet(tx.clone()))?;
        let pet = state.registry.apply_trade(&tx, now_millis())?;
        state.ledger.append(block);
        info!("Pet {} traded from {} to {}", pet.id, from_owner, to_owner);

        self.persist(&state)?;
        Ok(pet)
    }

    /// [`PetService::create_pet`] on tokio's blocking pool.
    pub async fn create_pet_async(&self, owner: String, name: String) -> Result<Pet, ChainError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.create_pet(&owner, &name))
            .await
            .map_err(|e| ChainError::Internal(format!("mining task failed: {}", e)))?
    }

    /// [`PetService::trade_pet`] on tokio's blocking pool.
    pub async fn trade_pet_async(
        &self,
        pet_id: String,
        from_owner: String,
        to_owner: String,
    ) -> Result<Pet, ChainError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.trade_pet(&pet_id, &from_owner, &to_owner))
            .await
            .map_err(|e| ChainError::Internal(format!("mining task failed: {}", e)))?
    }

    fn seal_payload(&self, ledger: &Ledger, payload: &TxPayload) -> Result<Block, ChainError> {
        let mut block = Block::new(encode(payload)?, ledger.head_hash());
        self.settings.miner.seal(&mut block, self.settings.difficulty)?;
        Ok(block)
    }

    fn persist(&self, state: &ServiceState) -> Result<(), ChainError> {
        if !self.settings.persist_on_write {
            return Ok(());
        }
        Self::write_state(self.persistence.as_deref(), state)
    }

    /// The ledger is written first. If the registry write then fails the
    /// registry on disk lags the chain until the next successful save.
    fn write_state(persistence: Option<&dyn Persistence>, state: &ServiceState) -> Result<(), ChainError> {
        let Some(persistence) = persistence else {
            return Ok(());
        };
        if let Err(e) = persistence.save_ledger(&state.ledger) {
            warn!("Failed to save blockchain: {}", e);
            return Err(e);
        }
        if let Err(e) = persistence.save_registry(&state.registry) {
            warn!("Failed to save pet registry, stored registry is now behind the chain: {}", e);
            return Err(e);
        }
        Ok(())
    }

    /// Write ledger and registry to the backing store, if any.
    pub fn save(&self) -> Result<(), ChainError> {
        let state = self.state.read();
        Self::write_state(self.persistence.as_deref(), &state)
    }

    pub fn pet(&self, pet_id: &str) -> Option<Pet> {
        self.state.read().registry.get(pet_id).cloned()
    }

    pub fn pets_by_owner(&self, owner: &str) -> Vec<Pet> {
        self.state.read().registry.by_owner(owner)
    }

    pub fn all_pets(&self) -> Vec<Pet> {
        self.state.read().registry.all()
    }

    /// Snapshot of the chain in ledger order.
    pub fn blocks(&self) -> Vec<Block> {
        self.state.read().ledger.all_blocks().to_vec()
    }

    pub fn chain_len(&self) -> usize {
        self.state.read().ledger.len()
    }

    pub fn head_hash(&self) -> String {
        self.state.read().ledger.head_hash()
    }

    pub fn validate_chain(&self) -> bool {
        self.state
            .read()
            .ledger
            .validate_with(self.settings.difficulty, self.settings.policy)
    }

    pub fn verify_chain(&self) -> Result<(), ValidationError> {
        self.state
            .read()
            .ledger
            .verify(self.settings.difficulty, self.settings.policy)
    }

    pub fn pet_history(&self, pet_id: &str) -> Vec<Transaction> {
        LedgerProjector::new(&self.state.read().ledger).history_for(pet_id)
    }

    pub fn owner_history(&self, address: &str) -> Vec<Transaction> {
        LedgerProjector::new(&self.state.read().ledger).history_for_owner(address)
    }

    pub fn all_transactions(&self) -> Vec<Transaction> {
        LedgerProjector::new(&self.state.read().ledger).all_transactions()
    }

    pub fn stats(&self) -> ChainStats {
        let state = self.state.read();
        ChainStats {
            total_pets: state.registry.len(),
            total_owners: state.registry.owner_count(),
            total_transactions: LedgerProjector::new(&state.ledger).transaction_count(),
            blockchain_size: state.ledger.len(),
            difficulty: self.settings.difficulty,
            blockchain_valid: state
                .ledger
                .validate_with(self.settings.difficulty, self.settings.policy),
        }
    }

    /// Rebuild a registry purely from ledger replay.
    ///
    /// The live registry is mutated directly and is never reconciled with the
    /// ledger; comparing it with this replay shows any drift. Replayed pets
    /// carry the hosting block's timestamp as `last_updated`, and trades that
    /// do not apply cleanly are skipped.
    pub fn rebuild_registry_from_ledger(&self) -> Result<PetRegistry, ChainError> {
        let state = self.state.read();
        let mut registry = PetRegistry::new();

        for tx in LedgerProjector::new(&state.ledger).all_transactions() {
            match &tx.payload {
                TxPayload::CreatePet(create) => {
                    let traits = PetTraits::from_hash(&tx.block_hash)?;
                    let pet = Pet::mint(
                        create.pet_id.clone(),
                        create.pet_name.clone(),
                        traits,
                        create.owner_address.clone(),
                        tx.block_timestamp,
                    );
                    registry.insert(pet, tx.block_hash.clone());
                }
                TxPayload::TradePet(trade) => {
                    if let Err(e) = registry.apply_trade(trade, tx.block_timestamp) {
                        warn!("Skipping trade in block {}: {}", tx.block_hash, e);
                    }
                }
                TxPayload::Unrecognized => {}
            }
        }

        Ok(registry)
    }
}
