use crate::error::ChainError;
use crate::pet::Pet;
use crate::transaction::TradePetTx;
use std::collections::{HashMap, HashSet};

/// Pets keyed by id, plus the hash of the block that minted each one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetRegistry {
    pets: HashMap<String, Pet>,
    mint_hashes: HashMap<String, String>,
}

impl PetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(pets: HashMap<String, Pet>, mint_hashes: HashMap<String, String>) -> Self {
        PetRegistry { pets, mint_hashes }
    }

    pub fn pets(&self) -> &HashMap<String, Pet> {
        &self.pets
    }

    pub fn mint_hashes(&self) -> &HashMap<String, String> {
        &self.mint_hashes
    }

    pub fn get(&self, pet_id: &str) -> Option<&Pet> {
        self.pets.get(pet_id)
    }

    pub fn contains(&self, pet_id: &str) -> bool {
        self.pets.contains_key(pet_id)
    }

    /// Hash of the block whose digest the pet's traits were derived from.
    pub fn mint_hash(&self, pet_id: &str) -> Option<&str> {
        self.mint_hashes.get(pet_id).map(String::as_str)
    }

    pub fn insert(&mut self, pet: Pet, mint_hash: impl Into<String>) {
        self.mint_hashes.insert(pet.id.clone(), mint_hash.into());
        self.pets.insert(pet.id.clone(), pet);
    }

    /// Validate and apply a trade, returning the updated pet.
    pub fn apply_trade(&mut self, tx: &TradePetTx, now_ms: u64) -> Result<Pet, ChainError> {
        tx.validate(self)?;
        let updated = self
            .pets
            .get(&tx.pet_id)
            .ok_or_else(|| ChainError::PetNotFound(tx.pet_id.clone()))?
            .transferred_to(tx.to_owner.clone(), now_ms);
        self.pets.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    /// Pets held by `owner`, sorted by id.
    pub fn by_owner(&self, owner: &str) -> Vec<Pet> {
        let mut pets: Vec<Pet> = self
            .pets
            .values()
            .filter(|pet| pet.owner == owner)
            .cloned()
            .collect();
        pets.sort_by(|a, b| a.id.cmp(&b.id));
        pets
    }

    /// Every pet, sorted by id.
    pub fn all(&self) -> Vec<Pet> {
        let mut pets: Vec<Pet> = self.pets.values().cloned().collect();
        pets.sort_by(|a, b| a.id.cmp(&b.id));
        pets
    }

    pub fn owner_count(&self) -> usize {
        self.pets
            .values()
            .map(|pet| pet.owner.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }
}
