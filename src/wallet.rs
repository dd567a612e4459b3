//! Wallet addresses
//!
//! A wallet is nothing more than a random address; there are no keys.

use crate::crypto::generate_address;
use crate::pet::Pet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub address: String,
    #[serde(default)]
    pub pets: Vec<Pet>,
}

impl Wallet {
    pub fn generate() -> Self {
        Wallet {
            address: generate_address(),
            pets: Vec::new(),
        }
    }

    pub fn add_pet(&mut self, pet: Pet) {
        self.pets.push(pet);
    }

    /// Remove a pet by id, returning it if it was held.
    pub fn remove_pet(&mut self, pet_id: &str) -> Option<Pet> {
        let index = self.pets.iter().position(|pet| pet.id == pet_id)?;
        Some(self.pets.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::PetTraits;

    #[test]
    fn test_generate() {
        let alice = Wallet::generate();
        let bob = Wallet::generate();
        assert_eq!(alice.address.len(), 16);
        assert!(alice.pets.is_empty());
        assert_ne!(alice.address, bob.address);
    }

    #[test]
    fn test_add_and_remove_pets() {
        let traits = PetTraits {
            category: "Bird",
            color: "Pink",
            rarity: 2,
        };
        let mut wallet = Wallet::generate();
        wallet.add_pet(Pet::mint("p1", "Tweety", traits, wallet.address.clone(), 1));

        assert_eq!(wallet.pets.len(), 1);
        assert!(wallet.remove_pet("missing").is_none());
        assert_eq!(wallet.remove_pet("p1").map(|p| p.name), Some("Tweety".to_string()));
        assert!(wallet.pets.is_empty());
    }
}
