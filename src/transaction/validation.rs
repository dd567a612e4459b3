/// Validation logic for transactions separated from type definitions
use crate::blockchain::PetRegistry;
use crate::error::ChainError;
use crate::transaction::types::{CreatePetTx, TradePetTx};

fn require(field: &str, value: &str) -> Result<(), ChainError> {
    if value.trim().is_empty() {
        return Err(ChainError::InvalidTransaction(format!("{} is required", field)));
    }
    Ok(())
}

impl CreatePetTx {
    /// Stateless checks: every field must be present.
    pub fn validate(&self) -> Result<(), ChainError> {
        require("petId", &self.pet_id)?;
        require("ownerAddress", &self.owner_address)?;
        require("petName", &self.pet_name)
    }
}

impl TradePetTx {
    /// Checks a trade against the registry before anything is mined.
    ///
    /// Order matters for the reported error: unknown pet, then wrong
    /// seller, then a trade to oneself.
    pub fn validate(&self, registry: &PetRegistry) -> Result<(), ChainError> {
        require("petId", &self.pet_id)?;
        require("fromOwner", &self.from_owner)?;
        require("toOwner", &self.to_owner)?;

        let pet = registry
            .get(&self.pet_id)
            .ok_or_else(|| ChainError::PetNotFound(self.pet_id.clone()))?;

        if pet.owner != self.from_owner {
            return Err(ChainError::OwnershipMismatch {
                pet_id: self.pet_id.clone(),
                claimed: self.from_owner.clone(),
                actual: pet.owner.clone(),
            });
        }

        if self.from_owner == self.to_owner {
            return Err(ChainError::SameOwnerTrade(self.to_owner.clone()));
        }

        Ok(())
    }
}
