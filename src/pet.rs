//! Collectible pet record

use crate::derivation::PetTraits;
use serde::{Deserialize, Serialize};

/// A pet as kept in the registry.
///
/// `id`, `category`, `color` and `rarity` never change after minting;
/// a trade replaces `owner` and `last_updated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub color: String,
    pub rarity: u8,
    pub owner: String,
    /// Milliseconds since the Unix epoch of the last ownership change.
    #[serde(rename = "timeStamp")]
    pub last_updated: u64,
}

impl Pet {
    pub fn mint(
        id: impl Into<String>,
        name: impl Into<String>,
        traits: PetTraits,
        owner: impl Into<String>,
        now_ms: u64,
    ) -> Self {
        Pet {
            id: id.into(),
            name: name.into(),
            category: traits.category.to_string(),
            color: traits.color.to_string(),
            rarity: traits.rarity,
            owner: owner.into(),
            last_updated: now_ms,
        }
    }

    /// Same pet with a new owner.
    pub fn transferred_to(&self, new_owner: impl Into<String>, now_ms: u64) -> Self {
        Pet {
            owner: new_owner.into(),
            last_updated: now_ms,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traits() -> PetTraits {
        PetTraits {
            category: "Cat",
            color: "Gold",
            rarity: 3,
        }
    }

    #[test]
    fn test_transfer_keeps_minted_fields() {
        let pet = Pet::mint("abc", "Whiskers", traits(), "alice", 10);
        let moved = pet.transferred_to("bob", 20);

        assert_eq!(moved.owner, "bob");
        assert_eq!(moved.last_updated, 20);
        assert_eq!(moved.id, pet.id);
        assert_eq!(moved.category, pet.category);
        assert_eq!(moved.color, pet.color);
        assert_eq!(moved.rarity, pet.rarity);
    }

    #[test]
    fn test_json_field_names() {
        let pet = Pet::mint("abc", "Whiskers", traits(), "alice", 10);
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["type"], "Cat");
        assert_eq!(json["color"], "Gold");
        assert_eq!(json["timeStamp"], 10);
        assert_eq!(json["owner"], "alice");
    }
}
