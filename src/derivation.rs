//! Pet traits derived from the hash of the block that created the pet
//!
//! Traits are computed once, when the pet is minted, and stored with it.
//! Each trait reads one hex nibble of the hash:
//! - nibble 0 picks the category
//! - nibble 1 picks the color
//! - nibble 2 picks the rarity tier

use crate::error::ChainError;

/// Ordered category list; the nibble value modulo its length is the index.
pub const PET_CATEGORIES: [&str; 15] = [
    "Dragon", "Cat", "Dog", "Bird", "Fish", "Tiger", "Lion", "Wolf", "Eagle", "Shark", "Fox",
    "Bear", "Rabbit", "Turtle", "Snake",
];

/// Ordered color list; the nibble value modulo its length is the index.
pub const PET_COLORS: [&str; 15] = [
    "Red", "Blue", "Green", "Yellow", "Purple", "Orange", "Pink", "Black", "White", "Gold",
    "Silver", "Brown", "Gray", "Cyan", "Magenta",
];

pub const MIN_RARITY: u8 = 1;
pub const MAX_RARITY: u8 = 5;

/// Traits fixed at mint time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PetTraits {
    pub category: &'static str,
    pub color: &'static str,
    pub rarity: u8,
}

impl PetTraits {
    pub fn from_hash(hash: &str) -> Result<Self, ChainError> {
        Ok(PetTraits {
            category: category(hash)?,
            color: color(hash)?,
            rarity: rarity(hash)?,
        })
    }
}

fn nibble(hash: &str, position: usize) -> Result<u32, ChainError> {
    hash.chars()
        .nth(position)
        .and_then(|c| c.to_digit(16))
        .ok_or_else(|| {
            ChainError::InvalidDigest(format!(
                "expected a hex digit at position {} of '{}'",
                position, hash
            ))
        })
}

pub fn category(hash: &str) -> Result<&'static str, ChainError> {
    let index = nibble(hash, 0)? as usize % PET_CATEGORIES.len();
    Ok(PET_CATEGORIES[index])
}

pub fn color(hash: &str) -> Result<&'static str, ChainError> {
    let index = nibble(hash, 1)? as usize % PET_COLORS.len();
    Ok(PET_COLORS[index])
}

/// Rarity tier 1..=5 from the third nibble; higher nibbles are rarer.
pub fn rarity(hash: &str) -> Result<u8, ChainError> {
    Ok(rarity_for_nibble(nibble(hash, 2)?))
}

fn rarity_for_nibble(value: u32) -> u8 {
    if value >= 12 {
        5
    } else if value >= 9 {
        4
    } else if value >= 6 {
        3
    } else if value >= 3 {
        2
    } else {
        1
    }
}

pub fn rarity_label(rarity: u8) -> &'static str {
    match rarity {
        5 => "Legendary",
        4 => "Epic",
        3 => "Rare",
        2 => "Uncommon",
        _ => "Common",
    }
}
