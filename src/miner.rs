//! Proof-of-work sealing
//!
//! A block is sealed by bumping its nonce until its hash starts with
//! `difficulty` zero characters. Expected work is about `16^difficulty` hashes.

use crate::blockchain::{difficulty_target, Block};
use crate::crypto::DIGEST_HEX_LEN;
use crate::error::ChainError;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of a successful seal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SealReport {
    pub attempts: u64,
    pub elapsed: Duration,
}

/// Nonce search with an optional cap on the number of hashes tried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Miner {
    max_iterations: Option<u64>,
}

impl Miner {
    /// An unbounded miner: runs until the target is met.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(max_iterations: u64) -> Self {
        Miner {
            max_iterations: Some(max_iterations),
        }
    }

    pub fn with_limit(max_iterations: Option<u64>) -> Self {
        Miner { max_iterations }
    }

    /// Seal `block` in place for `difficulty`.
    ///
    /// The nonce is always advanced at least once and the timestamp is left
    /// untouched. On `MiningExhausted` the block keeps the last nonce tried.
    pub fn seal(&self, block: &mut Block, difficulty: u32) -> Result<SealReport, ChainError> {
        if difficulty as usize > DIGEST_HEX_LEN {
            return Err(ChainError::InvalidDifficulty(difficulty));
        }

        let target = difficulty_target(difficulty);
        let started = Instant::now();
        let mut attempts: u64 = 0;

        loop {
            if self.max_iterations.is_some_and(|max| attempts >= max) {
                debug!("Mining stopped after {} attempts", attempts);
                return Err(ChainError::MiningExhausted { attempts });
            }

            block.nonce = block
                .nonce
                .checked_add(1)
                .ok_or(ChainError::MiningExhausted { attempts })?;
            block.hash = block.calculate_hash();
            attempts += 1;

            if block.hash.starts_with(&target) {
                break;
            }
        }

        let report = SealReport {
            attempts,
            elapsed: started.elapsed(),
        };
        info!(
            "Block mined: {} (nonce {}, {} attempts, {:.3}s)",
            block.hash,
            block.nonce,
            report.attempts,
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }
}

/// Seal with an unbounded [`Miner`].
pub fn mine_block(block: &mut Block, difficulty: u32) -> Result<SealReport, ChainError> {
    Miner::new().seal(block, difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mining_meets_target() {
        for difficulty in 0..=3 {
            let mut block = Block::new("Test data", "0");
            let original_hash = block.hash.clone();
            let original_timestamp = block.timestamp;

            let report = mine_block(&mut block, difficulty).unwrap();

            assert!(block.hash.starts_with(&"0".repeat(difficulty as usize)));
            assert!(block.nonce > 0);
            assert_eq!(block.nonce, report.attempts);
            assert_ne!(block.hash, original_hash);
            assert_eq!(block.timestamp, original_timestamp);
            assert!(block.has_valid_hash());
        }
    }

    #[test]
    fn test_iteration_cap() {
        let mut block = Block::new("capped", "0");
        let result = Miner::with_max_iterations(3).seal(&mut block, 64);
        assert!(matches!(
            result,
            Err(ChainError::MiningExhausted { attempts: 3 })
        ));
        assert_eq!(block.nonce, 3);
        assert!(block.has_valid_hash());
    }

    #[test]
    fn test_zero_cap_tries_nothing() {
        let mut block = Block::new("capped", "0");
        let result = Miner::with_max_iterations(0).seal(&mut block, 1);
        assert!(matches!(
            result,
            Err(ChainError::MiningExhausted { attempts: 0 })
        ));
        assert_eq!(block.nonce, 0);
    }

    #[test]
    fn test_rejects_impossible_difficulty() {
        let mut block = Block::new("too hard", "0");
        assert!(matches!(
            Miner::new().seal(&mut block, 65),
            Err(ChainError::InvalidDifficulty(65))
        ));
        assert_eq!(block.nonce, 0);
    }

    #[test]
    fn test_generous_cap_still_succeeds() {
        let mut block = Block::new("bounded", "0");
        Miner::with_max_iterations(1_000_000)
            .seal(&mut block, 2)
            .unwrap();
        assert!(block.meets_difficulty(2));
    }
}
