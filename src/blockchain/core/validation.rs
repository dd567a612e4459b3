use super::chain::{Block, Ledger};
use thiserror::Error;
use tracing::warn;

/// Reason a ledger failed its integrity check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block {index}: stored hash does not match its contents")]
    HashMismatch { index: usize },
    #[error("block {index}: previous hash does not match the preceding block")]
    LinkBroken { index: usize },
    #[error("block {index}: hash does not meet difficulty {difficulty}")]
    ProofOfWorkUnmet { index: usize, difficulty: u32 },
}

/// Controls which blocks take part in validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Also check the first block's hash and proof-of-work prefix.
    pub verify_genesis: bool,
}

impl ValidationPolicy {
    /// Checks start at the second block; the first block is trusted.
    pub fn legacy() -> Self {
        ValidationPolicy {
            verify_genesis: false,
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        ValidationPolicy {
            verify_genesis: true,
        }
    }
}

fn check_sealed(block: &Block, index: usize) -> Result<(), ValidationError> {
    if !block.has_valid_hash() {
        return Err(ValidationError::HashMismatch { index });
    }
    Ok(())
}

fn check_work(block: &Block, index: usize, difficulty: u32) -> Result<(), ValidationError> {
    if !block.meets_difficulty(difficulty) {
        return Err(ValidationError::ProofOfWorkUnmet { index, difficulty });
    }
    Ok(())
}

impl Ledger {
    /// Walk the chain and report the first integrity violation.
    ///
    /// For each checked block, in order: stored hash equals recomputed hash,
    /// `previous_hash` equals the prior block's hash, and the hash carries the
    /// zero prefix for `difficulty`. Empty and single-block ledgers pass
    /// unless the policy asks for the first block to be checked.
    pub fn verify(&self, difficulty: u32, policy: ValidationPolicy) -> Result<(), ValidationError> {
        let blocks = self.all_blocks();

        if policy.verify_genesis {
            if let Some(genesis) = blocks.first() {
                check_sealed(genesis, 0)?;
                check_work(genesis, 0, difficulty)?;
            }
        }

        for (offset, pair) in blocks.windows(2).enumerate() {
            let index = offset + 1;
            let (previous, current) = (&pair[0], &pair[1]);

            check_sealed(current, index)?;
            if current.previous_hash != previous.hash {
                return Err(ValidationError::LinkBroken { index });
            }
            check_work(current, index, difficulty)?;
        }

        Ok(())
    }

    /// Boolean form of [`Ledger::verify`] under the default policy.
    pub fn validate(&self, difficulty: u32) -> bool {
        self.validate_with(difficulty, ValidationPolicy::default())
    }

    pub fn validate_with(&self, difficulty: u32, policy: ValidationPolicy) -> bool {
        match self.verify(difficulty, policy) {
            Ok(()) => true,
            Err(e) => {
                warn!("Chain validation failed: {}", e);
                false
            }
        }
    }
}
