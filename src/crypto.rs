//! Hashing primitives for PetChain
//!
//! Every digest in the ledger is the lowercase hex encoding of a SHA-256 hash.
//! Changing the algorithm or the encoding invalidates every sealed block.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Hex-encoded SHA-256 digest (64 characters).
pub type HexDigest = String;

/// Length of a hex digest in characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// Length of the truncated identifiers used for wallet addresses and pet ids.
pub const SHORT_ID_LEN: usize = 16;

/// Hash arbitrary bytes into a hex digest.
pub fn sha256_hex(data: impl AsRef<[u8]>) -> HexDigest {
    hex::encode(Sha256::digest(data.as_ref()))
}

/// Hash a string and keep only the first [`SHORT_ID_LEN`] hex characters.
pub fn short_id(seed: &str) -> String {
    let mut digest = sha256_hex(seed);
    digest.truncate(SHORT_ID_LEN);
    digest
}

/// Generate a fresh wallet address from a random UUID.
pub fn generate_address() -> String {
    short_id(&Uuid::new_v4().to_string())
}

/// Deterministic pet id for an owner, a name and a creation time in milliseconds.
pub fn pet_id(owner: &str, name: &str, now_ms: u64) -> String {
    short_id(&format!("{}{}{}", owner, name, now_ms))
}

/// True if `s` looks like a hex digest produced by [`sha256_hex`].
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_shape() {
        let digest = sha256_hex(b"");
        assert_eq!(digest.len(), DIGEST_HEX_LEN);
        assert!(is_hex_digest(&digest));
        assert!(!is_hex_digest("0"));
    }

    #[test]
    fn test_generated_addresses_are_distinct() {
        let a = generate_address();
        let b = generate_address();
        assert_eq!(a.len(), SHORT_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_pet_id_is_deterministic() {
        assert_eq!(pet_id("alice", "Rex", 42), pet_id("alice", "Rex", 42));
        assert_ne!(pet_id("alice", "Rex", 42), pet_id("alice", "Rex", 43));
        assert_eq!(pet_id("alice", "Rex", 42), short_id("aliceRex42"));
    }
}
