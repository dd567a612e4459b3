use crate::crypto::{sha256_hex, HexDigest};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// `previous_hash` carried by the first block of a ledger.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// A sealed (or about to be sealed) record in the ledger.
///
/// `hash` is a cache: it is only meaningful while it equals
/// [`Block::calculate_hash`]. Integrity is re-checked by
/// [`Ledger::verify`](crate::blockchain::Ledger::verify), never on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub hash: HexDigest,
    #[serde(rename = "previousHash")]
    pub previous_hash: HexDigest,
    #[serde(rename = "data", default)]
    pub payload: String,
    /// Milliseconds since the Unix epoch, taken when the block was built.
    #[serde(rename = "timeStamp")]
    pub timestamp: u64,
    #[serde(default)]
    pub nonce: u64,
}

impl Block {
    pub fn new(payload: impl Into<String>, previous_hash: impl Into<HexDigest>) -> Self {
        Self::with_timestamp(payload, previous_hash, now_millis())
    }

    /// Build a block with an explicit timestamp instead of reading the clock.
    pub fn with_timestamp(
        payload: impl Into<String>,
        previous_hash: impl Into<HexDigest>,
        timestamp: u64,
    ) -> Self {
        let mut block = Block {
            hash: String::new(),
            previous_hash: previous_hash.into(),
            payload: payload.into(),
            timestamp,
            nonce: 0,
        };
        block.hash = block.calculate_hash();
        block
    }

    /// Digest over `previous_hash ++ timestamp ++ nonce ++ payload`, numbers in decimal.
    pub fn calculate_hash(&self) -> HexDigest {
        let mut preimage = String::with_capacity(
            self.previous_hash.len() + 40 + self.payload.len(),
        );
        preimage.push_str(&self.previous_hash);
        preimage.push_str(&self.timestamp.to_string());
        preimage.push_str(&self.nonce.to_string());
        preimage.push_str(&self.payload);
        sha256_hex(preimage)
    }

    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        hash_meets_difficulty(&self.hash, difficulty)
    }

    pub fn is_genesis_linked(&self) -> bool {
        self.previous_hash == GENESIS_PREVIOUS_HASH
    }
}

/// The string of `difficulty` ASCII zeros a sealed hash must start with.
pub fn difficulty_target(difficulty: u32) -> String {
    "0".repeat(difficulty as usize)
}

/// True if `hash` starts with `difficulty` ASCII zeros. A difficulty longer
/// than the hash is never met.
pub fn hash_meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let Ok(difficulty) = usize::try_from(difficulty) else {
        return false;
    };
    difficulty <= hash.len() && hash.bytes().take(difficulty).all(|b| b == b'0')
}

/// Ordered, append-only sequence of blocks.
///
/// `append` trusts its caller; linkage and proof-of-work are only checked by
/// `verify`/`validate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    blocks: Vec<Block>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap blocks loaded from storage. Stored hashes are kept as-is.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Ledger { blocks }
    }

    pub fn append(&mut self, block: Block) {
        debug!(
            "Appending block {} at height {}",
            block.hash,
            self.blocks.len()
        );
        self.blocks.push(block);
    }

    /// Hash the next block must link to, or the genesis sentinel when empty.
    pub fn head_hash(&self) -> HexDigest {
        self.blocks
            .last()
            .map(|b| b.hash.clone())
            .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_string())
    }

    pub fn all_blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block_hash_matches_recomputation() {
        let block = Block::new("Test data", GENESIS_PREVIOUS_HASH);
        assert_eq!(block.nonce, 0);
        assert!(block.timestamp > 0);
        assert_eq!(block.hash.len(), 64);
        assert_eq!(block.hash, block.calculate_hash());
        assert!(block.is_genesis_linked());
    }

    #[test]
    fn test_hash_preimage_order() {
        let block = Block::with_timestamp("payload", "abc", 1_700_000_000_000);
        assert_eq!(block.hash, sha256_hex("abc17000000000000payload"));
    }

    #[test]
    fn test_different_payloads_produce_different_hashes() {
        let a = Block::with_timestamp("Data 1", "0", 1000);
        let b = Block::with_timestamp("Data 2", "0", 1000);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_difficulty_target() {
        assert_eq!(difficulty_target(0), "");
        assert_eq!(difficulty_target(3), "000");
        assert!(hash_meets_difficulty("00ab", 2));
        assert!(!hash_meets_difficulty("0ab", 2));
        assert!(hash_meets_difficulty("anything", 0));
        assert!(hash_meets_difficulty("00", 2));
        assert!(!hash_meets_difficulty("00", 3));
        assert!(!hash_meets_difficulty(&"0".repeat(64), u32::MAX));
    }

    #[test]
    fn test_head_hash_tracks_last_block() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.head_hash(), GENESIS_PREVIOUS_HASH);

        let first = Block::with_timestamp("one", ledger.head_hash(), 1);
        let first_hash = first.hash.clone();
        ledger.append(first);
        assert_eq!(ledger.head_hash(), first_hash);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_persisted_field_names() {
        let block = Block::with_timestamp("{}", "0", 5);
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["previousHash"], "0");
        assert_eq!(json["data"], "{}");
        assert_eq!(json["timeStamp"], 5);
        assert_eq!(json["nonce"], 0);
        assert_eq!(json["hash"], block.hash.as_str());

        let ledger = Ledger::from_blocks(vec![block.clone()]);
        let encoded = serde_json::to_string(&ledger).unwrap();
        assert!(encoded.starts_with('['));
        let decoded: Ledger = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.all_blocks(), &[block]);
    }

    #[test]
    fn test_loaded_hash_is_not_recomputed() {
        let json = r#"[{"hash":"bogus","previousHash":"0","data":"x","timeStamp":1,"nonce":3}]"#;
        let ledger: Ledger = serde_json::from_str(json).unwrap();
        assert_eq!(ledger.all_blocks()[0].hash, "bogus");
        assert!(!ledger.all_blocks()[0].has_valid_hash());
    }
}
