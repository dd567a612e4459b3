/// Transaction types carried in block payloads
use crate::blockchain::Block;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decoded block payload.
///
/// Payloads are opaque to the ledger, so anything that is not a known
/// transaction decodes to `Unrecognized` rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TxPayload {
    #[serde(rename = "CREATE_PET")]
    CreatePet(CreatePetTx),
    #[serde(rename = "TRADE_PET")]
    TradePet(TradePetTx),
    #[serde(other)]
    Unrecognized,
}

impl TxPayload {
    pub fn pet_id(&self) -> Option<&str> {
        match self {
            TxPayload::CreatePet(tx) => Some(&tx.pet_id),
            TxPayload::TradePet(tx) => Some(&tx.pet_id),
            TxPayload::Unrecognized => None,
        }
    }

    pub fn timestamp(&self) -> Option<u64> {
        match self {
            TxPayload::CreatePet(tx) => tx.timestamp,
            TxPayload::TradePet(tx) => tx.timestamp,
            TxPayload::Unrecognized => None,
        }
    }

    /// A create involves its owner; a trade involves both parties.
    pub fn involves(&self, address: &str) -> bool {
        match self {
            TxPayload::CreatePet(tx) => tx.owner_address == address,
            TxPayload::TradePet(tx) => tx.from_owner == address || tx.to_owner == address,
            TxPayload::Unrecognized => false,
        }
    }
}

/// Mints a new pet for `owner_address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetTx {
    pub pet_id: String,
    #[serde(default)]
    pub owner_address: String,
    #[serde(default)]
    pub pet_name: String,
    /// Issue time in milliseconds since the Unix epoch.
    #[serde(
        default,
        deserialize_with = "lenient_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<u64>,
}

impl CreatePetTx {
    pub fn new(
        pet_id: impl Into<String>,
        owner_address: impl Into<String>,
        pet_name: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        CreatePetTx {
            pet_id: pet_id.into(),
            owner_address: owner_address.into(),
            pet_name: pet_name.into(),
            timestamp: Some(timestamp),
        }
    }
}

/// Moves a pet from `from_owner` to `to_owner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePetTx {
    pub pet_id: String,
    #[serde(default)]
    pub from_owner: String,
    #[serde(default)]
    pub to_owner: String,
    #[serde(
        default,
        deserialize_with = "lenient_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<u64>,
}

impl TradePetTx {
    pub fn new(
        pet_id: impl Into<String>,
        from_owner: impl Into<String>,
        to_owner: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        TradePetTx {
            pet_id: pet_id.into(),
            from_owner: from_owner.into(),
            to_owner: to_owner.into(),
            timestamp: Some(timestamp),
        }
    }
}

/// Accepts integer or floating-point millisecond values; anything else reads as absent.
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    })
}

/// A recognized payload together with the block that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(flatten)]
    pub payload: TxPayload,
    pub block_hash: String,
    pub block_timestamp: u64,
}

impl Transaction {
    /// Decode `block`'s payload; `None` when it is not a pet transaction.
    ///
    /// A payload without an issue time takes the block's timestamp.
    pub fn from_block(block: &Block) -> Option<Self> {
        let mut payload = super::codec::decode(&block.payload)?;
        match &mut payload {
            TxPayload::CreatePet(tx) => {
                tx.timestamp.get_or_insert(block.timestamp);
            }
            TxPayload::TradePet(tx) => {
                tx.timestamp.get_or_insert(block.timestamp);
            }
            TxPayload::Unrecognized => return None,
        }

        Some(Transaction {
            payload,
            block_hash: block.hash.clone(),
            block_timestamp: block.timestamp,
        })
    }

    pub fn pet_id(&self) -> Option<&str> {
        self.payload.pet_id()
    }

    pub fn involves(&self, address: &str) -> bool {
        self.payload.involves(address)
    }
}
