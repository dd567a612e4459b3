/// Payload codec: transactions travel inside blocks as flat JSON objects
use crate::error::ChainError;
use crate::transaction::types::TxPayload;

/// Serialize a transaction into a block payload.
pub fn encode(payload: &TxPayload) -> Result<String, ChainError> {
    match payload {
        TxPayload::CreatePet(_) | TxPayload::TradePet(_) => Ok(serde_json::to_string(payload)?),
        TxPayload::Unrecognized => Err(ChainError::InvalidTransaction(
            "Cannot encode an unrecognized payload".to_string(),
        )),
    }
}

/// Parse a block payload. Never fails: empty, malformed or unknown payloads
/// come back as [`TxPayload::Unrecognized`].
pub fn parse(data: &str) -> TxPayload {
    if data.trim().is_empty() {
        return TxPayload::Unrecognized;
    }
    serde_json::from_str(data).unwrap_or(TxPayload::Unrecognized)
}

/// Like [`parse`], with `None` standing in for `Unrecognized`.
pub fn decode(data: &str) -> Option<TxPayload> {
    match parse(data) {
        TxPayload::Unrecognized => None,
        payload => Some(payload),
    }
}
