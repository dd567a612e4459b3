//! Transaction module split into types, payload codec and validation

pub mod codec;
pub mod types;
pub mod validation;

pub use codec::{decode, encode, parse};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::Block;
    use crate::error::ChainError;

    #[test]
    fn test_create_round_trip() {
        let tx = TxPayload::CreatePet(CreatePetTx::new("pet1", "alice", "Rex", 1_700_000_000_123));
        let encoded = encode(&tx).unwrap();
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded, tx);
        match decoded {
            TxPayload::CreatePet(create) => {
                assert_eq!(create.pet_id, "pet1");
                assert_eq!(create.owner_address, "alice");
                assert_eq!(create.pet_name, "Rex");
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_encoded_shape_is_flat() {
        let create = encode(&TxPayload::CreatePet(CreatePetTx::new("p", "o", "n", 9))).unwrap();
        let json: serde_json::Value = serde_json::from_str(&create).unwrap();
        assert_eq!(json["type"], "CREATE_PET");
        assert_eq!(json["petId"], "p");
        assert_eq!(json["ownerAddress"], "o");
        assert_eq!(json["petName"], "n");
        assert_eq!(json["timestamp"], 9);
        assert!(json.get("fromOwner").is_none());

        let trade = encode(&TxPayload::TradePet(TradePetTx::new("p", "a", "b", 9))).unwrap();
        let json: serde_json::Value = serde_json::from_str(&trade).unwrap();
        assert_eq!(json["type"], "TRADE_PET");
        assert_eq!(json["fromOwner"], "a");
        assert_eq!(json["toOwner"], "b");
        assert!(json.get("ownerAddress").is_none());
        assert!(json.get("petName").is_none());
    }

    #[test]
    fn test_non_transactions_are_skipped() {
        for payload in [
            "",
            "   ",
            "Genesis",
            "[1, 2, 3]",
            "\"just a string\"",
            r#"{"petId": "p"}"#,
            r#"{"type": "BURN_PET", "petId": "p"}"#,
            r#"{"type": "CREATE_PET"}"#,
            r#"{"type": "TRADE_PET", "petId": null}"#,
            "{not json",
        ] {
            assert_eq!(decode(payload), None, "payload {:?}", payload);
            assert_eq!(parse(payload), TxPayload::Unrecognized);
        }
    }

    #[test]
    fn test_float_timestamps_are_accepted() {
        let payload = r#"{"type":"TRADE_PET","petId":"p","fromOwner":"a","toOwner":"b","timestamp":1.700000000123E12}"#;
        assert_eq!(
            decode(payload),
            Some(TxPayload::TradePet(TradePetTx::new("p", "a", "b", 1_700_000_000_123)))
        );
    }

    #[test]
    fn test_odd_timestamps_read_as_absent() {
        let payload = r#"{"type":"CREATE_PET","petId":"p","ownerAddress":"o","petName":"n","timestamp":"soon"}"#;
        let decoded = decode(payload).unwrap();
        assert_eq!(decoded.timestamp(), None);
    }

    #[test]
    fn test_unrecognized_cannot_be_encoded() {
        assert!(matches!(
            encode(&TxPayload::Unrecognized),
            Err(ChainError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn test_transaction_from_block() {
        let payload = r#"{"type":"CREATE_PET","petId":"p","ownerAddress":"o","petName":"n"}"#;
        let block = Block::with_timestamp(payload, "0", 1234);
        let tx = Transaction::from_block(&block).unwrap();

        assert_eq!(tx.block_hash, block.hash);
        assert_eq!(tx.block_timestamp, 1234);
        assert_eq!(tx.payload.timestamp(), Some(1234));
        assert_eq!(tx.pet_id(), Some("p"));
        assert!(tx.involves("o"));
        assert!(!tx.involves("someone else"));

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "CREATE_PET");
        assert_eq!(json["blockHash"], block.hash.as_str());
        assert_eq!(json["blockTimestamp"], 1234);

        assert!(Transaction::from_block(&Block::with_timestamp("Genesis", "0", 1)).is_none());
    }

    #[test]
    fn test_trade_involves_both_parties() {
        let tx = TxPayload::TradePet(TradePetTx::new("p", "a", "b", 1));
        assert!(tx.involves("a"));
        assert!(tx.involves("b"));
        assert!(!tx.involves("c"));
        assert!(!TxPayload::Unrecognized.involves("a"));
    }

    #[test]
    fn test_create_validation() {
        assert!(CreatePetTx::new("p", "o", "n", 1).validate().is_ok());
        assert!(CreatePetTx::new("p", "", "n", 1).validate().is_err());
        assert!(CreatePetTx::new("p", "o", " ", 1).validate().is_err());
    }
}
