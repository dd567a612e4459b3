//! Transaction history rebuilt by replaying ledger payloads
//!
//! The projector is read-only: it decodes every block, keeps the ones that
//! match, and orders them by the timestamp of the hosting block. Blocks whose
//! payload is not a pet transaction are skipped.

use crate::blockchain::Ledger;
use crate::transaction::Transaction;

pub struct LedgerProjector<'a> {
    ledger: &'a Ledger,
}

impl<'a> LedgerProjector<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        LedgerProjector { ledger }
    }

    fn project<F>(&self, keep: F) -> Vec<Transaction>
    where
        F: Fn(&Transaction) -> bool,
    {
        let mut transactions: Vec<Transaction> = self
            .ledger
            .iter()
            .filter_map(Transaction::from_block)
            .filter(|tx| keep(tx))
            .collect();
        // stable: blocks sharing a timestamp keep ledger order
        transactions.sort_by_key(|tx| tx.block_timestamp);
        transactions
    }

    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.project(|_| true)
    }

    /// Every create and trade of one pet.
    pub fn history_for(&self, pet_id: &str) -> Vec<Transaction> {
        self.project(|tx| tx.pet_id() == Some(pet_id))
    }

    /// Creates owned by `address` and trades where it is buyer or seller.
    pub fn history_for_owner(&self, address: &str) -> Vec<Transaction> {
        self.project(|tx| tx.involves(address))
    }

    pub fn transaction_count(&self) -> usize {
        self.ledger
            .iter()
            .filter(|block| Transaction::from_block(block).is_some())
            .count()
    }
}
