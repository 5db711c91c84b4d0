use std::collections::HashMap;
use crate::crypto::Hash;

/// Receipt hash -> index of the block that confirmed it.
#[derive(Debug, Default)]
pub struct ReceiptIndex {
    confirmed: HashMap<Hash, u64>,
}

impl ReceiptIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, receipt: Hash, block_index: u64) {
        self.confirmed.insert(receipt, block_index);
    }

    pub fn block_of(&self, receipt: &Hash) -> Option<u64> {
        self.confirmed.get(receipt).copied()
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }
}
