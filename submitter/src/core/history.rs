//! In-memory mapping from action key to confirmed receipt.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::core::receipt::Receipt;

/// Confirmed receipts keyed by the caller-chosen action key.
///
/// Keys are kept sorted so the persisted file is stable across runs and easy
/// to diff; insertion order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    receipts: BTreeMap<String, Receipt>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Receipt> {
        self.receipts.get(key)
    }

    /// Insert `receipt` under `key`, returning whatever it replaced.
    pub fn put(&mut self, key: impl Into<String>, receipt: Receipt) -> Option<Receipt> {
        self.receipts.insert(key.into(), receipt)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.receipts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.receipts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Receipt> {
        self.receipts.iter()
    }

    pub fn clear(&mut self) {
        self.receipts.clear();
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = (&'a String, &'a Receipt);
    type IntoIter = btree_map::Iter<'a, String, Receipt>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(String, Receipt)> for History {
    fn from_iter<I: IntoIterator<Item = (String, Receipt)>>(iter: I) -> Self {
        Self {
            receipts: iter.into_iter().collect(),
        }
    }
}
