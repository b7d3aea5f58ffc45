//! Small insertion-ordered map backed by a vector.
//!
//! Lookups are linear scans, which is the cheaper choice for the handful of
//! entries bookkeeping tables keep. Keys are unique.

use crate::error::{LedgerError, Result};
use alloc::vec::Vec;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VecMap<K, V> {
    contents: Vec<(K, V)>,
}

impl<K: PartialEq, V> VecMap<K, V> {
    pub fn empty() -> Self {
        Self { contents: Vec::new() }
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.contents.iter().position(|(k, _)| k == key)
    }

    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        if self.position(&key).is_some() {
            return Err(LedgerError::DuplicateKey);
        }
        self.contents.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &K) -> Result<&V> {
        let idx = self.position(key).ok_or(LedgerError::KeyNotFound)?;
        Ok(&self.contents[idx].1)
    }

    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        let idx = self.position(key).ok_or(LedgerError::KeyNotFound)?;
        Ok(&mut self.contents[idx].1)
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &K) -> Result<(K, V)> {
        let idx = self.position(key).ok_or(LedgerError::KeyNotFound)?;
        Ok(self.contents.remove(idx))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.contents.iter().map(|(k, _)| k)
    }

    pub fn into_keys_values(self) -> (Vec<K>, Vec<V>) {
        self.contents.into_iter().unzip()
    }

    pub fn destroy_empty(self) -> Result<()> {
        if !self.contents.is_empty() {
            return Err(LedgerError::NotEmpty);
        }
        Ok(())
    }
}
