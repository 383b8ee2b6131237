//! In-memory ledger for testing and single-process deployments.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{LedgerError, LedgerStore};

/// In-memory implementation of `LedgerStore`.
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the number of keys in the ledger.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store raw bytes under `key` (for test setup).
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let entries = self.entries.read().map_err(|e| LedgerError::ReadFailed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        let mut entries = self.entries.write().map_err(|e| LedgerError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_key() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.get("T1").await.unwrap().is_none());
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn put_then_get() {
        let ledger = InMemoryLedger::new();
        ledger.put("T1", b"one".to_vec()).await.unwrap();
        ledger.put("T1", b"two".to_vec()).await.unwrap();

        assert_eq!(ledger.get("T1").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn insert_raw_bypasses_codec() {
        let ledger = InMemoryLedger::new();
        ledger.insert_raw("T1", b"raw".as_slice());
        ledger.insert_raw("T2", Vec::new());
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get("T1").await.unwrap(), Some(b"raw".to_vec()));
        assert_eq!(ledger.get("T2").await.unwrap(), Some(Vec::new()));
    }
}
