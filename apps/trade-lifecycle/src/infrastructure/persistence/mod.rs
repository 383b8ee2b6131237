//! Persistence Adapters
//!
//! Ledger store implementations and the configured backend selector.

pub mod file;
pub mod in_memory;

pub use file::FileLedger;
pub use in_memory::InMemoryLedger;

use async_trait::async_trait;

use crate::application::ports::{LedgerError, LedgerStore};
use crate::config::{LedgerBackend, LedgerConfig};

/// Ledger chosen by configuration at startup.
#[derive(Debug)]
pub enum ConfiguredLedger {
    /// Process-local map.
    Memory(InMemoryLedger),
    /// Snapshot file on disk.
    File(FileLedger),
}

impl ConfiguredLedger {
    /// Open the ledger described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the file backend cannot load its snapshot.
    pub async fn from_config(config: &LedgerConfig) -> Result<Self, LedgerError> {
        match config.backend {
            LedgerBackend::Memory => Ok(Self::Memory(InMemoryLedger::new())),
            LedgerBackend::File => Ok(Self::File(FileLedger::open(&config.path).await?)),
        }
    }

    /// Backend name for logging.
    #[must_use]
    pub const fn backend(&self) -> LedgerBackend {
        match self {
            Self::Memory(_) => LedgerBackend::Memory,
            Self::File(_) => LedgerBackend::File,
        }
    }
}

#[async_trait]
impl LedgerStore for ConfiguredLedger {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        match self {
            Self::Memory(ledger) => ledger.get(key).await,
            Self::File(ledger) => ledger.get(key).await,
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        match self {
            Self::Memory(ledger) => ledger.put(key, value).await,
            Self::File(ledger) => ledger.put(key, value).await,
        }
    }
}
