//! Ledger Store Port (Driven Port)
//!
//! A key-value ledger holding one opaque blob per trade. Each call is atomic
//! on its own; there is no multi-call transaction.

use async_trait::async_trait;

use crate::domain::trade_lifecycle::TradeError;

/// Ledger store error.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Reading a key failed.
    #[error("Ledger read failed for '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Writing a key failed; nothing was stored.
    #[error("Ledger write failed for '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// The backing storage could not be interpreted.
    #[error("Ledger storage corrupted: {message}")]
    Corrupted { message: String },

    /// Underlying I/O failure.
    #[error("Ledger I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for the key-value ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Read the blob stored under `key`, or `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Store `value` under `key`, replacing any previous blob.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;
}

impl From<LedgerError> for TradeError {
    fn from(err: LedgerError) -> Self {
        Self::StoreUnavailable {
            reason: err.to_string(),
        }
    }
}
