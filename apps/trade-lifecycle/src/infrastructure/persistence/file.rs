//! File-backed ledger.
//!
//! Keeps the whole ledger in memory and rewrites a binary snapshot on every
//! `put`. Snapshot format, repeated per entry in key order:
//!
//! ```text
//! [key_len: u32 LE][key: UTF-8][value_len: u32 LE][value]
//! ```
//!
//! The snapshot is written to a sibling temp file, synced, then renamed over
//! the previous one, so a crash leaves either the old or the new ledger.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::application::ports::{LedgerError, LedgerStore};

const LEN_PREFIX: usize = 4;

/// File-backed implementation of `LedgerStore`.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl FileLedger {
    /// Open the ledger at `path`, loading an existing snapshot if present.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Io` if the file cannot be read, or
    /// `LedgerError::Corrupted` if it is truncated or malformed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let entries = decode_snapshot(&bytes)?;
                tracing::info!(
                    path = %path.display(),
                    keys = entries.len(),
                    bytes = bytes.len(),
                    "Loaded ledger snapshot"
                );
                entries
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No ledger snapshot, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(LedgerError::Io(e)),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the number of keys in the ledger.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Sibling path the snapshot is staged at before the rename.
    ///
    /// `.tmp` is appended to the full file name so it never equals `path`.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write_snapshot(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path).await
    }
}

#[async_trait]
impl LedgerStore for FileLedger {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        let write_failed = |message: String| LedgerError::WriteFailed {
            key: key.to_string(),
            message,
        };

        // Held across the file write so snapshots are taken in put order.
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);

        let bytes = encode_snapshot(&next).map_err(write_failed)?;
        self.write_snapshot(&bytes)
            .await
            .map_err(|e| write_failed(e.to_string()))?;

        *entries = next;
        Ok(())
    }
}

fn encode_snapshot(entries: &BTreeMap<String, Vec<u8>>) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    for (key, value) in entries {
        for field in [key.as_bytes(), value.as_slice()] {
            let len = u32::try_from(field.len())
                .map_err(|_| format!("entry '{key}' exceeds {} bytes", u32::MAX))?;
            bytes.extend_from_slice(&len.to_le_bytes());
            bytes.extend_from_slice(field);
        }
    }
    Ok(bytes)
}

fn decode_snapshot(bytes: &[u8]) -> Result<BTreeMap<String, Vec<u8>>, LedgerError> {
    let mut entries = BTreeMap::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        let offset = bytes.len() - rest.len();
        let (key, after_key) = take_field(rest, offset)?;
        let (value, after_value) = take_field(after_key, offset)?;

        let key = String::from_utf8(key.to_vec()).map_err(|_| LedgerError::Corrupted {
            message: format!("entry at offset {offset} has a non UTF-8 key"),
        })?;
        entries.insert(key, value.to_vec());
        rest = after_value;
    }

    Ok(entries)
}

fn take_field(input: &[u8], offset: usize) -> Result<(&[u8], &[u8]), LedgerError> {
    let truncated = || LedgerError::Corrupted {
        message: format!("entry at offset {offset} is truncated"),
    };

    let (prefix, rest) = input.split_at_checked(LEN_PREFIX).ok_or_else(truncated)?;
    let mut len = [0u8; LEN_PREFIX];
    len.copy_from_slice(prefix);
    let len = usize::try_from(u32::from_le_bytes(len)).map_err(|_| truncated())?;

    rest.split_at_checked(len).ok_or_else(truncated)
}
