//! Ledger store configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ledger backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    /// Process-local map; contents are lost on exit.
    #[default]
    Memory,
    /// Length-prefixed snapshot file.
    File,
}

impl fmt::Display for LedgerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Backend to use.
    #[serde(default)]
    pub backend: LedgerBackend,
    /// Snapshot path for the file backend.
    #[serde(default = "default_ledger_path")]
    pub path: String,
    /// Create the demo trade `FTE_1` at startup if absent.
    #[serde(default)]
    pub seed_demo_trade: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            path: default_ledger_path(),
            seed_demo_trade: false,
        }
    }
}

fn default_ledger_path() -> String {
    "./data/ledger.bin".to_string()
}
