//! Trade status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a trade record.
///
/// Statuses are strictly ordered; a trade only ever moves one step forward.
/// The serialized names are the ledger format and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TradeStatus {
    /// Trade created by the buyer/seller pair.
    #[serde(rename = "Initiated")]
    Initiated,
    /// Letter of credit issued by the importing bank.
    #[serde(rename = "LOCCreated")]
    LocCreated,
    /// Letter of credit approved by the exporting bank.
    #[serde(rename = "LOCApproved")]
    LocApproved,
    /// Goods handed over for shipment with a delivery date.
    #[serde(rename = "ShipmentInitiated")]
    ShipmentInitiated,
    /// Goods delivered and bill of lading issued. Terminal.
    #[serde(rename = "BOLCreated")]
    BolCreated,
}

impl TradeStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Initiated,
        Self::LocCreated,
        Self::LocApproved,
        Self::ShipmentInitiated,
        Self::BolCreated,
    ];

    /// Canonical name used in the ledger format and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "Initiated",
            Self::LocCreated => "LOCCreated",
            Self::LocApproved => "LOCApproved",
            Self::ShipmentInitiated => "ShipmentInitiated",
            Self::BolCreated => "BOLCreated",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Initiated => "Trade initiated",
            Self::LocCreated => "LOC created",
            Self::LocApproved => "LOC approved",
            Self::ShipmentInitiated => "Shipment initiated",
            Self::BolCreated => "BOL created",
        }
    }

    /// Position in the lifecycle, starting at zero.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        match self {
            Self::Initiated => 0,
            Self::LocCreated => 1,
            Self::LocApproved => 2,
            Self::ShipmentInitiated => 3,
            Self::BolCreated => 4,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::BolCreated)
    }

    /// Returns true if this status is `other` or comes after it.
    #[must_use]
    pub const fn has_reached(&self, other: Self) -> bool {
        self.ordinal() >= other.ordinal()
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown trade status: '{0}'")]
pub struct ParseTradeStatusError(pub String);

impl FromStr for TradeStatus {
    type Err = ParseTradeStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseTradeStatusError(s.to_string()))
    }
}
