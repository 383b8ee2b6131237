//! Named lifecycle transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TradeStatus;

/// A named transition that advances an existing trade by one step.
///
/// Creation is not a transition: it has no precondition status and is
/// handled by `Trade::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transition {
    /// Importing bank issues the letter of credit.
    CreateLoc,
    /// Exporting bank approves the letter of credit.
    ApproveLoc,
    /// Seller starts the shipment.
    InitiateShipment,
    /// Shipper delivers and the bill of lading is created.
    DeliverGoods,
}

impl Transition {
    /// All transitions in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::CreateLoc,
        Self::ApproveLoc,
        Self::InitiateShipment,
        Self::DeliverGoods,
    ];

    /// Status the trade must be in for this transition to fire.
    #[must_use]
    pub const fn required_status(&self) -> TradeStatus {
        match self {
            Self::CreateLoc => TradeStatus::Initiated,
            Self::ApproveLoc => TradeStatus::LocCreated,
            Self::InitiateShipment => TradeStatus::LocApproved,
            Self::DeliverGoods => TradeStatus::ShipmentInitiated,
        }
    }

    /// Status the trade is in after this transition.
    #[must_use]
    pub const fn target_status(&self) -> TradeStatus {
        match self {
            Self::CreateLoc => TradeStatus::LocCreated,
            Self::ApproveLoc => TradeStatus::LocApproved,
            Self::InitiateShipment => TradeStatus::ShipmentInitiated,
            Self::DeliverGoods => TradeStatus::BolCreated,
        }
    }

    /// Operation name on the invocation surface.
    #[must_use]
    pub const fn operation_name(&self) -> &'static str {
        match self {
            Self::CreateLoc => "createLOC",
            Self::ApproveLoc => "approveLOC",
            Self::InitiateShipment => "initiateShipment",
            Self::DeliverGoods => "deliverGoods",
        }
    }

    /// Record field set by this transition.
    #[must_use]
    pub const fn mutated_field(&self) -> &'static str {
        match self {
            Self::CreateLoc => "importBankId",
            Self::ApproveLoc => "exportBankId",
            Self::InitiateShipment => "deliveryDate",
            Self::DeliverGoods => "shipperId",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation_name())
    }
}
