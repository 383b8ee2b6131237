//! Domain events for the trade lifecycle.
//!
//! One event per committed transition. Events are not part of the stored
//! record; they are drained from the aggregate after a successful write.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::value_objects::TradeStatus;
use crate::domain::shared::{Amount, BankId, ShipperId, Timestamp, TradeId};

/// All possible trade events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeEvent {
    /// Trade created.
    Created(TradeCreated),
    /// Letter of credit issued.
    LocCreated(LocCreated),
    /// Letter of credit approved.
    LocApproved(LocApproved),
    /// Shipment started.
    ShipmentInitiated(ShipmentInitiated),
    /// Goods delivered, bill of lading created.
    GoodsDelivered(GoodsDelivered),
}

impl TradeEvent {
    /// Get the trade ID for this event.
    #[must_use]
    pub const fn trade_id(&self) -> &TradeId {
        match self {
            Self::Created(e) => &e.trade_id,
            Self::LocCreated(e) => &e.trade_id,
            Self::LocApproved(e) => &e.trade_id,
            Self::ShipmentInitiated(e) => &e.trade_id,
            Self::GoodsDelivered(e) => &e.trade_id,
        }
    }

    /// Get the timestamp when this event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> Timestamp {
        match self {
            Self::Created(e) => e.occurred_at,
            Self::LocCreated(e) => e.occurred_at,
            Self::LocApproved(e) => e.occurred_at,
            Self::ShipmentInitiated(e) => e.occurred_at,
            Self::GoodsDelivered(e) => e.occurred_at,
        }
    }

    /// Status the trade reached with this event.
    #[must_use]
    pub const fn status(&self) -> TradeStatus {
        match self {
            Self::Created(_) => TradeStatus::Initiated,
            Self::LocCreated(_) => TradeStatus::LocCreated,
            Self::LocApproved(_) => TradeStatus::LocApproved,
            Self::ShipmentInitiated(_) => TradeStatus::ShipmentInitiated,
            Self::GoodsDelivered(_) => TradeStatus::BolCreated,
        }
    }

    /// Get the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Created(_) => "TRADE_CREATED",
            Self::LocCreated(_) => "LOC_CREATED",
            Self::LocApproved(_) => "LOC_APPROVED",
            Self::ShipmentInitiated(_) => "SHIPMENT_INITIATED",
            Self::GoodsDelivered(_) => "GOODS_DELIVERED",
        }
    }
}

/// Event: Trade created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCreated {
    /// Trade ID.
    pub trade_id: TradeId,
    /// Total price (trade + shipping).
    pub total_price: Amount,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: Letter of credit issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocCreated {
    /// Trade ID.
    pub trade_id: TradeId,
    /// Issuing (importing) bank.
    pub import_bank_id: BankId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: Letter of credit approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocApproved {
    /// Trade ID.
    pub trade_id: TradeId,
    /// Approving (exporting) bank.
    pub export_bank_id: BankId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: Shipment started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentInitiated {
    /// Trade ID.
    pub trade_id: TradeId,
    /// Promised delivery date.
    pub delivery_date: NaiveDate,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: Goods delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsDelivered {
    /// Trade ID.
    pub trade_id: TradeId,
    /// Delivering shipper.
    pub shipper_id: ShipperId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}
