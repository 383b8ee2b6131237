//! Trade Lifecycle Bounded Context
//!
//! Manages a trade from initiation to the bill of lading:
//!
//! ```text
//! Initiated -> LOCCreated -> LOCApproved -> ShipmentInitiated -> BOLCreated
//! ```
//!
//! # Key Concepts
//!
//! - **Trade Aggregate**: The single record whose status drives every guard
//! - **Transition Table**: Each transition has exactly one required status
//! - **Record Codec**: Stable JSON blob format used as the ledger value

pub mod aggregate;
pub mod codec;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;

pub use aggregate::{CreateTradeCommand, ReconstitutedTradeParams, Trade};
pub use codec::RecordCodec;
pub use errors::TradeError;
pub use events::{
    GoodsDelivered, LocApproved, LocCreated, ShipmentInitiated, TradeCreated, TradeEvent,
};
pub use services::TradeStateMachine;
pub use value_objects::{ParseTradeStatusError, TradeStatus, Transition};
