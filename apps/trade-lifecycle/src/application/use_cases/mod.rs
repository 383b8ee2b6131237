//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod trade_lifecycle;

pub use trade_lifecycle::TradeLifecycleEngine;
