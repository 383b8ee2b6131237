//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod amount;
mod identifiers;
mod timestamp;

pub use amount::Amount;
pub use identifiers::{BankId, ShipperId, SkuId, TaxId, TradeId};
pub use timestamp::Timestamp;
