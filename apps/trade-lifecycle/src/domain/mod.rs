//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Events**: Records of state transitions
//! - **Domain Services**: Stateless business logic
//! - **Record Codec**: Stable byte format for ledger storage
//!
//! # Bounded Contexts
//!
//! - [`trade_lifecycle`]: Trade record lifecycle (LOC, shipment, bill of lading)

pub mod shared;
pub mod trade_lifecycle;
