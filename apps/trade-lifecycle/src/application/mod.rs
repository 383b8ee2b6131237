//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces to the ledger store and event sinks
//! - **Use Cases**: The trade lifecycle engine
//! - **Dispatch**: Named-function invocation surface over the engine
//! - **DTOs**: Data transfer objects for API boundaries

pub mod dispatch;
pub mod dto;
pub mod ports;
pub mod use_cases;

pub use dispatch::*;
pub use dto::*;
pub use ports::*;
pub use use_cases::*;
