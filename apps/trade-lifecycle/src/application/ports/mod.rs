//! Application Ports (Driven)
//!
//! Ports define the outbound interfaces the engine depends on:
//! - **Ledger Store**: Key-value storage for trade records
//! - **Event Publisher**: Sink for domain events after a commit

mod event_publisher_port;
mod ledger_port;

pub use event_publisher_port::{EventPublishError, EventPublisherPort, NoOpEventPublisher};
pub use ledger_port::{LedgerError, LedgerStore};
