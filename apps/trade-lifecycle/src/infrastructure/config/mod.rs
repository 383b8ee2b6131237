//! Infrastructure wiring.

mod container;

pub use container::{Container, demo_trade_command};
