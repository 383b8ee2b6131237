//! Trade aggregate.

mod trade;

pub use trade::{CreateTradeCommand, ReconstitutedTradeParams, Trade};
