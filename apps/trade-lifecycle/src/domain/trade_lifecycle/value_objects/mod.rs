//! Trade lifecycle value objects.

mod trade_status;
mod transition;

pub use trade_status::{ParseTradeStatusError, TradeStatus};
pub use transition::Transition;
