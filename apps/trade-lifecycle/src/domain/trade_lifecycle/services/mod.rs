//! Domain services for the trade lifecycle.

mod trade_state_machine;

pub use trade_state_machine::TradeStateMachine;
