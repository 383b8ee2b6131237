//! Trade State Machine Service
//!
//! Validates lifecycle transitions against the fixed transition table.

use crate::domain::shared::TradeId;
use crate::domain::trade_lifecycle::errors::TradeError;
use crate::domain::trade_lifecycle::value_objects::{TradeStatus, Transition};

/// Trade State Machine for validating transitions.
///
/// The lifecycle is linear: every status has at most one successor and no
/// transition regresses or skips a status.
pub struct TradeStateMachine;

impl TradeStateMachine {
    /// Check if moving from `from` to `to` is a valid transition.
    #[must_use]
    pub const fn is_valid_transition(from: TradeStatus, to: TradeStatus) -> bool {
        matches!(
            (from, to),
            (TradeStatus::Initiated, TradeStatus::LocCreated)
                | (TradeStatus::LocCreated, TradeStatus::LocApproved)
                | (TradeStatus::LocApproved, TradeStatus::ShipmentInitiated)
                | (TradeStatus::ShipmentInitiated, TradeStatus::BolCreated)
        )
    }

    /// Validate that `transition` may fire on a trade in `current` status.
    ///
    /// Returns the status the trade moves to.
    ///
    /// # Errors
    ///
    /// Returns `TradeError::InvalidTransition` if `current` is not the
    /// transition's required status.
    pub fn validate(
        trade_id: &TradeId,
        transition: Transition,
        current: TradeStatus,
    ) -> Result<TradeStatus, TradeError> {
        let required = transition.required_status();
        let target = transition.target_status();
        if current != required || !Self::is_valid_transition(current, target) {
            return Err(TradeError::InvalidTransition {
                trade_id: trade_id.to_string(),
                current,
                required,
            });
        }
        Ok(target)
    }

    /// The transition that can fire from `current`, if any.
    #[must_use]
    pub fn transition_from(current: TradeStatus) -> Option<Transition> {
        Transition::ALL
            .into_iter()
            .find(|transition| transition.required_status() == current)
    }

    /// The status that follows `current`, if any.
    #[must_use]
    pub fn next_status(current: TradeStatus) -> Option<TradeStatus> {
        Self::transition_from(current).map(|transition| transition.target_status())
    }
}
