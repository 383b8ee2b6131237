//! Trade lifecycle errors.

use thiserror::Error;

use super::value_objects::TradeStatus;
use crate::domain::shared::DomainError;

/// Errors surfaced by trade lifecycle operations.
///
/// Every variant carries enough context (key, statuses) for the caller to
/// decide whether to retry or abandon. None are recovered from internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    /// No record is stored under the trade identifier.
    #[error("Trade not found: {trade_id}")]
    TradeNotFound {
        /// Trade identifier.
        trade_id: String,
    },

    /// A record already exists under the trade identifier.
    #[error("Trade already exists: {trade_id}")]
    TradeAlreadyExists {
        /// Trade identifier.
        trade_id: String,
    },

    /// The stored blob does not decode into a valid trade record.
    #[error("Malformed trade record at key '{trade_id}': {reason}")]
    MalformedRecord {
        /// Ledger key of the offending blob.
        trade_id: String,
        /// Decode or integrity failure.
        reason: String,
    },

    /// The trade is not in the status the transition requires.
    #[error(
        "Invalid transition for trade {trade_id}: current status {current}, required {required}"
    )]
    InvalidTransition {
        /// Trade identifier.
        trade_id: String,
        /// Current status.
        current: TradeStatus,
        /// Status required by the transition.
        required: TradeStatus,
    },

    /// The ledger store failed to read or write.
    #[error("Ledger store unavailable: {reason}")]
    StoreUnavailable {
        /// Underlying store failure.
        reason: String,
    },

    /// Caller-supplied trade data is invalid.
    #[error("Invalid trade parameter '{field}': {message}")]
    InvalidParameters {
        /// Field with invalid value.
        field: String,
        /// Error message.
        message: String,
    },
}

impl TradeError {
    /// Trade identifier the error refers to, if any.
    #[must_use]
    pub fn trade_id(&self) -> Option<&str> {
        match self {
            Self::TradeNotFound { trade_id }
            | Self::TradeAlreadyExists { trade_id }
            | Self::MalformedRecord { trade_id, .. }
            | Self::InvalidTransition { trade_id, .. } => Some(trade_id),
            Self::StoreUnavailable { .. } | Self::InvalidParameters { .. } => None,
        }
    }
}

impl From<DomainError> for TradeError {
    fn from(err: DomainError) -> Self {
        let field = err.field().to_string();
        match err {
            DomainError::InvalidValue { message, .. } => Self::InvalidParameters { field, message },
            DomainError::Overflow { .. } => Self::InvalidParameters {
                field,
                message: "arithmetic overflow".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_display_names_both_statuses() {
        let err = TradeError::InvalidTransition {
            trade_id: "T1".to_string(),
            current: TradeStatus::BolCreated,
            required: TradeStatus::Initiated,
        };
        let msg = err.to_string();
        assert!(msg.contains("T1"));
        assert!(msg.contains("BOLCreated"));
        assert!(msg.contains("Initiated"));
    }

    #[test]
    fn malformed_record_display_names_key() {
        let err = TradeError::MalformedRecord {
            trade_id: "T9".to_string(),
            reason: "expected value at line 1".to_string(),
        };
        assert!(err.to_string().contains("'T9'"));
        assert_eq!(err.trade_id(), Some("T9"));
    }

    #[test]
    fn store_errors_have_no_trade_id() {
        let err = TradeError::StoreUnavailable {
            reason: "disk full".to_string(),
        };
        assert_eq!(err.trade_id(), None);
    }

    #[test]
    fn domain_error_maps_to_invalid_parameters() {
        let err: TradeError = DomainError::Overflow {
            field: "total_price".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            TradeError::InvalidParameters { ref field, .. } if field == "total_price"
        ));
    }

    #[test]
    fn trade_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(TradeError::TradeNotFound {
            trade_id: "T_UNKNOWN".to_string(),
        });
        assert!(err.to_string().contains("T_UNKNOWN"));
    }
}
