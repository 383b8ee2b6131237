//! API error handling for the trade lifecycle service.
//!
//! Every engine or dispatch failure is rendered as an [`ApiError`]: a stable
//! [`ErrorCode`], a human-readable message, and key-value context.
//!
//! # HTTP Status Codes
//!
//! | Code | Status |
//! |------|--------|
//! | `TRADE_NOT_FOUND` | 404 |
//! | `TRADE_ALREADY_EXISTS` | 409 |
//! | `INVALID_TRANSITION` | 409 |
//! | `INVALID_PARAMETERS` | 400 |
//! | `UNKNOWN_FUNCTION` | 400 |
//! | `INVALID_ARGUMENTS` | 400 |
//! | `MALFORMED_RECORD` | 500 |
//! | `STORE_UNAVAILABLE` | 503 |

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::dispatch::DispatchError;
use crate::domain::trade_lifecycle::TradeError;

/// Error codes for the trade lifecycle service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Not found
    /// No record under the trade key.
    TradeNotFound,

    // Conflict
    /// A record already exists under the trade key.
    TradeAlreadyExists,
    /// The trade is not in the status the operation requires.
    InvalidTransition,

    // Validation
    /// A parameter failed domain validation.
    InvalidParameters,
    /// No function with the requested name.
    UnknownFunction,
    /// Wrong arity or unparsable argument.
    InvalidArguments,

    // Internal
    /// The stored blob is not a valid trade record.
    MalformedRecord,
    /// The ledger store failed.
    StoreUnavailable,
}

impl ErrorCode {
    /// Get the HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::TradeNotFound => StatusCode::NOT_FOUND,
            Self::TradeAlreadyExists | Self::InvalidTransition => StatusCode::CONFLICT,
            Self::InvalidParameters | Self::UnknownFunction | Self::InvalidArguments => {
                StatusCode::BAD_REQUEST
            }
            Self::MalformedRecord => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::TradeNotFound => "TRADE_NOT_FOUND",
            Self::TradeAlreadyExists => "TRADE_ALREADY_EXISTS",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::InvalidParameters => "INVALID_PARAMETERS",
            Self::UnknownFunction => "UNKNOWN_FUNCTION",
            Self::InvalidArguments => "INVALID_ARGUMENTS",
            Self::MalformedRecord => "MALFORMED_RECORD",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A coded error with context, ready to render at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    context: BTreeMap<String, String>,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub const fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }
}

impl From<TradeError> for ApiError {
    fn from(err: TradeError) -> Self {
        let message = err.to_string();
        match err {
            TradeError::TradeNotFound { trade_id } => {
                Self::new(ErrorCode::TradeNotFound, message).with_context("trade_id", trade_id)
            }
            TradeError::TradeAlreadyExists { trade_id } => {
                Self::new(ErrorCode::TradeAlreadyExists, message).with_context("trade_id", trade_id)
            }
            TradeError::MalformedRecord { trade_id, reason } => {
                Self::new(ErrorCode::MalformedRecord, message)
                    .with_context("trade_id", trade_id)
                    .with_context("reason", reason)
            }
            TradeError::InvalidTransition {
                trade_id,
                current,
                required,
            } => Self::new(ErrorCode::InvalidTransition, message)
                .with_context("trade_id", trade_id)
                .with_context("current_status", current.as_str())
                .with_context("required_status", required.as_str()),
            TradeError::StoreUnavailable { .. } => Self::new(ErrorCode::StoreUnavailable, message),
            TradeError::InvalidParameters { field, .. } => {
                Self::new(ErrorCode::InvalidParameters, message).with_context("field", field)
            }
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        let message = err.to_string();
        match err {
            DispatchError::UnknownFunction { function } => {
                Self::new(ErrorCode::UnknownFunction, message).with_context("function", function)
            }
            DispatchError::InvalidArguments {
                function, expected, ..
            } => Self::new(ErrorCode::InvalidArguments, message)
                .with_context("function", function)
                .with_context("expected", expected),
            DispatchError::Trade(err) => err.into(),
        }
    }
}
