//! Strongly-typed identifiers for trade participants and records.
//!
//! These prevent mixing up a bank identifier with a tax identifier and so on.
//! All identifiers are caller-supplied; none are generated by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Returns true if the identifier is empty or whitespace only.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Reject blank identifiers.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::InvalidValue` naming `field` if blank.
            pub fn ensure_present(&self, field: &str) -> Result<(), DomainError> {
                if self.is_blank() {
                    return Err(DomainError::InvalidValue {
                        field: field.to_string(),
                        message: "must not be empty".to_string(),
                    });
                }
                Ok(())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(
    TradeId,
    "Unique identifier for a trade; doubles as its ledger storage key."
);
define_id!(TaxId, "Tax identifier of a buyer or seller.");
define_id!(SkuId, "Stock keeping unit of the traded goods.");
define_id!(BankId, "Identifier of an importing or exporting bank.");
define_id!(ShipperId, "Identifier of the shipper that delivered the goods.");
