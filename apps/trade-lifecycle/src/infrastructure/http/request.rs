//! HTTP request DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Generic named-function invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeRequest {
    /// Function name, e.g. `createLOC`.
    pub function: String,
    /// Positional string arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Request to issue a letter of credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocRequest {
    /// Importing bank.
    pub import_bank_id: String,
}

/// Request to approve a letter of credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveLocRequest {
    /// Exporting bank.
    pub export_bank_id: String,
}

/// Request to start the shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiateShipmentRequest {
    /// Expected delivery date (`YYYY-MM-DD`).
    pub delivery_date: NaiveDate,
}

/// Request to deliver the goods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverGoodsRequest {
    /// Shipper.
    pub shipper_id: String,
}
