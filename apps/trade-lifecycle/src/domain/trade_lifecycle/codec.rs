//! Record Codec
//!
//! Converts a [`Trade`] to and from the byte blob stored under its key in the
//! ledger. The blob is a UTF-8 JSON object with camelCase keys. Transition
//! fields are omitted until set, and unknown keys are rejected.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Amount, BankId, ShipperId, SkuId, TaxId, TradeId};
use crate::domain::trade_lifecycle::aggregate::{ReconstitutedTradeParams, Trade};
use crate::domain::trade_lifecycle::errors::TradeError;
use crate::domain::trade_lifecycle::value_objects::TradeStatus;

/// Stored shape of a trade record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StoredTrade {
    trade_id: TradeId,
    buyer_tax_id: TaxId,
    seller_tax_id: TaxId,
    sku_id: SkuId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    import_bank_id: Option<BankId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    export_bank_id: Option<BankId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shipper_id: Option<ShipperId>,
    trade_price: Amount,
    shipping_price: Amount,
    total_price: Amount,
    status: TradeStatus,
}

impl From<&Trade> for StoredTrade {
    fn from(trade: &Trade) -> Self {
        Self {
            trade_id: trade.id().clone(),
            buyer_tax_id: trade.buyer_tax_id().clone(),
            seller_tax_id: trade.seller_tax_id().clone(),
            sku_id: trade.sku_id().clone(),
            import_bank_id: trade.import_bank_id().cloned(),
            export_bank_id: trade.export_bank_id().cloned(),
            delivery_date: trade.delivery_date(),
            shipper_id: trade.shipper_id().cloned(),
            trade_price: trade.trade_price(),
            shipping_price: trade.shipping_price(),
            total_price: trade.total_price(),
            status: trade.status(),
        }
    }
}

impl From<StoredTrade> for ReconstitutedTradeParams {
    fn from(stored: StoredTrade) -> Self {
        Self {
            trade_id: stored.trade_id,
            buyer_tax_id: stored.buyer_tax_id,
            seller_tax_id: stored.seller_tax_id,
            sku_id: stored.sku_id,
            import_bank_id: stored.import_bank_id,
            export_bank_id: stored.export_bank_id,
            delivery_date: stored.delivery_date,
            shipper_id: stored.shipper_id,
            trade_price: stored.trade_price,
            shipping_price: stored.shipping_price,
            total_price: stored.total_price,
            status: stored.status,
        }
    }
}

/// Encoder/decoder for ledger trade records.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordCodec;

impl RecordCodec {
    /// Encode a trade into its ledger blob.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn encode(trade: &Trade) -> Vec<u8> {
        // StoredTrade has only string keys and plain scalar values.
        serde_json::to_vec(&StoredTrade::from(trade)).expect("trade record serializes to JSON")
    }

    /// Decode the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `TradeError::MalformedRecord` if the blob is not a trade
    /// record, names a different trade, or violates record invariants.
    pub fn decode(key: &TradeId, bytes: &[u8]) -> Result<Trade, TradeError> {
        let malformed = |reason: String| TradeError::MalformedRecord {
            trade_id: key.to_string(),
            reason,
        };

        let stored: StoredTrade =
            serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;

        if &stored.trade_id != key {
            return Err(malformed(format!(
                "record names trade '{}'",
                stored.trade_id
            )));
        }

        let trade = Trade::reconstitute(stored.into());
        trade.check_integrity().map_err(malformed)?;
        Ok(trade)
    }
}
