//! Trade DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Amount, SkuId, TaxId, TradeId};
use crate::domain::trade_lifecycle::{CreateTradeCommand, Trade, TradeStateMachine, TradeStatus};

/// DTO for creating a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTradeDto {
    /// Trade ID (ledger key).
    pub trade_id: String,
    /// Buyer tax ID.
    pub buyer_tax_id: String,
    /// Seller tax ID.
    pub seller_tax_id: String,
    /// SKU.
    pub sku_id: String,
    /// Goods price in minor units.
    pub trade_price: i64,
    /// Shipping price in minor units.
    pub shipping_price: i64,
}

impl CreateTradeDto {
    /// Convert to the domain command.
    #[must_use]
    pub fn into_command(self) -> CreateTradeCommand {
        CreateTradeCommand {
            trade_id: TradeId::new(self.trade_id),
            buyer_tax_id: TaxId::new(self.buyer_tax_id),
            seller_tax_id: TaxId::new(self.seller_tax_id),
            sku_id: SkuId::new(self.sku_id),
            trade_price: Amount::from_minor_units(self.trade_price),
            shipping_price: Amount::from_minor_units(self.shipping_price),
        }
    }
}

/// DTO representing a trade record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeDto {
    /// Trade ID.
    pub trade_id: String,
    /// Buyer tax ID.
    pub buyer_tax_id: String,
    /// Seller tax ID.
    pub seller_tax_id: String,
    /// SKU.
    pub sku_id: String,
    /// Importing bank.
    pub import_bank_id: Option<String>,
    /// Exporting bank.
    pub export_bank_id: Option<String>,
    /// Delivery date.
    pub delivery_date: Option<NaiveDate>,
    /// Shipper.
    pub shipper_id: Option<String>,
    /// Goods price in minor units.
    pub trade_price: i64,
    /// Shipping price in minor units.
    pub shipping_price: i64,
    /// Total price in minor units.
    pub total_price: i64,
    /// Status.
    pub status: TradeStatus,
    /// Human-readable status.
    pub status_label: String,
}

impl TradeDto {
    /// Create from domain Trade.
    #[must_use]
    pub fn from_trade(trade: &Trade) -> Self {
        Self {
            trade_id: trade.id().to_string(),
            buyer_tax_id: trade.buyer_tax_id().to_string(),
            seller_tax_id: trade.seller_tax_id().to_string(),
            sku_id: trade.sku_id().to_string(),
            import_bank_id: trade.import_bank_id().map(ToString::to_string),
            export_bank_id: trade.export_bank_id().map(ToString::to_string),
            delivery_date: trade.delivery_date(),
            shipper_id: trade.shipper_id().map(ToString::to_string),
            trade_price: trade.trade_price().minor_units(),
            shipping_price: trade.shipping_price().minor_units(),
            total_price: trade.total_price().minor_units(),
            status: trade.status(),
            status_label: trade.status().label().to_string(),
        }
    }
}

/// Status projection of a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeStatusDto {
    /// Trade ID.
    pub trade_id: String,
    /// Status.
    pub status: TradeStatus,
    /// Human-readable status.
    pub status_label: String,
    /// Whether the lifecycle is complete.
    pub terminal: bool,
    /// Status the next transition would reach.
    pub next_status: Option<TradeStatus>,
}

impl TradeStatusDto {
    /// Create from a trade ID and its current status.
    #[must_use]
    pub fn new(trade_id: &TradeId, status: TradeStatus) -> Self {
        Self {
            trade_id: trade_id.to_string(),
            status,
            status_label: status.label().to_string(),
            terminal: status.is_terminal(),
            next_status: TradeStateMachine::next_status(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::BankId;

    fn create_dto() -> CreateTradeDto {
        CreateTradeDto {
            trade_id: "FTE_1".to_string(),
            buyer_tax_id: "FTE_B_1".to_string(),
            seller_tax_id: "FTE_S_1".to_string(),
            sku_id: "SKU001".to_string(),
            trade_price: 10_000,
            shipping_price: 1_000,
        }
    }

    #[test]
    fn create_dto_into_command() {
        let cmd = create_dto().into_command();
        assert_eq!(cmd.trade_id.as_str(), "FTE_1");
        assert_eq!(cmd.trade_price, Amount::from(10_000));
        assert_eq!(cmd.shipping_price, Amount::from(1_000));
    }

    #[test]
    fn trade_dto_from_trade() {
        let mut trade = Trade::new(create_dto().into_command()).unwrap();
        trade.create_loc(BankId::new("BNK_I_1")).unwrap();

        let dto = TradeDto::from_trade(&trade);
        assert_eq!(dto.trade_id, "FTE_1");
        assert_eq!(dto.import_bank_id.as_deref(), Some("BNK_I_1"));
        assert!(dto.export_bank_id.is_none());
        assert_eq!(dto.total_price, 11_000);
        assert_eq!(dto.status, TradeStatus::LocCreated);
        assert_eq!(dto.status_label, "LOC created");
    }

    #[test]
    fn trade_dto_serializes_status_name() {
        let trade = Trade::new(create_dto().into_command()).unwrap();
        let json = serde_json::to_value(TradeDto::from_trade(&trade)).unwrap();
        assert_eq!(json["status"], "Initiated");
        assert_eq!(json["status_label"], "Trade initiated");
    }

    #[test]
    fn status_dto_reports_next_status() {
        let dto = TradeStatusDto::new(&TradeId::new("T1"), TradeStatus::LocApproved);
        assert_eq!(dto.next_status, Some(TradeStatus::ShipmentInitiated));
        assert!(!dto.terminal);

        let done = TradeStatusDto::new(&TradeId::new("T1"), TradeStatus::BolCreated);
        assert!(done.terminal);
        assert!(done.next_status.is_none());
    }
}
