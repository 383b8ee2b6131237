//! Trade Aggregate Root
//!
//! The Trade aggregate is the single record of a trade-finance workflow.
//! Each mutating method is one lifecycle transition: it checks the required
//! status, sets exactly one field, advances the status and records an event.
//! A rejected transition leaves the aggregate untouched.

use chrono::NaiveDate;

use crate::domain::shared::{
    Amount, BankId, DomainError, ShipperId, SkuId, TaxId, Timestamp, TradeId,
};
use crate::domain::trade_lifecycle::errors::TradeError;
use crate::domain::trade_lifecycle::events::{
    GoodsDelivered, LocApproved, LocCreated, ShipmentInitiated, TradeCreated, TradeEvent,
};
use crate::domain::trade_lifecycle::services::TradeStateMachine;
use crate::domain::trade_lifecycle::value_objects::{TradeStatus, Transition};

/// Command to create a new trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTradeCommand {
    /// Caller-supplied trade identifier (ledger key).
    pub trade_id: TradeId,
    /// Buyer tax identifier.
    pub buyer_tax_id: TaxId,
    /// Seller tax identifier.
    pub seller_tax_id: TaxId,
    /// Traded SKU.
    pub sku_id: SkuId,
    /// Goods price in minor units.
    pub trade_price: Amount,
    /// Shipping price in minor units.
    pub shipping_price: Amount,
}

impl CreateTradeCommand {
    /// Validate the command parameters.
    ///
    /// # Errors
    ///
    /// Returns `TradeError::InvalidParameters` for blank identifiers or
    /// negative prices.
    pub fn validate(&self) -> Result<(), TradeError> {
        self.trade_id.ensure_present("trade_id")?;
        self.buyer_tax_id.ensure_present("buyer_tax_id")?;
        self.seller_tax_id.ensure_present("seller_tax_id")?;
        self.sku_id.ensure_present("sku_id")?;
        self.trade_price.ensure_non_negative("trade_price")?;
        self.shipping_price.ensure_non_negative("shipping_price")?;
        Ok(())
    }

    /// Total price: trade price plus shipping price.
    ///
    /// # Errors
    ///
    /// Returns `TradeError::InvalidParameters` if the sum overflows.
    pub fn total_price(&self) -> Result<Amount, TradeError> {
        self.trade_price
            .checked_add(self.shipping_price)
            .ok_or_else(|| {
                DomainError::Overflow {
                    field: "total_price".to_string(),
                }
                .into()
            })
    }
}

/// Parameters for reconstituting a Trade from storage.
///
/// Used by the record codec to rebuild the aggregate from a decoded blob.
/// No domain events are generated during reconstitution.
#[derive(Debug, Clone)]
pub struct ReconstitutedTradeParams {
    /// Trade identifier.
    pub trade_id: TradeId,
    /// Buyer tax identifier.
    pub buyer_tax_id: TaxId,
    /// Seller tax identifier.
    pub seller_tax_id: TaxId,
    /// Traded SKU.
    pub sku_id: SkuId,
    /// Importing bank, set by LOC creation.
    pub import_bank_id: Option<BankId>,
    /// Exporting bank, set by LOC approval.
    pub export_bank_id: Option<BankId>,
    /// Delivery date, set by shipment initiation.
    pub delivery_date: Option<NaiveDate>,
    /// Shipper, set by delivery.
    pub shipper_id: Option<ShipperId>,
    /// Goods price.
    pub trade_price: Amount,
    /// Shipping price.
    pub shipping_price: Amount,
    /// Total price.
    pub total_price: Amount,
    /// Current status.
    pub status: TradeStatus,
}

/// Trade Aggregate Root.
#[derive(Debug, Clone)]
pub struct Trade {
    id: TradeId,
    buyer_tax_id: TaxId,
    seller_tax_id: TaxId,
    sku_id: SkuId,
    import_bank_id: Option<BankId>,
    export_bank_id: Option<BankId>,
    delivery_date: Option<NaiveDate>,
    shipper_id: Option<ShipperId>,
    trade_price: Amount,
    shipping_price: Amount,
    total_price: Amount,
    status: TradeStatus,
    events: Vec<TradeEvent>,
}

// Pending events are transient and excluded from record equality.
impl PartialEq for Trade {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.buyer_tax_id == other.buyer_tax_id
            && self.seller_tax_id == other.seller_tax_id
            && self.sku_id == other.sku_id
            && self.import_bank_id == other.import_bank_id
            && self.export_bank_id == other.export_bank_id
            && self.delivery_date == other.delivery_date
            && self.shipper_id == other.shipper_id
            && self.trade_price == other.trade_price
            && self.shipping_price == other.shipping_price
            && self.total_price == other.total_price
            && self.status == other.status
    }
}

impl Eq for Trade {}

impl Trade {
    /// Create a new trade in `Initiated` status.
    ///
    /// Generates a `TradeCreated` event.
    ///
    /// # Errors
    ///
    /// Returns error if command validation fails or the total overflows.
    pub fn new(cmd: CreateTradeCommand) -> Result<Self, TradeError> {
        cmd.validate()?;
        let total_price = cmd.total_price()?;

        let mut trade = Self {
            id: cmd.trade_id,
            buyer_tax_id: cmd.buyer_tax_id,
            seller_tax_id: cmd.seller_tax_id,
            sku_id: cmd.sku_id,
            import_bank_id: None,
            export_bank_id: None,
            delivery_date: None,
            shipper_id: None,
            trade_price: cmd.trade_price,
            shipping_price: cmd.shipping_price,
            total_price,
            status: TradeStatus::Initiated,
            events: Vec::new(),
        };

        trade.events.push(TradeEvent::Created(TradeCreated {
            trade_id: trade.id.clone(),
            total_price,
            occurred_at: Timestamp::now(),
        }));

        Ok(trade)
    }

    /// Reconstitute a trade from stored state (no events generated).
    #[must_use]
    pub fn reconstitute(params: ReconstitutedTradeParams) -> Self {
        Self {
            id: params.trade_id,
            buyer_tax_id: params.buyer_tax_id,
            seller_tax_id: params.seller_tax_id,
            sku_id: params.sku_id,
            import_bank_id: params.import_bank_id,
            export_bank_id: params.export_bank_id,
            delivery_date: params.delivery_date,
            shipper_id: params.shipper_id,
            trade_price: params.trade_price,
            shipping_price: params.shipping_price,
            total_price: params.total_price,
            status: params.status,
            events: Vec::new(),
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the trade ID.
    #[must_use]
    pub const fn id(&self) -> &TradeId {
        &self.id
    }

    /// Get the buyer tax ID.
    #[must_use]
    pub const fn buyer_tax_id(&self) -> &TaxId {
        &self.buyer_tax_id
    }

    /// Get the seller tax ID.
    #[must_use]
    pub const fn seller_tax_id(&self) -> &TaxId {
        &self.seller_tax_id
    }

    /// Get the SKU.
    #[must_use]
    pub const fn sku_id(&self) -> &SkuId {
        &self.sku_id
    }

    /// Get the importing bank, once the LOC is created.
    #[must_use]
    pub const fn import_bank_id(&self) -> Option<&BankId> {
        self.import_bank_id.as_ref()
    }

    /// Get the exporting bank, once the LOC is approved.
    #[must_use]
    pub const fn export_bank_id(&self) -> Option<&BankId> {
        self.export_bank_id.as_ref()
    }

    /// Get the delivery date, once shipment is initiated.
    #[must_use]
    pub const fn delivery_date(&self) -> Option<NaiveDate> {
        self.delivery_date
    }

    /// Get the shipper, once goods are delivered.
    #[must_use]
    pub const fn shipper_id(&self) -> Option<&ShipperId> {
        self.shipper_id.as_ref()
    }

    /// Get the goods price.
    #[must_use]
    pub const fn trade_price(&self) -> Amount {
        self.trade_price
    }

    /// Get the shipping price.
    #[must_use]
    pub const fn shipping_price(&self) -> Amount {
        self.shipping_price
    }

    /// Get the total price.
    #[must_use]
    pub const fn total_price(&self) -> Amount {
        self.total_price
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> TradeStatus {
        self.status
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Issue the letter of credit (`Initiated` -> `LOCCreated`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not `Initiated`, or `InvalidParameters`
    /// for a blank bank ID.
    pub fn create_loc(&mut self, import_bank_id: BankId) -> Result<(), TradeError> {
        let next = self.guard(Transition::CreateLoc)?;
        import_bank_id.ensure_present("import_bank_id")?;

        self.import_bank_id = Some(import_bank_id.clone());
        self.status = next;
        self.events.push(TradeEvent::LocCreated(LocCreated {
            trade_id: self.id.clone(),
            import_bank_id,
            occurred_at: Timestamp::now(),
        }));
        Ok(())
    }

    /// Approve the letter of credit (`LOCCreated` -> `LOCApproved`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not `LOCCreated`, or `InvalidParameters`
    /// for a blank bank ID.
    pub fn approve_loc(&mut self, export_bank_id: BankId) -> Result<(), TradeError> {
        let next = self.guard(Transition::ApproveLoc)?;
        export_bank_id.ensure_present("export_bank_id")?;

        self.export_bank_id = Some(export_bank_id.clone());
        self.status = next;
        self.events.push(TradeEvent::LocApproved(LocApproved {
            trade_id: self.id.clone(),
            export_bank_id,
            occurred_at: Timestamp::now(),
        }));
        Ok(())
    }

    /// Start the shipment (`LOCApproved` -> `ShipmentInitiated`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not `LOCApproved`.
    pub fn initiate_shipment(&mut self, delivery_date: NaiveDate) -> Result<(), TradeError> {
        let next = self.guard(Transition::InitiateShipment)?;

        self.delivery_date = Some(delivery_date);
        self.status = next;
        self.events
            .push(TradeEvent::ShipmentInitiated(ShipmentInitiated {
                trade_id: self.id.clone(),
                delivery_date,
                occurred_at: Timestamp::now(),
            }));
        Ok(())
    }

    /// Deliver the goods (`ShipmentInitiated` -> `BOLCreated`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not `ShipmentInitiated`, or
    /// `InvalidParameters` for a blank shipper ID.
    pub fn deliver_goods(&mut self, shipper_id: ShipperId) -> Result<(), TradeError> {
        let next = self.guard(Transition::DeliverGoods)?;
        shipper_id.ensure_present("shipper_id")?;

        self.shipper_id = Some(shipper_id.clone());
        self.status = next;
        self.events.push(TradeEvent::GoodsDelivered(GoodsDelivered {
            trade_id: self.id.clone(),
            shipper_id,
            occurred_at: Timestamp::now(),
        }));
        Ok(())
    }

    fn guard(&self, transition: Transition) -> Result<TradeStatus, TradeError> {
        TradeStateMachine::validate(&self.id, transition, self.status)
    }

    // ========================================================================
    // Integrity
    // ========================================================================

    /// Check the record invariants that must hold for any stored trade.
    ///
    /// Identifiers are present, prices are non-negative, the total matches,
    /// and each transition field is set exactly when its status was reached.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_integrity(&self) -> Result<(), String> {
        let present = [
            self.id.ensure_present("tradeId"),
            self.buyer_tax_id.ensure_present("buyerTaxId"),
            self.seller_tax_id.ensure_present("sellerTaxId"),
            self.sku_id.ensure_present("skuId"),
            self.trade_price.ensure_non_negative("tradePrice"),
            self.shipping_price.ensure_non_negative("shippingPrice"),
        ];
        for check in present {
            check.map_err(|e| e.to_string())?;
        }

        if self.trade_price.checked_add(self.shipping_price) != Some(self.total_price) {
            return Err(format!(
                "totalPrice {} does not equal tradePrice {} + shippingPrice {}",
                self.total_price.minor_units(),
                self.trade_price.minor_units(),
                self.shipping_price.minor_units()
            ));
        }

        let blank_bank = |bank: Option<&BankId>| bank.is_some_and(BankId::is_blank);
        if blank_bank(self.import_bank_id.as_ref()) || blank_bank(self.export_bank_id.as_ref()) {
            return Err("bank identifiers must not be empty".to_string());
        }
        if self.shipper_id.as_ref().is_some_and(ShipperId::is_blank) {
            return Err("shipperId must not be empty".to_string());
        }

        let fields = [
            (Transition::CreateLoc, self.import_bank_id.is_some()),
            (Transition::ApproveLoc, self.export_bank_id.is_some()),
            (Transition::InitiateShipment, self.delivery_date.is_some()),
            (Transition::DeliverGoods, self.shipper_id.is_some()),
        ];
        for (transition, is_set) in fields {
            let expected = self.status.has_reached(transition.target_status());
            if is_set != expected {
                return Err(format!(
                    "{} is {} but status is {}",
                    transition.mutated_field(),
                    if is_set { "set" } else { "missing" },
                    self.status
                ));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Events recorded since the trade was created or last drained.
    #[must_use]
    pub fn pending_events(&self) -> &[TradeEvent] {
        &self.events
    }

    /// Take all pending events.
    pub fn drain_events(&mut self) -> Vec<TradeEvent> {
        std::mem::take(&mut self.events)
    }
}
