//! Trade Lifecycle Use Case
//!
//! Every operation reads the trade from the ledger, decides on that value,
//! and writes the whole record back under the same key. The engine keeps no
//! trade state between calls and takes no locks.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::ports::{EventPublisherPort, LedgerStore};
use crate::domain::shared::{BankId, ShipperId, TradeId};
use crate::domain::trade_lifecycle::{
    CreateTradeCommand, RecordCodec, Trade, TradeError, TradeStatus, Transition,
};

/// Engine for the trade lifecycle state machine.
pub struct TradeLifecycleEngine<L, E>
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    ledger: Arc<L>,
    event_publisher: Arc<E>,
}

impl<L, E> TradeLifecycleEngine<L, E>
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    /// Create a new engine over a ledger and event publisher.
    pub const fn new(ledger: Arc<L>, event_publisher: Arc<E>) -> Self {
        Self {
            ledger,
            event_publisher,
        }
    }

    /// Create a new trade in `Initiated` status.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` for a bad command, `TradeAlreadyExists` if the key
    /// is taken, `StoreUnavailable` if the ledger fails.
    pub async fn create_trade(&self, cmd: CreateTradeCommand) -> Result<Trade, TradeError> {
        let mut trade = Trade::new(cmd)?;

        if self.read(trade.id()).await?.is_some() {
            tracing::warn!(trade_id = %trade.id(), "Trade already exists");
            return Err(TradeError::TradeAlreadyExists {
                trade_id: trade.id().to_string(),
            });
        }

        self.commit(&mut trade).await?;
        tracing::info!(
            trade_id = %trade.id(),
            total_price = %trade.total_price(),
            status = %trade.status(),
            "Trade created"
        );
        Ok(trade)
    }

    /// Issue the letter of credit.
    ///
    /// # Errors
    ///
    /// `TradeNotFound`, `MalformedRecord`, `InvalidTransition`,
    /// `InvalidParameters` or `StoreUnavailable`.
    pub async fn create_loc(
        &self,
        trade_id: &TradeId,
        import_bank_id: BankId,
    ) -> Result<Trade, TradeError> {
        self.transition(trade_id, Transition::CreateLoc, |trade| {
            trade.create_loc(import_bank_id)
        })
        .await
    }

    /// Approve the letter of credit.
    ///
    /// # Errors
    ///
    /// `TradeNotFound`, `MalformedRecord`, `InvalidTransition`,
    /// `InvalidParameters` or `StoreUnavailable`.
    pub async fn approve_loc(
        &self,
        trade_id: &TradeId,
        export_bank_id: BankId,
    ) -> Result<Trade, TradeError> {
        self.transition(trade_id, Transition::ApproveLoc, |trade| {
            trade.approve_loc(export_bank_id)
        })
        .await
    }

    /// Start the shipment.
    ///
    /// # Errors
    ///
    /// `TradeNotFound`, `MalformedRecord`, `InvalidTransition` or
    /// `StoreUnavailable`.
    pub async fn initiate_shipment(
        &self,
        trade_id: &TradeId,
        delivery_date: NaiveDate,
    ) -> Result<Trade, TradeError> {
        self.transition(trade_id, Transition::InitiateShipment, |trade| {
            trade.initiate_shipment(delivery_date)
        })
        .await
    }

    /// Deliver the goods and create the bill of lading.
    ///
    /// # Errors
    ///
    /// `TradeNotFound`, `MalformedRecord`, `InvalidTransition`,
    /// `InvalidParameters` or `StoreUnavailable`.
    pub async fn deliver_goods(
        &self,
        trade_id: &TradeId,
        shipper_id: ShipperId,
    ) -> Result<Trade, TradeError> {
        self.transition(trade_id, Transition::DeliverGoods, |trade| {
            trade.deliver_goods(shipper_id)
        })
        .await
    }

    /// Read the full trade record.
    ///
    /// # Errors
    ///
    /// `TradeNotFound`, `MalformedRecord` or `StoreUnavailable`.
    pub async fn query(&self, trade_id: &TradeId) -> Result<Trade, TradeError> {
        self.load(trade_id).await
    }

    /// Read only the trade's status.
    ///
    /// # Errors
    ///
    /// `TradeNotFound`, `MalformedRecord` or `StoreUnavailable`.
    pub async fn query_status(&self, trade_id: &TradeId) -> Result<TradeStatus, TradeError> {
        Ok(self.load(trade_id).await?.status())
    }

    async fn transition<F>(
        &self,
        trade_id: &TradeId,
        transition: Transition,
        apply: F,
    ) -> Result<Trade, TradeError>
    where
        F: FnOnce(&mut Trade) -> Result<(), TradeError> + Send,
    {
        let mut trade = self.load(trade_id).await?;
        let from = trade.status();

        if let Err(e) = apply(&mut trade) {
            tracing::warn!(
                trade_id = %trade_id,
                operation = transition.operation_name(),
                status = %from,
                error = %e,
                "Transition rejected"
            );
            return Err(e);
        }

        self.commit(&mut trade).await?;
        tracing::info!(
            trade_id = %trade_id,
            operation = transition.operation_name(),
            from = %from,
            to = %trade.status(),
            "Transition committed"
        );
        Ok(trade)
    }

    async fn load(&self, trade_id: &TradeId) -> Result<Trade, TradeError> {
        let Some(blob) = self.read(trade_id).await? else {
            tracing::debug!(trade_id = %trade_id, "Trade not found");
            return Err(TradeError::TradeNotFound {
                trade_id: trade_id.to_string(),
            });
        };

        RecordCodec::decode(trade_id, &blob).inspect_err(|e| {
            tracing::error!(trade_id = %trade_id, error = %e, "Malformed trade record");
        })
    }

    async fn read(&self, trade_id: &TradeId) -> Result<Option<Vec<u8>>, TradeError> {
        tracing::debug!(trade_id = %trade_id, "Reading trade record");
        self.ledger.get(trade_id.as_str()).await.map_err(|e| {
            tracing::error!(trade_id = %trade_id, error = %e, "Ledger read failed");
            TradeError::from(e)
        })
    }

    async fn commit(&self, trade: &mut Trade) -> Result<(), TradeError> {
        let blob = RecordCodec::encode(trade);
        self.ledger
            .put(trade.id().as_str(), blob)
            .await
            .map_err(|e| {
                tracing::error!(trade_id = %trade.id(), error = %e, "Ledger write failed");
                TradeError::from(e)
            })?;

        // The write is committed; a publish failure must not undo it.
        let events = trade.drain_events();
        if let Err(e) = self.event_publisher.publish_trade_events(events).await {
            tracing::error!(trade_id = %trade.id(), error = %e, "Failed to publish events");
        }
        Ok(())
    }
}
