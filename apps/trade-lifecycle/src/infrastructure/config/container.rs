//! Dependency Injection Container
//!
//! Manages creation and wiring of the engine, dispatcher and HTTP state.

use std::sync::Arc;

use crate::application::dispatch::InvocationDispatcher;
use crate::application::ports::{EventPublisherPort, LedgerStore};
use crate::application::use_cases::TradeLifecycleEngine;
use crate::domain::shared::{Amount, SkuId, TaxId, TradeId};
use crate::domain::trade_lifecycle::{CreateTradeCommand, TradeError};
use crate::infrastructure::http::AppState;

/// The fixture trade created when demo seeding is enabled.
#[must_use]
pub fn demo_trade_command() -> CreateTradeCommand {
    CreateTradeCommand {
        trade_id: TradeId::new("FTE_1"),
        buyer_tax_id: TaxId::new("FTE_B_1"),
        seller_tax_id: TaxId::new("FTE_S_1"),
        sku_id: SkuId::new("SKU001"),
        trade_price: Amount::from_minor_units(10_000),
        shipping_price: Amount::from_minor_units(1_000),
    }
}

/// Dependency injection container.
///
/// Wires the ports into the single engine and dispatcher instances.
/// The dispatcher must be shared so every caller goes through one commit gate.
pub struct Container<L, E>
where
    L: LedgerStore + 'static,
    E: EventPublisherPort + 'static,
{
    engine: Arc<TradeLifecycleEngine<L, E>>,
    dispatcher: Arc<InvocationDispatcher<L, E>>,
}

impl<L, E> Container<L, E>
where
    L: LedgerStore + 'static,
    E: EventPublisherPort + 'static,
{
    /// Create a new container with all dependencies.
    pub fn new(ledger: Arc<L>, event_publisher: Arc<E>) -> Self {
        let engine = Arc::new(TradeLifecycleEngine::new(ledger, event_publisher));
        let dispatcher = Arc::new(InvocationDispatcher::new(Arc::clone(&engine)));
        Self { engine, dispatcher }
    }

    /// Get the lifecycle engine.
    pub fn engine(&self) -> Arc<TradeLifecycleEngine<L, E>> {
        Arc::clone(&self.engine)
    }

    /// Get the shared dispatcher.
    pub fn dispatcher(&self) -> Arc<InvocationDispatcher<L, E>> {
        Arc::clone(&self.dispatcher)
    }

    /// Build the HTTP application state.
    pub fn app_state(&self, version: impl Into<String>) -> AppState<L, E> {
        AppState {
            dispatcher: self.dispatcher(),
            version: version.into(),
        }
    }

    /// Create the demo trade unless it already exists.
    ///
    /// Returns true if the trade was created.
    ///
    /// # Errors
    ///
    /// Returns `TradeError` for any failure other than an existing trade.
    pub async fn seed_demo_trade(&self) -> Result<bool, TradeError> {
        match self.engine.create_trade(demo_trade_command()).await {
            Ok(trade) => {
                tracing::info!(trade_id = %trade.id(), "Seeded demo trade");
                Ok(true)
            }
            Err(TradeError::TradeAlreadyExists { trade_id }) => {
                tracing::info!(trade_id = %trade_id, "Demo trade already present");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
