//! Event publishing adapters.

use async_trait::async_trait;

use crate::application::ports::{EventPublishError, EventPublisherPort};
use crate::domain::trade_lifecycle::TradeEvent;

/// Publishes trade events to the log.
#[derive(Debug, Clone, Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisherPort for TracingEventPublisher {
    async fn publish_trade_events(&self, events: Vec<TradeEvent>) -> Result<(), EventPublishError> {
        for event in &events {
            let payload =
                serde_json::to_string(event).map_err(|e| EventPublishError::SerializationError {
                    message: e.to_string(),
                })?;

            tracing::info!(
                event_type = event.event_type(),
                trade_id = %event.trade_id(),
                status = %event.status(),
                occurred_at = %event.occurred_at(),
                payload = %payload,
                "Trade event"
            );

            if event.status().is_terminal() {
                tracing::info!(trade_id = %event.trade_id(), "Trade complete");
            }
        }
        Ok(())
    }
}
