// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Trade Lifecycle - Rust Core Library
//!
//! Guarded state machine for a trade-finance workflow. Each trade is a single
//! record in a key-addressed ledger; buyer, seller, banks and shipper advance
//! it through a fixed sequence of transitions.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregate, value objects, domain events)
//!   - `trade_lifecycle`: Trade aggregate, status lifecycle, record codec
//!   - `shared`: Identifiers, amounts, timestamps
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for external systems (`LedgerStore`, `EventPublisherPort`)
//!   - `use_cases`: `TradeLifecycleEngine`
//!   - `dispatch`: Named-function invocation surface
//!   - `dto`: Data transfer objects for API boundaries
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: Ledger stores (in-memory, snapshot file)
//!   - `messaging`: Event publisher
//!   - `http`: REST API
//!   - `config`: Dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// API error codes.
pub mod error;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::shared::{Amount, BankId, ShipperId, SkuId, TaxId, Timestamp, TradeId};
pub use domain::trade_lifecycle::{
    CreateTradeCommand, RecordCodec, Trade, TradeError, TradeEvent, TradeStateMachine,
    TradeStatus, Transition,
};

// Application re-exports
pub use application::dispatch::{
    DispatchError, Invocation, InvocationDispatcher, InvocationResponse,
};
pub use application::dto::{CreateTradeDto, TradeDto, TradeStatusDto};
pub use application::ports::{EventPublisherPort, LedgerError, LedgerStore, NoOpEventPublisher};
pub use application::use_cases::TradeLifecycleEngine;

// Infrastructure re-exports
pub use infrastructure::config::Container;
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::messaging::TracingEventPublisher;
pub use infrastructure::persistence::{ConfiguredLedger, FileLedger, InMemoryLedger};

// Cross-cutting re-exports
pub use error::{ApiError, ErrorCode};
