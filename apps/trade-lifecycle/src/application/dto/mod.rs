//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for API boundaries and use case inputs/outputs.

mod trade_dto;

pub use trade_dto::{CreateTradeDto, TradeDto, TradeStatusDto};
