//! Invocation Dispatcher
//!
//! Resolves a named function plus positional string arguments into a typed
//! [`Invocation`] and runs it against the lifecycle engine. Invocations that
//! write to the ledger pass through a commit gate one at a time, so a
//! read-decide-write sequence never interleaves with another.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::application::dto::{TradeDto, TradeStatusDto};
use crate::application::ports::{EventPublisherPort, LedgerStore};
use crate::application::use_cases::TradeLifecycleEngine;
use crate::domain::shared::{Amount, BankId, ShipperId, SkuId, TaxId, TradeId};
use crate::domain::trade_lifecycle::{CreateTradeCommand, TradeError};

/// Invocation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// No function with this name.
    #[error("Invalid function name: '{function}'")]
    UnknownFunction { function: String },

    /// Wrong arity or an argument that does not parse.
    #[error("Invalid arguments for {function}({expected}): {message}")]
    InvalidArguments {
        function: String,
        expected: String,
        message: String,
    },

    /// The engine rejected the operation.
    #[error(transparent)]
    Trade(#[from] TradeError),
}

struct Signature {
    function: &'static str,
    params: &'static [&'static str],
}

static SIGNATURES: [Signature; 7] = [
    Signature {
        function: "createTrade",
        params: &[
            "tradeId",
            "buyerTaxId",
            "sellerTaxId",
            "skuId",
            "tradePrice",
            "shippingPrice",
        ],
    },
    Signature {
        function: "createLOC",
        params: &["tradeId", "importBankId"],
    },
    Signature {
        function: "approveLOC",
        params: &["tradeId", "exportBankId"],
    },
    Signature {
        function: "initiateShipment",
        params: &["tradeId", "deliveryDate"],
    },
    Signature {
        function: "deliverGoods",
        params: &["tradeId", "shipperId"],
    },
    Signature {
        function: "query",
        params: &["tradeId"],
    },
    Signature {
        function: "queryStatus",
        params: &["tradeId"],
    },
];

impl Signature {
    fn expected(&self) -> String {
        self.params.join(", ")
    }

    fn invalid(&self, message: impl Into<String>) -> DispatchError {
        DispatchError::InvalidArguments {
            function: self.function.to_string(),
            expected: self.expected(),
            message: message.into(),
        }
    }

    fn parse_price(&self, index: usize, raw: &str) -> Result<Amount, DispatchError> {
        raw.trim()
            .parse::<i64>()
            .map(Amount::from_minor_units)
            .map_err(|e| self.invalid(format!("{} '{raw}': {e}", self.params[index])))
    }

    fn parse_date(&self, index: usize, raw: &str) -> Result<NaiveDate, DispatchError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
            self.invalid(format!(
                "{} '{raw}' is not a YYYY-MM-DD date: {e}",
                self.params[index]
            ))
        })
    }
}

/// A resolved, typed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Create a trade.
    CreateTrade(CreateTradeCommand),
    /// Issue the letter of credit.
    CreateLoc {
        /// Target trade.
        trade_id: TradeId,
        /// Issuing bank.
        import_bank_id: BankId,
    },
    /// Approve the letter of credit.
    ApproveLoc {
        /// Target trade.
        trade_id: TradeId,
        /// Approving bank.
        export_bank_id: BankId,
    },
    /// Start the shipment.
    InitiateShipment {
        /// Target trade.
        trade_id: TradeId,
        /// Promised delivery date.
        delivery_date: NaiveDate,
    },
    /// Deliver the goods.
    DeliverGoods {
        /// Target trade.
        trade_id: TradeId,
        /// Delivering shipper.
        shipper_id: ShipperId,
    },
    /// Read the full record.
    Query {
        /// Target trade.
        trade_id: TradeId,
    },
    /// Read the status only.
    QueryStatus {
        /// Target trade.
        trade_id: TradeId,
    },
}

impl Invocation {
    /// Resolve `function` and its positional `args`.
    ///
    /// # Errors
    ///
    /// `UnknownFunction` for an unrecognised name, `InvalidArguments` for
    /// wrong arity or unparsable prices and dates.
    pub fn parse(function: &str, args: &[String]) -> Result<Self, DispatchError> {
        let signature = SIGNATURES
            .iter()
            .find(|s| s.function == function)
            .ok_or_else(|| DispatchError::UnknownFunction {
                function: function.to_string(),
            })?;

        if args.len() != signature.params.len() {
            return Err(signature.invalid(format!(
                "expected {} argument(s), got {}",
                signature.params.len(),
                args.len()
            )));
        }

        let trade_id = TradeId::new(args[0].as_str());
        let invocation = match signature.function {
            "createTrade" => Self::CreateTrade(CreateTradeCommand {
                trade_id,
                buyer_tax_id: TaxId::new(args[1].as_str()),
                seller_tax_id: TaxId::new(args[2].as_str()),
                sku_id: SkuId::new(args[3].as_str()),
                trade_price: signature.parse_price(4, &args[4])?,
                shipping_price: signature.parse_price(5, &args[5])?,
            }),
            "createLOC" => Self::CreateLoc {
                trade_id,
                import_bank_id: BankId::new(args[1].as_str()),
            },
            "approveLOC" => Self::ApproveLoc {
                trade_id,
                export_bank_id: BankId::new(args[1].as_str()),
            },
            "initiateShipment" => Self::InitiateShipment {
                trade_id,
                delivery_date: signature.parse_date(1, &args[1])?,
            },
            "deliverGoods" => Self::DeliverGoods {
                trade_id,
                shipper_id: ShipperId::new(args[1].as_str()),
            },
            "query" => Self::Query { trade_id },
            _ => Self::QueryStatus { trade_id },
        };
        Ok(invocation)
    }

    /// The function name this invocation answers to.
    #[must_use]
    pub const fn function_name(&self) -> &'static str {
        match self {
            Self::CreateTrade(_) => "createTrade",
            Self::CreateLoc { .. } => "createLOC",
            Self::ApproveLoc { .. } => "approveLOC",
            Self::InitiateShipment { .. } => "initiateShipment",
            Self::DeliverGoods { .. } => "deliverGoods",
            Self::Query { .. } => "query",
            Self::QueryStatus { .. } => "queryStatus",
        }
    }

    /// Returns true if the invocation writes to the ledger.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        !matches!(self, Self::Query { .. } | Self::QueryStatus { .. })
    }

    /// The trade this invocation addresses.
    #[must_use]
    pub const fn trade_id(&self) -> &TradeId {
        match self {
            Self::CreateTrade(cmd) => &cmd.trade_id,
            Self::CreateLoc { trade_id, .. }
            | Self::ApproveLoc { trade_id, .. }
            | Self::InitiateShipment { trade_id, .. }
            | Self::DeliverGoods { trade_id, .. }
            | Self::Query { trade_id }
            | Self::QueryStatus { trade_id } => trade_id,
        }
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InvocationResponse {
    /// The updated or queried record.
    Trade(TradeDto),
    /// Status projection.
    Status(TradeStatusDto),
}

/// Runs invocations against the engine.
pub struct InvocationDispatcher<L, E>
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    engine: Arc<TradeLifecycleEngine<L, E>>,
    commit_gate: Mutex<()>,
}

impl<L, E> InvocationDispatcher<L, E>
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    /// Create a dispatcher over an engine.
    pub fn new(engine: Arc<TradeLifecycleEngine<L, E>>) -> Self {
        Self {
            engine,
            commit_gate: Mutex::new(()),
        }
    }

    /// Resolve and run a named function.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` for a bad invocation or an engine failure.
    pub async fn invoke(
        &self,
        function: &str,
        args: &[String],
    ) -> Result<InvocationResponse, DispatchError> {
        let invocation = Invocation::parse(function, args).inspect_err(|e| {
            tracing::warn!(function, error = %e, "Invocation rejected");
        })?;
        self.execute(invocation).await
    }

    /// Run a resolved invocation.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Trade` if the engine rejects the operation.
    pub async fn execute(
        &self,
        invocation: Invocation,
    ) -> Result<InvocationResponse, DispatchError> {
        tracing::debug!(
            function = invocation.function_name(),
            trade_id = %invocation.trade_id(),
            "Dispatching invocation"
        );

        let _gate = if invocation.is_mutating() {
            Some(self.commit_gate.lock().await)
        } else {
            None
        };

        let engine = &self.engine;
        let response = match invocation {
            Invocation::CreateTrade(cmd) => {
                InvocationResponse::Trade(TradeDto::from_trade(&engine.create_trade(cmd).await?))
            }
            Invocation::CreateLoc {
                trade_id,
                import_bank_id,
            } => InvocationResponse::Trade(TradeDto::from_trade(
                &engine.create_loc(&trade_id, import_bank_id).await?,
            )),
            Invocation::ApproveLoc {
                trade_id,
                export_bank_id,
            } => InvocationResponse::Trade(TradeDto::from_trade(
                &engine.approve_loc(&trade_id, export_bank_id).await?,
            )),
            Invocation::InitiateShipment {
                trade_id,
                delivery_date,
            } => InvocationResponse::Trade(TradeDto::from_trade(
                &engine.initiate_shipment(&trade_id, delivery_date).await?,
            )),
            Invocation::DeliverGoods {
                trade_id,
                shipper_id,
            } => InvocationResponse::Trade(TradeDto::from_trade(
                &engine.deliver_goods(&trade_id, shipper_id).await?,
            )),
            Invocation::Query { trade_id } => {
                InvocationResponse::Trade(TradeDto::from_trade(&engine.query(&trade_id).await?))
            }
            Invocation::QueryStatus { trade_id } => {
                let status = engine.query_status(&trade_id).await?;
                InvocationResponse::Status(TradeStatusDto::new(&trade_id, status))
            }
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NoOpEventPublisher;
    use crate::domain::trade_lifecycle::TradeStatus;
    use crate::infrastructure::persistence::InMemoryLedger;
    use test_case::test_case;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn dispatcher() -> InvocationDispatcher<InMemoryLedger, NoOpEventPublisher> {
        let engine = TradeLifecycleEngine::new(
            Arc::new(InMemoryLedger::new()),
            Arc::new(NoOpEventPublisher),
        );
        InvocationDispatcher::new(Arc::new(engine))
    }

    fn expect_trade(response: InvocationResponse) -> TradeDto {
        match response {
            InvocationResponse::Trade(dto) => dto,
            InvocationResponse::Status(other) => panic!("expected trade, got {other:?}"),
        }
    }

    #[test]
    fn parses_create_trade() {
        let invocation = Invocation::parse(
            "createTrade",
            &args(&["T1", "B1", "S1", "SKU001", "10000", "1000"]),
        )
        .unwrap();

        match invocation {
            Invocation::CreateTrade(cmd) => {
                assert_eq!(cmd.trade_id.as_str(), "T1");
                assert_eq!(cmd.trade_price, Amount::from(10_000));
                assert_eq!(cmd.shipping_price, Amount::from(1_000));
            }
            other => panic!("unexpected invocation: {other:?}"),
        }
    }

    #[test]
    fn parses_delivery_date() {
        let invocation =
            Invocation::parse("initiateShipment", &args(&["T1", "2017-10-31"])).unwrap();
        assert_eq!(
            invocation,
            Invocation::InitiateShipment {
                trade_id: TradeId::new("T1"),
                delivery_date: NaiveDate::from_ymd_opt(2017, 10, 31).unwrap(),
            }
        );
        assert!(invocation.is_mutating());
    }

    #[test_case("createTrade", 6, true ; "create trade")]
    #[test_case("createLOC", 2, true ; "create loc")]
    #[test_case("approveLOC", 2, true ; "approve loc")]
    #[test_case("initiateShipment", 2, true ; "initiate shipment")]
    #[test_case("deliverGoods", 2, true ; "deliver goods")]
    #[test_case("query", 1, false ; "query")]
    #[test_case("queryStatus", 1, false ; "query status")]
    fn function_table(function: &str, arity: usize, mutating: bool) {
        let mut values = vec!["T1".to_string()];
        values.extend((1..arity).map(|i| match (function, i) {
            ("createTrade", 4 | 5) => "100".to_string(),
            ("initiateShipment", 1) => "2017-10-31".to_string(),
            _ => format!("A{i}"),
        }));

        let invocation = Invocation::parse(function, &values).unwrap();
        assert_eq!(invocation.function_name(), function);
        assert_eq!(invocation.is_mutating(), mutating);
        assert_eq!(invocation.trade_id().as_str(), "T1");

        values.push("extra".to_string());
        assert!(matches!(
            Invocation::parse(function, &values),
            Err(DispatchError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn unknown_function_is_rejected() {
        let err = Invocation::parse("settleTrade", &args(&["T1"])).unwrap_err();
        assert_eq!(
            err,
            DispatchError::UnknownFunction {
                function: "settleTrade".to_string()
            }
        );
        assert!(err.to_string().starts_with("Invalid function name"));
    }

    #[test_case(&["T1", "B1", "S1", "SKU001", "ten", "1000"] ; "non numeric price")]
    #[test_case(&["T1", "B1", "S1", "SKU001", "10000"] ; "missing shipping price")]
    #[test_case(&["T1", "B1", "S1", "SKU001", "1.5", "1000"] ; "fractional price")]
    fn invalid_create_arguments(values: &[&str]) {
        let err = Invocation::parse("createTrade", &args(values)).unwrap_err();
        match err {
            DispatchError::InvalidArguments { function, expected, .. } => {
                assert_eq!(function, "createTrade");
                assert!(expected.contains("shippingPrice"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_date_is_rejected() {
        let err = Invocation::parse("initiateShipment", &args(&["T1", "31/10/2017"])).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn dispatches_full_lifecycle() {
        let dispatcher = dispatcher();

        let created = expect_trade(
            dispatcher
                .invoke(
                    "createTrade",
                    &args(&["T1", "B1", "S1", "SKU001", "10000", "1000"]),
                )
                .await
                .unwrap(),
        );
        assert_eq!(created.total_price, 11_000);

        dispatcher.invoke("createLOC", &args(&["T1", "BNK_I_1"])).await.unwrap();
        dispatcher.invoke("approveLOC", &args(&["T1", "BNK_E_1"])).await.unwrap();
        dispatcher
            .invoke("initiateShipment", &args(&["T1", "2017-10-31"]))
            .await
            .unwrap();
        let delivered = expect_trade(
            dispatcher
                .invoke("deliverGoods", &args(&["T1", "SHP_1"]))
                .await
                .unwrap(),
        );
        assert_eq!(delivered.status, TradeStatus::BolCreated);
        assert_eq!(delivered.shipper_id.as_deref(), Some("SHP_1"));

        let status = dispatcher.invoke("queryStatus", &args(&["T1"])).await.unwrap();
        match status {
            InvocationResponse::Status(dto) => {
                assert_eq!(dto.status, TradeStatus::BolCreated);
                assert!(dto.terminal);
            }
            InvocationResponse::Trade(other) => panic!("expected status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn engine_errors_are_wrapped() {
        let dispatcher = dispatcher();
        let err = dispatcher.invoke("query", &args(&["T_UNKNOWN"])).await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Trade(TradeError::TradeNotFound { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_commit_once() {
        let dispatcher = Arc::new(dispatcher());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let dispatcher = Arc::clone(&dispatcher);
                let price = (i * 100).to_string();
                tokio::spawn(async move {
                    dispatcher
                        .invoke(
                            "createTrade",
                            &args(&["T1", "B1", "S1", "SKU001", price.as_str(), "0"]),
                        )
                        .await
                })
            })
            .collect();

        let mut committed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => committed += 1,
                Err(err) => assert!(matches!(
                    err,
                    DispatchError::Trade(TradeError::TradeAlreadyExists { .. })
                )),
            }
        }
        assert_eq!(committed, 1);
    }
}
