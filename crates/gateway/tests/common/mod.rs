//! Shared fixtures for the gateway integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use mercury_core::{
    ApprovalRequest, ApprovalResult, Balance, Market, Order, Position, PositionSide, Side, Ticker,
    VenueId,
};
use mercury_gateway::{Body, Connection, Envelope, ErrorCode, Message, Performative, ProtocolId};
use mercury_ports::{ErrorKind, ExchangeAdapter, VenueError, VenueResult};
use rust_decimal_macros::dec;

pub const AGENT: &str = "agent";
pub const GATEWAY: &str = "mercury/gateway";

pub fn paper() -> VenueId {
    VenueId::off_chain("paper")
}

pub fn request(protocol_id: ProtocolId, body: Body) -> Envelope {
    Envelope::new(GATEWAY, AGENT, Message::request(protocol_id, body))
}

/// Next reply, failing the test if none arrives
pub async fn next_reply(connection: &Connection) -> Envelope {
    tokio::time::timeout(Duration::from_secs(30), connection.receive())
        .await
        .expect("timed out waiting for a reply")
        .expect("connection closed")
}

/// Send one request and wait for its reply
pub async fn round_trip(connection: &Connection, envelope: Envelope) -> Envelope {
    let request_id = envelope.message().message_id();
    let reference = envelope.message().dialogue_reference().clone();
    connection.send(envelope).expect("send");

    let reply = next_reply(connection).await;
    assert_eq!(reply.to(), AGENT);
    assert_eq!(reply.sender(), GATEWAY);
    assert_eq!(reply.message().dialogue_reference(), &reference);
    assert_eq!(reply.message().target(), request_id);
    reply
}

pub fn error_code(reply: &Envelope) -> Option<ErrorCode> {
    reply.message().body().error_code()
}

pub fn venue_error(kind: ErrorKind) -> VenueError {
    match kind {
        ErrorKind::RequestTimeout => VenueError::RequestTimeout("rpc call timed out".into()),
        ErrorKind::ExchangeNotAvailable => VenueError::ExchangeNotAvailable("maintenance".into()),
        ErrorKind::InsufficientFunds => VenueError::InsufficientFunds("balance too low".into()),
        ErrorKind::InvalidOrder => VenueError::InvalidOrder("tick size".into()),
        ErrorKind::OrderNotFound => VenueError::OrderNotFound("unknown id".into()),
        ErrorKind::BadSymbol => VenueError::BadSymbol("delisted".into()),
        ErrorKind::RpcError => VenueError::Rpc("node returned 502".into()),
        ErrorKind::ApprovalError => VenueError::Approval("allowance too low".into()),
        ErrorKind::UnsupportedAsset => VenueError::UnsupportedAsset("unknown token".into()),
        ErrorKind::NotSupported => VenueError::not_supported("scripted", "fetch_tickers"),
        ErrorKind::ExchangeError => VenueError::Exchange("internal error".into()),
    }
}

/// Venue failing every call with one error kind, counting calls
pub struct FailingVenue {
    venue: VenueId,
    failure: Option<ErrorKind>,
    calls: Arc<AtomicUsize>,
}

impl FailingVenue {
    /// `None` fails with an unclassified error
    pub fn new(venue: VenueId, failure: Option<ErrorKind>, calls: Arc<AtomicUsize>) -> Self {
        Self {
            venue,
            failure,
            calls,
        }
    }

    fn fail<T>(&self) -> VenueResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(match self.failure {
            Some(kind) => venue_error(kind),
            None => VenueError::unclassified(std::io::Error::other("connection reset by peer")),
        })
    }
}

#[async_trait]
impl ExchangeAdapter for FailingVenue {
    fn venue(&self) -> &VenueId {
        &self.venue
    }

    async fn fetch_markets(&self) -> VenueResult<Vec<Market>> {
        self.fail()
    }

    async fn fetch_tickers(&self) -> VenueResult<Vec<Ticker>> {
        self.fail()
    }

    async fn fetch_ticker(&self, _symbol: &str) -> VenueResult<Ticker> {
        self.fail()
    }

    async fn fetch_balance(&self, _address: Option<&str>) -> VenueResult<Vec<Balance>> {
        self.fail()
    }

    async fn fetch_positions(&self) -> VenueResult<Vec<Position>> {
        self.fail()
    }

    async fn create_order(&self, _order: Order) -> VenueResult<Order> {
        self.fail()
    }

    async fn cancel_order(&self, _order_id: &str, _symbol: &str) -> VenueResult<Order> {
        self.fail()
    }

    async fn fetch_order(&self, _order_id: &str, _symbol: &str) -> VenueResult<Order> {
        self.fail()
    }

    async fn fetch_open_orders(&self, _symbol: Option<&str>) -> VenueResult<Vec<Order>> {
        self.fail()
    }

    async fn set_approval(&self, _approval: ApprovalRequest) -> VenueResult<ApprovalResult> {
        self.fail()
    }

    async fn close(&self) -> VenueResult<()> {
        Ok(())
    }
}

/// A payload for every performative
pub fn sample_body(performative: Performative, venue: &VenueId) -> Body {
    let order = Order::limit(venue, "ETH/USDC", Side::Buy, dec!(1), dec!(100));
    let reference = Order::reference(venue, "order-1", "ETH/USDC");
    let market = Market {
        id: "ETHUSDC".to_string(),
        symbol: "ETH/USDC".to_string(),
        base: "ETH".to_string(),
        quote: "USDC".to_string(),
        exchange_id: venue.exchange_id.clone(),
        ledger_id: venue.ledger_id.clone(),
        active: true,
        min_amount: None,
        price_precision: Some(2),
    };
    let ticker = Ticker {
        symbol: "ETH/USDC".to_string(),
        asset_a: "ETH".to_string(),
        asset_b: "USDC".to_string(),
        bid: dec!(99),
        ask: dec!(101),
        high: None,
        low: None,
        last: None,
        timestamp: Utc::now(),
    };
    let position = Position {
        id: "p1".to_string(),
        symbol: "ETH/USDC".to_string(),
        side: PositionSide::Long,
        size: dec!(1),
        entry_price: dec!(100),
        mark_price: dec!(100),
        leverage: None,
        exchange_id: venue.exchange_id.clone(),
        ledger_id: venue.ledger_id.clone(),
    };
    let approval = ApprovalRequest {
        ledger_id: venue.ledger_id.clone(),
        exchange_id: venue.exchange_id.clone(),
        token: "USDC".to_string(),
        spender: "paper_router".to_string(),
        amount: dec!(100),
    };

    match performative {
        Performative::CreateOrder => Body::CreateOrder { order },
        Performative::OrderCreated => Body::OrderCreated { order },
        Performative::CancelOrder => Body::CancelOrder { order: reference },
        Performative::OrderCancelled => Body::OrderCancelled { order },
        Performative::GetOrder => Body::GetOrder { order: reference },
        Performative::Order => Body::Order { order },
        Performative::GetOrders => Body::GetOrders {
            venue: venue.clone(),
            symbol: None,
        },
        Performative::Orders => Body::Orders {
            orders: vec![order],
        },
        Performative::GetAllMarkets => Body::GetAllMarkets {
            venue: venue.clone(),
            currency: None,
        },
        Performative::AllMarkets => Body::AllMarkets {
            markets: vec![market],
        },
        Performative::GetMarket => Body::GetMarket {
            id: "ETHUSDC".to_string(),
            venue: venue.clone(),
        },
        Performative::Market => Body::Market { market },
        Performative::GetAllTickers => Body::GetAllTickers {
            venue: venue.clone(),
        },
        Performative::AllTickers => Body::AllTickers {
            tickers: vec![ticker],
        },
        Performative::GetTicker => Body::GetTicker {
            symbol: "ETH/USDC".to_string(),
            venue: venue.clone(),
        },
        Performative::Ticker => Body::Ticker { ticker },
        Performative::GetAllBalances => Body::GetAllBalances {
            venue: venue.clone(),
            address: None,
        },
        Performative::AllBalances => Body::AllBalances {
            balances: vec![Balance::free("USDC", dec!(1))],
        },
        Performative::GetBalance => Body::GetBalance {
            asset_id: "USDC".to_string(),
            venue: venue.clone(),
            address: None,
        },
        Performative::Balance => Body::Balance {
            balance: Balance::free("USDC", dec!(1)),
        },
        Performative::GetAllPositions => Body::GetAllPositions {
            venue: venue.clone(),
        },
        Performative::AllPositions => Body::AllPositions {
            positions: vec![position],
        },
        Performative::GetPosition => Body::GetPosition {
            symbol: "ETH/USDC".to_string(),
            venue: venue.clone(),
        },
        Performative::Position => Body::Position { position },
        Performative::SetApproval => Body::SetApproval { approval },
        Performative::ApprovalResponse => Body::ApprovalResponse {
            approval: ApprovalResult {
                token: approval.token,
                spender: approval.spender,
                amount: approval.amount,
                tx_hash: "0x1".to_string(),
            },
        },
        Performative::Error => Body::error(ErrorCode::ExchangeError, "boom"),
    }
}

pub fn starting_balances() -> BTreeMap<String, rust_decimal::Decimal> {
    BTreeMap::from([
        ("ETH".to_string(), dec!(10)),
        ("USDC".to_string(), dec!(1000)),
    ])
}
