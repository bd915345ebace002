//! Performatives and their payloads

use mercury_core::{
    ApprovalRequest, ApprovalResult, Balance, Market, Order, Position, Ticker, VenueId,
};
use mercury_ports::ErrorKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The verb of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Performative {
    // orders
    CreateOrder,
    OrderCreated,
    CancelOrder,
    OrderCancelled,
    GetOrder,
    Order,
    GetOrders,
    Orders,
    // markets
    GetAllMarkets,
    AllMarkets,
    GetMarket,
    Market,
    // tickers
    GetAllTickers,
    AllTickers,
    GetTicker,
    Ticker,
    // balances
    GetAllBalances,
    AllBalances,
    GetBalance,
    Balance,
    // positions
    GetAllPositions,
    AllPositions,
    GetPosition,
    Position,
    // approvals
    SetApproval,
    ApprovalResponse,
    // every protocol
    Error,
}

impl Performative {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateOrder => "CREATE_ORDER",
            Self::OrderCreated => "ORDER_CREATED",
            Self::CancelOrder => "CANCEL_ORDER",
            Self::OrderCancelled => "ORDER_CANCELLED",
            Self::GetOrder => "GET_ORDER",
            Self::Order => "ORDER",
            Self::GetOrders => "GET_ORDERS",
            Self::Orders => "ORDERS",
            Self::GetAllMarkets => "GET_ALL_MARKETS",
            Self::AllMarkets => "ALL_MARKETS",
            Self::GetMarket => "GET_MARKET",
            Self::Market => "MARKET",
            Self::GetAllTickers => "GET_ALL_TICKERS",
            Self::AllTickers => "ALL_TICKERS",
            Self::GetTicker => "GET_TICKER",
            Self::Ticker => "TICKER",
            Self::GetAllBalances => "GET_ALL_BALANCES",
            Self::AllBalances => "ALL_BALANCES",
            Self::GetBalance => "GET_BALANCE",
            Self::Balance => "BALANCE",
            Self::GetAllPositions => "GET_ALL_POSITIONS",
            Self::AllPositions => "ALL_POSITIONS",
            Self::GetPosition => "GET_POSITION",
            Self::Position => "POSITION",
            Self::SetApproval => "SET_APPROVAL",
            Self::ApprovalResponse => "APPROVAL_RESPONSE",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Performative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire error codes carried by ERROR replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // venue-level
    RequestTimeout,
    ExchangeNotAvailable,
    InsufficientFunds,
    InvalidOrder,
    OrderNotFound,
    BadSymbol,
    RpcError,
    ApprovalError,
    UnsupportedAsset,
    NotSupported,
    ExchangeError,
    // protocol-level
    UnrecognizedPerformative,
    InvalidDialogue,
    UnknownProtocol,
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::RequestTimeout => ErrorCode::RequestTimeout,
            ErrorKind::ExchangeNotAvailable => ErrorCode::ExchangeNotAvailable,
            ErrorKind::InsufficientFunds => ErrorCode::InsufficientFunds,
            ErrorKind::InvalidOrder => ErrorCode::InvalidOrder,
            ErrorKind::OrderNotFound => ErrorCode::OrderNotFound,
            ErrorKind::BadSymbol => ErrorCode::BadSymbol,
            ErrorKind::RpcError => ErrorCode::RpcError,
            ErrorKind::ApprovalError => ErrorCode::ApprovalError,
            ErrorKind::UnsupportedAsset => ErrorCode::UnsupportedAsset,
            ErrorKind::NotSupported => ErrorCode::NotSupported,
            ErrorKind::ExchangeError => ErrorCode::ExchangeError,
        }
    }
}

/// Payload of a message; the variant determines the performative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "performative", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Body {
    CreateOrder {
        order: Order,
    },
    OrderCreated {
        order: Order,
    },
    CancelOrder {
        order: Order,
    },
    OrderCancelled {
        order: Order,
    },
    GetOrder {
        order: Order,
    },
    Order {
        order: Order,
    },
    GetOrders {
        #[serde(flatten)]
        venue: VenueId,
        symbol: Option<String>,
    },
    Orders {
        orders: Vec<Order>,
    },

    GetAllMarkets {
        #[serde(flatten)]
        venue: VenueId,
        currency: Option<String>,
    },
    AllMarkets {
        markets: Vec<Market>,
    },
    GetMarket {
        id: String,
        #[serde(flatten)]
        venue: VenueId,
    },
    Market {
        market: Market,
    },

    GetAllTickers {
        #[serde(flatten)]
        venue: VenueId,
    },
    AllTickers {
        tickers: Vec<Ticker>,
    },
    GetTicker {
        symbol: String,
        #[serde(flatten)]
        venue: VenueId,
    },
    Ticker {
        ticker: Ticker,
    },

    GetAllBalances {
        #[serde(flatten)]
        venue: VenueId,
        address: Option<String>,
    },
    AllBalances {
        balances: Vec<Balance>,
    },
    GetBalance {
        asset_id: String,
        #[serde(flatten)]
        venue: VenueId,
        address: Option<String>,
    },
    Balance {
        balance: Balance,
    },

    GetAllPositions {
        #[serde(flatten)]
        venue: VenueId,
    },
    AllPositions {
        positions: Vec<Position>,
    },
    GetPosition {
        symbol: String,
        #[serde(flatten)]
        venue: VenueId,
    },
    Position {
        position: Position,
    },

    SetApproval {
        approval: ApprovalRequest,
    },
    ApprovalResponse {
        approval: ApprovalResult,
    },

    Error {
        error_code: ErrorCode,
        error_msg: String,
        #[serde(default)]
        error_data: BTreeMap<String, String>,
    },
}

impl Body {
    pub fn performative(&self) -> Performative {
        match self {
            Body::CreateOrder { .. } => Performative::CreateOrder,
            Body::OrderCreated { .. } => Performative::OrderCreated,
            Body::CancelOrder { .. } => Performative::CancelOrder,
            Body::OrderCancelled { .. } => Performative::OrderCancelled,
            Body::GetOrder { .. } => Performative::GetOrder,
            Body::Order { .. } => Performative::Order,
            Body::GetOrders { .. } => Performative::GetOrders,
            Body::Orders { .. } => Performative::Orders,
            Body::GetAllMarkets { .. } => Performative::GetAllMarkets,
            Body::AllMarkets { .. } => Performative::AllMarkets,
            Body::GetMarket { .. } => Performative::GetMarket,
            Body::Market { .. } => Performative::Market,
            Body::GetAllTickers { .. } => Performative::GetAllTickers,
            Body::AllTickers { .. } => Performative::AllTickers,
            Body::GetTicker { .. } => Performative::GetTicker,
            Body::Ticker { .. } => Performative::Ticker,
            Body::GetAllBalances { .. } => Performative::GetAllBalances,
            Body::AllBalances { .. } => Performative::AllBalances,
            Body::GetBalance { .. } => Performative::GetBalance,
            Body::Balance { .. } => Performative::Balance,
            Body::GetAllPositions { .. } => Performative::GetAllPositions,
            Body::AllPositions { .. } => Performative::AllPositions,
            Body::GetPosition { .. } => Performative::GetPosition,
            Body::Position { .. } => Performative::Position,
            Body::SetApproval { .. } => Performative::SetApproval,
            Body::ApprovalResponse { .. } => Performative::ApprovalResponse,
            Body::Error { .. } => Performative::Error,
        }
    }

    /// Venue a request is addressed to (None for replies)
    pub fn venue(&self) -> Option<VenueId> {
        match self {
            Body::CreateOrder { order } | Body::CancelOrder { order } | Body::GetOrder { order } => {
                Some(order.venue())
            }
            Body::GetOrders { venue, .. }
            | Body::GetAllMarkets { venue, .. }
            | Body::GetMarket { venue, .. }
            | Body::GetAllTickers { venue }
            | Body::GetTicker { venue, .. }
            | Body::GetAllBalances { venue, .. }
            | Body::GetBalance { venue, .. }
            | Body::GetAllPositions { venue }
            | Body::GetPosition { venue, .. } => Some(venue.clone()),
            Body::SetApproval { approval } => Some(approval.venue()),
            _ => None,
        }
    }

    /// Build an ERROR payload
    pub fn error(error_code: ErrorCode, error_msg: impl Into<String>) -> Self {
        Body::Error {
            error_code,
            error_msg: error_msg.into(),
            error_data: BTreeMap::new(),
        }
    }

    /// Build an ERROR payload tagged with the venue it concerns
    pub fn venue_error(error_code: ErrorCode, error_msg: impl Into<String>, venue: &VenueId) -> Self {
        let mut error_data = BTreeMap::new();
        error_data.insert("exchange_id".to_string(), venue.exchange_id.clone());
        error_data.insert("ledger_id".to_string(), venue.ledger_id.clone());
        Body::Error {
            error_code,
            error_msg: error_msg.into(),
            error_data,
        }
    }

    /// Error code if this is an ERROR payload
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Body::Error { error_code, .. } => Some(*error_code),
            _ => None,
        }
    }
}
