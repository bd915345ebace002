//! Integration test: agent <-> gateway <-> paper venues
//!
//! Every request goes through the full path:
//! Connection::send -> Dispatcher -> Interface -> Adapter -> Connection::receive

mod common;

use common::*;
use mercury_core::{ApprovalRequest, Order, OrderStatus, Side, VenueId};
use mercury_gateway::{
    Body, Connection, ErrorCode, GatewayConfig, ProtocolId, VenueCatalog, VenueConfig,
};
use rust_decimal_macros::dec;
use serde_json::json;

async fn connect_paper() -> Connection {
    let _ = env_logger::try_init();
    let config = GatewayConfig::default().with_venue(
        VenueConfig::new("paper").with_options(json!({
            "markets": [
                { "symbol": "ETH/USDC", "bid": "99", "ask": "101" },
                { "symbol": "BTC/USDC", "bid": "29990", "ask": "30010", "min_amount": "0.001" }
            ],
            "balances": { "ETH": "10", "USDC": "1000" }
        })),
    );
    Connection::connect(config, &VenueCatalog::default())
        .await
        .expect("connect")
}

#[tokio::test]
async fn test_get_orders_on_empty_venue() {
    let connection = connect_paper().await;

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Orders,
            Body::GetOrders {
                venue: paper(),
                symbol: None,
            },
        ),
    )
    .await;

    assert_eq!(reply.message().body(), &Body::Orders { orders: vec![] });
    connection.disconnect().await;
}

#[tokio::test]
async fn test_create_order_then_cancel() {
    let connection = connect_paper().await;
    let order = Order::limit(&paper(), "ETH/USDC", Side::Buy, dec!(1), dec!(100))
        .with_client_order_id("strategy-1");

    let reply = round_trip(
        &connection,
        request(ProtocolId::Orders, Body::CreateOrder { order }),
    )
    .await;
    let Body::OrderCreated { order: created } = reply.message().body() else {
        panic!("expected ORDER_CREATED, got {:?}", reply.message().body());
    };
    assert!(matches!(
        created.status,
        OrderStatus::Open | OrderStatus::Filled
    ));
    assert_eq!(created.client_order_id.as_deref(), Some("strategy-1"));
    let id = created.id.clone().expect("venue-assigned id");

    // resting order is visible
    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Orders,
            Body::GetOrders {
                venue: paper(),
                symbol: Some("ETH/USDC".to_string()),
            },
        ),
    )
    .await;
    let Body::Orders { orders } = reply.message().body() else {
        panic!("expected ORDERS, got {:?}", reply.message().body());
    };
    assert_eq!(orders.len(), 1);

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Orders,
            Body::CancelOrder {
                order: Order::reference(&paper(), id.clone(), "ETH/USDC"),
            },
        ),
    )
    .await;
    let Body::OrderCancelled { order: cancelled } = reply.message().body() else {
        panic!("expected ORDER_CANCELLED, got {:?}", reply.message().body());
    };
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Orders,
            Body::GetOrder {
                order: Order::reference(&paper(), id, "ETH/USDC"),
            },
        ),
    )
    .await;
    let Body::Order { order: fetched } = reply.message().body() else {
        panic!("expected ORDER, got {:?}", reply.message().body());
    };
    assert_eq!(fetched.status, OrderStatus::Cancelled);

    connection.disconnect().await;
}

#[tokio::test]
async fn test_cancel_missing_order() {
    let connection = connect_paper().await;

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Orders,
            Body::CancelOrder {
                order: Order::reference(&paper(), "missing", "ETH/USDC"),
            },
        ),
    )
    .await;

    assert_eq!(error_code(&reply), Some(ErrorCode::OrderNotFound));
    let Body::Error { error_data, .. } = reply.message().body() else {
        unreachable!();
    };
    assert_eq!(error_data.get("exchange_id").map(String::as_str), Some("paper"));
    assert_eq!(error_data.get("ledger_id").map(String::as_str), Some("off_chain"));
}

#[tokio::test]
async fn test_order_rejections() {
    let connection = connect_paper().await;

    let cases = [
        // not enough USDC
        (
            Order::limit(&paper(), "ETH/USDC", Side::Buy, dec!(50), dec!(100)),
            ErrorCode::InsufficientFunds,
        ),
        // fails validation before reaching the venue
        (
            Order::limit(&paper(), "ETH/USDC", Side::Buy, dec!(-1), dec!(100)),
            ErrorCode::InvalidOrder,
        ),
        // below the market minimum
        (
            Order::market(&paper(), "BTC/USDC", Side::Sell, dec!(0.0001)),
            ErrorCode::InvalidOrder,
        ),
        (
            Order::market(&paper(), "DOGE/USDC", Side::Buy, dec!(1)),
            ErrorCode::BadSymbol,
        ),
    ];

    for (order, expected) in cases {
        let reply = round_trip(
            &connection,
            request(ProtocolId::Orders, Body::CreateOrder { order }),
        )
        .await;
        assert_eq!(error_code(&reply), Some(expected));
    }

    // nothing was left resting
    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Orders,
            Body::GetOrders {
                venue: paper(),
                symbol: None,
            },
        ),
    )
    .await;
    assert_eq!(reply.message().body(), &Body::Orders { orders: vec![] });
}

#[tokio::test]
async fn test_market_data_queries() {
    let connection = connect_paper().await;

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Markets,
            Body::GetAllMarkets {
                venue: paper(),
                currency: Some("BTC".to_string()),
            },
        ),
    )
    .await;
    let Body::AllMarkets { markets } = reply.message().body() else {
        panic!("expected ALL_MARKETS, got {:?}", reply.message().body());
    };
    assert_eq!(markets.len(), 1);
    assert_eq!(markets[0].symbol, "BTC/USDC");

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Markets,
            Body::GetMarket {
                id: "ETHUSDC".to_string(),
                venue: paper(),
            },
        ),
    )
    .await;
    assert!(matches!(reply.message().body(), Body::Market { market } if market.symbol == "ETH/USDC"));

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Markets,
            Body::GetMarket {
                id: "SOLUSDC".to_string(),
                venue: paper(),
            },
        ),
    )
    .await;
    assert_eq!(error_code(&reply), Some(ErrorCode::BadSymbol));

    let reply = round_trip(
        &connection,
        request(ProtocolId::Tickers, Body::GetAllTickers { venue: paper() }),
    )
    .await;
    assert!(matches!(reply.message().body(), Body::AllTickers { tickers } if tickers.len() == 2));

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Tickers,
            Body::GetTicker {
                symbol: "ETH/USDC".to_string(),
                venue: paper(),
            },
        ),
    )
    .await;
    let Body::Ticker { ticker } = reply.message().body() else {
        panic!("expected TICKER, got {:?}", reply.message().body());
    };
    assert_eq!((ticker.bid, ticker.ask), (dec!(99), dec!(101)));
}

#[tokio::test]
async fn test_balance_queries() {
    let connection = connect_paper().await;

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Balances,
            Body::GetAllBalances {
                venue: paper(),
                address: None,
            },
        ),
    )
    .await;
    assert!(matches!(reply.message().body(), Body::AllBalances { balances } if balances.len() == 2));

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Balances,
            Body::GetBalance {
                asset_id: "USDC".to_string(),
                venue: paper(),
                address: None,
            },
        ),
    )
    .await;
    let Body::Balance { balance } = reply.message().body() else {
        panic!("expected BALANCE, got {:?}", reply.message().body());
    };
    assert_eq!(balance.free, dec!(1000));

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Balances,
            Body::GetBalance {
                asset_id: "SOL".to_string(),
                venue: paper(),
                address: None,
            },
        ),
    )
    .await;
    assert_eq!(error_code(&reply), Some(ErrorCode::UnsupportedAsset));
}

#[tokio::test]
async fn test_position_queries() {
    let connection = connect_paper().await;

    let reply = round_trip(
        &connection,
        request(ProtocolId::Positions, Body::GetAllPositions { venue: paper() }),
    )
    .await;
    assert_eq!(
        reply.message().body(),
        &Body::AllPositions { positions: vec![] }
    );

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Positions,
            Body::GetPosition {
                symbol: "ETH/USDC".to_string(),
                venue: paper(),
            },
        ),
    )
    .await;
    assert_eq!(error_code(&reply), Some(ErrorCode::BadSymbol));
}

#[tokio::test]
async fn test_unknown_venue_is_not_available() {
    let connection = connect_paper().await;

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Tickers,
            Body::GetAllTickers {
                venue: VenueId::new("ethereum", "paper"),
            },
        ),
    )
    .await;
    assert_eq!(error_code(&reply), Some(ErrorCode::ExchangeNotAvailable));
}

#[tokio::test]
async fn test_swap_venue_with_approvals() {
    let _ = env_logger::try_init();
    let config = GatewayConfig::from_json_str(
        r#"{
            "venues": [{
                "name": "paper_swap",
                "exchange_id": "swap",
                "ledger_id": "ethereum",
                "credentials": { "private_key": "0xkey", "address": "0xwallet" },
                "options": {
                    "markets": [{ "symbol": "ETH/USDC", "bid": "99", "ask": "101" }],
                    "balances": { "ETH": "2", "USDC": "500" },
                    "require_approval": true,
                    "confirmation_ms": 5
                }
            }]
        }"#,
    )
    .unwrap();
    let connection = Connection::connect(config, &VenueCatalog::default())
        .await
        .unwrap();
    let swap = VenueId::new("ethereum", "swap");
    assert_eq!(connection.venues(), vec![swap.clone()]);

    let sell = Order::market(&swap, "ETH/USDC", Side::Sell, dec!(1));

    let reply = round_trip(
        &connection,
        request(ProtocolId::Orders, Body::CreateOrder { order: sell.clone() }),
    )
    .await;
    assert_eq!(error_code(&reply), Some(ErrorCode::ApprovalError));

    let approval = ApprovalRequest {
        ledger_id: "ethereum".to_string(),
        exchange_id: "swap".to_string(),
        token: "ETH".to_string(),
        spender: "paper_router".to_string(),
        amount: dec!(2),
    };
    let reply = round_trip(
        &connection,
        request(ProtocolId::Approvals, Body::SetApproval { approval }),
    )
    .await;
    assert!(matches!(reply.message().body(), Body::ApprovalResponse { approval } if approval.amount == dec!(2)));

    let reply = round_trip(
        &connection,
        request(ProtocolId::Orders, Body::CreateOrder { order: sell }),
    )
    .await;
    let Body::OrderCreated { order } = reply.message().body() else {
        panic!("expected ORDER_CREATED, got {:?}", reply.message().body());
    };
    assert_eq!(order.status, OrderStatus::Filled);
    assert_eq!(order.price, Some(dec!(99)));

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Orders,
            Body::CancelOrder {
                order: Order::reference(&swap, order.id.clone().unwrap(), "ETH/USDC"),
            },
        ),
    )
    .await;
    assert_eq!(error_code(&reply), Some(ErrorCode::NotSupported));

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Balances,
            Body::GetBalance {
                asset_id: "USDC".to_string(),
                venue: swap.clone(),
                address: Some("0xwallet".to_string()),
            },
        ),
    )
    .await;
    assert!(matches!(reply.message().body(), Body::Balance { balance } if balance.free == dec!(599)));

    let reply = round_trip(
        &connection,
        request(
            ProtocolId::Balances,
            Body::GetAllBalances {
                venue: swap,
                address: Some("0xsomeone_else".to_string()),
            },
        ),
    )
    .await;
    assert_eq!(error_code(&reply), Some(ErrorCode::RpcError));

    connection.disconnect().await;
}

#[tokio::test(start_paused = true)]
async fn test_slow_venue_times_out() {
    let config = GatewayConfig::default().with_venue(VenueConfig::new("paper").with_options(
        json!({ "latency_ms": 500, "request_timeout_ms": 100 }),
    ));
    let connection = Connection::connect(config, &VenueCatalog::default())
        .await
        .unwrap();

    let reply = round_trip(
        &connection,
        request(ProtocolId::Tickers, Body::GetAllTickers { venue: paper() }),
    )
    .await;
    assert_eq!(error_code(&reply), Some(ErrorCode::RequestTimeout));
}
