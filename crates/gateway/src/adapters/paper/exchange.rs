use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use mercury_core::{
    ApprovalRequest, ApprovalResult, Balance, Market, Order, OrderStatus, OrderType, Position,
    Side, Ticker, VenueId,
};
use mercury_ports::{ExchangeAdapter, VenueError, VenueResult};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::options::PaperOptions;
use super::quotes::{Quote, Quotes, notional};
use super::session::Session;
use crate::config::VenueConfig;
use crate::error::ConfigError;

#[derive(Debug, Default, Clone, Copy)]
struct Holding {
    free: Decimal,
    used: Decimal,
}

#[derive(Debug, Default)]
struct Book {
    holdings: BTreeMap<String, Holding>,
    orders: HashMap<String, Order>,
}

impl Book {
    fn free(&self, asset: &str) -> Decimal {
        self.holdings.get(asset).map_or(Decimal::ZERO, |h| h.free)
    }

    fn debit(&mut self, asset: &str, amount: Decimal) {
        self.holdings.entry(asset.to_string()).or_default().free -= amount;
    }

    fn credit(&mut self, asset: &str, amount: Decimal) {
        self.holdings.entry(asset.to_string()).or_default().free += amount;
    }

    fn lock(&mut self, asset: &str, amount: Decimal) {
        let holding = self.holdings.entry(asset.to_string()).or_default();
        holding.free -= amount;
        holding.used += amount;
    }

    fn unlock(&mut self, asset: &str, amount: Decimal) {
        let holding = self.holdings.entry(asset.to_string()).or_default();
        holding.used -= amount;
        holding.free += amount;
    }
}

/// Asset and amount an order spends
fn spend(
    quote: &Quote,
    side: Side,
    amount: Decimal,
    price: Decimal,
) -> VenueResult<(&str, Decimal)> {
    match side {
        Side::Buy => Ok((&quote.quote, notional(amount, price)?)),
        Side::Sell => Ok((&quote.base, amount)),
    }
}

/// Off-chain paper order book
pub struct PaperExchange {
    session: Session,
    quotes: Quotes,
    positions: Vec<Position>,
    book: RwLock<Book>,
}

impl PaperExchange {
    pub const NAME: &'static str = "paper";

    pub fn new(venue: VenueId, options: PaperOptions) -> Result<Self, ConfigError> {
        let quotes = Quotes::new(&venue, &options.markets)?;
        let holdings = options
            .balances
            .iter()
            .map(|(asset, free)| {
                (
                    asset.clone(),
                    Holding {
                        free: *free,
                        used: Decimal::ZERO,
                    },
                )
            })
            .collect();
        let positions = options
            .positions
            .iter()
            .cloned()
            .map(|mut position| {
                position.exchange_id = venue.exchange_id.clone();
                position.ledger_id = venue.ledger_id.clone();
                position
            })
            .collect();

        Ok(Self {
            session: Session::new(venue, &options),
            quotes,
            positions,
            book: RwLock::new(Book {
                holdings,
                orders: HashMap::new(),
            }),
        })
    }

    pub fn from_config(config: &VenueConfig) -> Result<Self, ConfigError> {
        Self::new(config.venue_id(), config.options()?)
    }

    async fn place(&self, mut order: Order) -> VenueResult<Order> {
        order.validate()?;
        let quote = self.quotes.get(&order.symbol)?;
        if let Some(min_amount) = quote.min_amount {
            if order.amount < min_amount {
                return Err(VenueError::InvalidOrder(format!(
                    "amount {} is below the {} minimum of {}",
                    order.amount, order.symbol, min_amount
                )));
            }
        }

        let execution = quote.execution_price(order.side);
        let marketable = match (order.order_type, order.price) {
            (OrderType::Market, _) | (OrderType::Limit, None) => true,
            (OrderType::Limit, Some(limit)) => match order.side {
                Side::Buy => limit >= execution,
                Side::Sell => limit <= execution,
            },
        };
        let price = match order.price {
            Some(limit) if !marketable => limit,
            _ => execution,
        };
        let value = notional(order.amount, price)?;
        let (asset, required) = spend(quote, order.side, order.amount, price)?;

        let mut book = self.book.write().await;
        let free = book.free(asset);
        if free < required {
            return Err(VenueError::InsufficientFunds(format!(
                "{} {} requires {} {}, {} free",
                order.side.as_str(),
                order.symbol,
                required,
                asset,
                free
            )));
        }

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        order.id = Some(id.clone());
        order.status = OrderStatus::Open;
        order.created_at = Some(now);
        order.updated_at = Some(now);

        if marketable {
            book.debit(asset, required);
            match order.side {
                Side::Buy => book.credit(&quote.base, order.amount),
                Side::Sell => book.credit(&quote.quote, value),
            }
            if order.price.is_none() {
                order.price = Some(price);
            }
            order.apply_fill(order.amount, now);
        } else {
            book.lock(asset, required);
        }

        info!(
            "Order accepted: id={}, symbol={}, side={}, price={}, status={:?}",
            id,
            order.symbol,
            order.side.as_str(),
            price,
            order.status
        );
        book.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn cancel(&self, order_id: &str, symbol: &str) -> VenueResult<Order> {
        let mut book = self.book.write().await;
        let mut order = book
            .orders
            .get(order_id)
            .filter(|o| o.symbol == symbol)
            .cloned()
            .ok_or_else(|| {
                VenueError::OrderNotFound(format!(
                    "{} has no order {} on {}",
                    self.session.venue(),
                    order_id,
                    symbol
                ))
            })?;
        if !order.status.is_active() {
            return Err(VenueError::InvalidOrder(format!(
                "order {} is already {:?}",
                order_id, order.status
            )));
        }

        let quote = self.quotes.get(&order.symbol)?;
        let price = order.price.unwrap_or(quote.execution_price(order.side));
        let (asset, locked) = spend(quote, order.side, order.remaining, price)?;
        book.unlock(asset, locked);

        order.status = OrderStatus::Cancelled;
        order.updated_at = Some(Utc::now());
        info!("Order cancelled: id={}, symbol={}", order_id, symbol);
        book.orders.insert(order_id.to_string(), order.clone());
        Ok(order)
    }

    async fn order(&self, order_id: &str, symbol: &str) -> VenueResult<Order> {
        self.book
            .read()
            .await
            .orders
            .get(order_id)
            .filter(|o| o.symbol == symbol)
            .cloned()
            .ok_or_else(|| {
                VenueError::OrderNotFound(format!(
                    "{} has no order {}",
                    self.session.venue(),
                    order_id
                ))
            })
    }

    async fn open_orders(&self, symbol: Option<&str>) -> VenueResult<Vec<Order>> {
        let book = self.book.read().await;
        let mut orders: Vec<Order> = book
            .orders
            .values()
            .filter(|o| o.status.is_active())
            .filter(|o| symbol.is_none_or(|s| o.symbol == s))
            .cloned()
            .collect();
        orders.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(orders)
    }

    async fn balances(&self) -> VenueResult<Vec<Balance>> {
        let book = self.book.read().await;
        Ok(book
            .holdings
            .iter()
            .map(|(asset, holding)| Balance {
                asset_id: asset.clone(),
                free: holding.free,
                used: holding.used,
                total: holding.free + holding.used,
                is_native: false,
                contract_address: None,
            })
            .collect())
    }

    fn marked_positions(&self) -> Vec<Position> {
        self.positions
            .iter()
            .cloned()
            .map(|mut position| {
                if let Ok(quote) = self.quotes.get(&position.symbol) {
                    position.mark_price = quote.mid();
                }
                position
            })
            .collect()
    }
}

#[async_trait]
impl ExchangeAdapter for PaperExchange {
    fn venue(&self) -> &VenueId {
        self.session.venue()
    }

    async fn fetch_markets(&self) -> VenueResult<Vec<Market>> {
        self.session
            .call("fetch_markets", async { Ok(self.quotes.markets()) })
            .await
    }

    async fn fetch_tickers(&self) -> VenueResult<Vec<Ticker>> {
        self.session
            .call("fetch_tickers", async { Ok(self.quotes.tickers()) })
            .await
    }

    async fn fetch_ticker(&self, symbol: &str) -> VenueResult<Ticker> {
        self.session
            .call("fetch_ticker", async { self.quotes.ticker(symbol) })
            .await
    }

    // Off-chain accounts are keyed by API credentials, not address
    async fn fetch_balance(&self, _address: Option<&str>) -> VenueResult<Vec<Balance>> {
        self.session.call("fetch_balance", self.balances()).await
    }

    async fn fetch_positions(&self) -> VenueResult<Vec<Position>> {
        self.session
            .call("fetch_positions", async { Ok(self.marked_positions()) })
            .await
    }

    async fn create_order(&self, order: Order) -> VenueResult<Order> {
        self.session.call("create_order", self.place(order)).await
    }

    async fn cancel_order(&self, order_id: &str, symbol: &str) -> VenueResult<Order> {
        self.session
            .call("cancel_order", self.cancel(order_id, symbol))
            .await
    }

    async fn fetch_order(&self, order_id: &str, symbol: &str) -> VenueResult<Order> {
        self.session
            .call("fetch_order", self.order(order_id, symbol))
            .await
    }

    async fn fetch_open_orders(&self, symbol: Option<&str>) -> VenueResult<Vec<Order>> {
        self.session
            .call("fetch_open_orders", self.open_orders(symbol))
            .await
    }

    async fn set_approval(&self, _approval: ApprovalRequest) -> VenueResult<ApprovalResult> {
        Err(VenueError::not_supported(
            self.session.venue().to_string(),
            "set_approval",
        ))
    }

    async fn close(&self) -> VenueResult<()> {
        self.session.close();
        info!("Paper session closed: venue={}", self.session.venue());
        Ok(())
    }
}
