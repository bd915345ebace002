use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use mercury_core::{
    ApprovalRequest, ApprovalResult, Balance, Market, Order, OrderStatus, OrderType, Position,
    Side, Ticker, VenueId,
};
use mercury_ports::{ExchangeAdapter, VenueError, VenueResult};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};
use tokio::time::sleep;
use uuid::Uuid;

use super::options::PaperOptions;
use super::quotes::{Quotes, notional};
use super::session::Session;
use crate::config::VenueConfig;
use crate::error::ConfigError;

#[derive(Debug, Default)]
struct Wallet {
    balances: BTreeMap<String, Decimal>,
    /// (token, spender) -> remaining allowance
    allowances: HashMap<(String, String), Decimal>,
}

/// On-chain paper swap venue
///
/// Swaps execute immediately at the quoted bid/ask once the simulated
/// transaction confirms. Transactions are signed one at a time: the signer
/// nonce stays locked until confirmation, and nothing is settled if the call
/// is dropped before then.
pub struct PaperSwap {
    session: Session,
    quotes: Quotes,
    address: String,
    router: String,
    native_asset: String,
    require_approval: bool,
    confirmation: Duration,
    wallet: RwLock<Wallet>,
    nonce: Mutex<u64>,
}

impl PaperSwap {
    pub const NAME: &'static str = "paper_swap";

    pub fn new(
        venue: VenueId,
        address: impl Into<String>,
        options: PaperOptions,
    ) -> Result<Self, ConfigError> {
        if venue.is_off_chain() {
            return Err(ConfigError::InvalidOptions {
                venue: venue.to_string(),
                reason: "swap venues settle on a ledger; set ledger_id".to_string(),
            });
        }
        let quotes = Quotes::new(&venue, &options.markets)?;

        Ok(Self {
            session: Session::new(venue, &options),
            quotes,
            address: address.into(),
            router: options.router,
            native_asset: options.native_asset,
            require_approval: options.require_approval,
            confirmation: Duration::from_millis(options.confirmation_ms),
            wallet: RwLock::new(Wallet {
                balances: options.balances,
                allowances: HashMap::new(),
            }),
            nonce: Mutex::new(0),
        })
    }

    pub fn from_config(config: &VenueConfig) -> Result<Self, ConfigError> {
        let venue = config.venue_id();
        config.credentials.require_private_key(&venue)?;
        let address = config
            .credentials
            .address
            .clone()
            .unwrap_or_else(|| format!("0x{}", Uuid::new_v4().simple()));
        Self::new(venue, address, config.options()?)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sign and wait for confirmation; the caller holds the signer throughout
    async fn submit_transaction(&self, nonce: u64) -> String {
        let tx_hash = format!("0x{}", Uuid::new_v4().simple());
        debug!(
            "Submitted transaction: venue={}, nonce={}, tx={}",
            self.session.venue(),
            nonce,
            tx_hash
        );
        if !self.confirmation.is_zero() {
            sleep(self.confirmation).await;
        }
        tx_hash
    }

    async fn swap(&self, mut order: Order) -> VenueResult<Order> {
        order.validate()?;
        let quote = self.quotes.get(&order.symbol)?;
        let price = quote.execution_price(order.side);
        if let (OrderType::Limit, Some(limit)) = (order.order_type, order.price) {
            let within = match order.side {
                Side::Buy => limit >= price,
                Side::Sell => limit <= price,
            };
            if !within {
                return Err(VenueError::InvalidOrder(format!(
                    "limit {} does not cross the {} quote of {}",
                    limit,
                    order.side.as_str(),
                    price
                )));
            }
        }

        let value = notional(order.amount, price)?;
        let (pay, pay_amount, receive, receive_amount) = match order.side {
            Side::Buy => (&quote.quote, value, &quote.base, order.amount),
            Side::Sell => (&quote.base, order.amount, &quote.quote, value),
        };

        // Funds are checked and settled under the signer
        let mut nonce = self.nonce.lock().await;
        self.check_spend(pay, pay_amount).await?;
        let tx_hash = self.submit_transaction(*nonce).await;
        {
            let mut wallet = self.wallet.write().await;
            *wallet.balances.entry(pay.clone()).or_default() -= pay_amount;
            *wallet.balances.entry(receive.clone()).or_default() += receive_amount;
            if self.require_approval {
                let key = (pay.clone(), self.router.clone());
                *wallet.allowances.entry(key).or_default() -= pay_amount;
            }
        }
        *nonce += 1;

        let now = Utc::now();
        order.id = Some(tx_hash.clone());
        order.price = Some(price);
        order.created_at = Some(now);
        order.apply_fill(order.amount, now);
        debug_assert_eq!(order.status, OrderStatus::Filled);

        info!(
            "Swap confirmed: venue={}, tx={}, symbol={}, side={}, amount={}, price={}",
            self.session.venue(),
            tx_hash,
            order.symbol,
            order.side.as_str(),
            order.amount,
            price
        );
        Ok(order)
    }

    async fn check_spend(&self, token: &str, amount: Decimal) -> VenueResult<()> {
        let wallet = self.wallet.read().await;
        let balance = wallet.balances.get(token).copied().unwrap_or_default();
        if balance < amount {
            return Err(VenueError::InsufficientFunds(format!(
                "swap requires {} {}, wallet {} holds {}",
                amount, token, self.address, balance
            )));
        }
        if self.require_approval {
            let allowance = wallet
                .allowances
                .get(&(token.to_string(), self.router.clone()))
                .copied()
                .unwrap_or_default();
            if allowance < amount {
                return Err(VenueError::Approval(format!(
                    "{} allowance for {} is {}, swap requires {}",
                    token, self.router, allowance, amount
                )));
            }
        }
        Ok(())
    }

    async fn approve(&self, approval: ApprovalRequest) -> VenueResult<ApprovalResult> {
        if !self.quotes.lists_asset(&approval.token) {
            return Err(VenueError::UnsupportedAsset(format!(
                "{} is not traded on {}",
                approval.token,
                self.session.venue()
            )));
        }
        if approval.amount <= Decimal::ZERO {
            return Err(VenueError::Approval(format!(
                "approval amount must be positive, got {}",
                approval.amount
            )));
        }

        let mut nonce = self.nonce.lock().await;
        let tx_hash = self.submit_transaction(*nonce).await;
        self.wallet.write().await.allowances.insert(
            (approval.token.clone(), approval.spender.clone()),
            approval.amount,
        );
        *nonce += 1;

        info!(
            "Approval confirmed: venue={}, tx={}, token={}, spender={}, amount={}",
            self.session.venue(),
            tx_hash,
            approval.token,
            approval.spender,
            approval.amount
        );
        Ok(ApprovalResult {
            token: approval.token,
            spender: approval.spender,
            amount: approval.amount,
            tx_hash,
        })
    }

    async fn balances(&self, address: Option<&str>) -> VenueResult<Vec<Balance>> {
        if let Some(address) = address {
            if !address.eq_ignore_ascii_case(&self.address) {
                return Err(VenueError::Rpc(format!(
                    "{} has no state for account {}",
                    self.session.venue(),
                    address
                )));
            }
        }
        let wallet = self.wallet.read().await;
        Ok(wallet
            .balances
            .iter()
            .map(|(asset, amount)| Balance {
                is_native: *asset == self.native_asset,
                ..Balance::free(asset.clone(), *amount)
            })
            .collect())
    }

    fn unsupported(&self, capability: &'static str) -> VenueError {
        VenueError::not_supported(self.session.venue().to_string(), capability)
    }

    #[cfg(test)]
    async fn nonce(&self) -> u64 {
        *self.nonce.lock().await
    }
}

#[async_trait]
impl ExchangeAdapter for PaperSwap {
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

    async fn fetch_balance(&self, address: Option<&str>) -> VenueResult<Vec<Balance>> {
        self.session
            .call("fetch_balance", self.balances(address))
            .await
    }

    async fn fetch_positions(&self) -> VenueResult<Vec<Position>> {
        Err(self.unsupported("fetch_positions"))
    }

    async fn create_order(&self, order: Order) -> VenueResult<Order> {
        self.session.call("create_order", self.swap(order)).await
    }

    async fn cancel_order(&self, _order_id: &str, _symbol: &str) -> VenueResult<Order> {
        Err(self.unsupported("cancel_order"))
    }

    async fn fetch_order(&self, _order_id: &str, _symbol: &str) -> VenueResult<Order> {
        Err(self.unsupported("fetch_order"))
    }

    async fn fetch_open_orders(&self, _symbol: Option<&str>) -> VenueResult<Vec<Order>> {
        Err(self.unsupported("fetch_open_orders"))
    }

    async fn set_approval(&self, approval: ApprovalRequest) -> VenueResult<ApprovalResult> {
        self.session.call("set_approval", self.approve(approval)).await
    }

    async fn close(&self) -> VenueResult<()> {
        self.session.close();
        info!("Paper swap session closed: venue={}", self.session.venue());
        Ok(())
    }
}
