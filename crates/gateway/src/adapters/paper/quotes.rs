use std::collections::BTreeMap;

use chrono::Utc;
use mercury_core::{Market, Side, Ticker, VenueId};
use mercury_ports::{VenueError, VenueResult};
use rust_decimal::Decimal;

use super::options::PaperMarket;
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub(crate) struct Quote {
    pub base: String,
    pub quote: String,
    pub bid: Decimal,
    pub ask: Decimal,
    pub min_amount: Option<Decimal>,
}

impl Quote {
    /// Price a marketable order executes at
    pub fn execution_price(&self, side: Side) -> Decimal {
        match side {
            Side::Buy => self.ask,
            Side::Sell => self.bid,
        }
    }

    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }
}

/// Quote-asset value of `amount` at `price`
pub fn notional(amount: Decimal, price: Decimal) -> VenueResult<Decimal> {
    amount.checked_mul(price).ok_or_else(|| {
        VenueError::InvalidOrder(format!("{} at {} overflows the order value", amount, price))
    })
}

/// Static quotes of a paper venue, by symbol
#[derive(Debug)]
pub(crate) struct Quotes {
    venue: VenueId,
    quotes: BTreeMap<String, Quote>,
}

impl Quotes {
    pub fn new(venue: &VenueId, markets: &[PaperMarket]) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidOptions {
            venue: venue.to_string(),
            reason,
        };

        let mut quotes = BTreeMap::new();
        for market in markets {
            let (base, quote) = market
                .symbol
                .split_once('/')
                .filter(|(b, q)| !b.is_empty() && !q.is_empty())
                .ok_or_else(|| invalid(format!("symbol {} is not BASE/QUOTE", market.symbol)))?;
            if market.bid <= Decimal::ZERO || market.ask < market.bid {
                return Err(invalid(format!(
                    "{} quote bid={} ask={} is crossed or non-positive",
                    market.symbol, market.bid, market.ask
                )));
            }
            quotes.insert(
                market.symbol.clone(),
                Quote {
                    base: base.to_string(),
                    quote: quote.to_string(),
                    bid: market.bid,
                    ask: market.ask,
                    min_amount: market.min_amount,
                },
            );
        }

        Ok(Self {
            venue: venue.clone(),
            quotes,
        })
    }

    pub fn get(&self, symbol: &str) -> VenueResult<&Quote> {
        self.quotes
            .get(symbol)
            .ok_or_else(|| VenueError::BadSymbol(format!("{} is not listed on {}", symbol, self.venue)))
    }

    /// True if some listed pair trades the asset
    pub fn lists_asset(&self, asset: &str) -> bool {
        self.quotes
            .values()
            .any(|q| q.base == asset || q.quote == asset)
    }

    pub fn markets(&self) -> Vec<Market> {
        self.quotes
            .iter()
            .map(|(symbol, quote)| Market {
                id: symbol.replace('/', ""),
                symbol: symbol.clone(),
                base: quote.base.clone(),
                quote: quote.quote.clone(),
                exchange_id: self.venue.exchange_id.clone(),
                ledger_id: self.venue.ledger_id.clone(),
                active: true,
                min_amount: quote.min_amount,
                price_precision: Some(quote.bid.scale().max(quote.ask.scale())),
            })
            .collect()
    }

    pub fn ticker(&self, symbol: &str) -> VenueResult<Ticker> {
        let quote = self.get(symbol)?;
        Ok(Self::to_ticker(symbol, quote))
    }

    pub fn tickers(&self) -> Vec<Ticker> {
        self.quotes
            .iter()
            .map(|(symbol, quote)| Self::to_ticker(symbol, quote))
            .collect()
    }

    fn to_ticker(symbol: &str, quote: &Quote) -> Ticker {
        Ticker {
            symbol: symbol.to_string(),
            asset_a: quote.base.clone(),
            asset_b: quote.quote.clone(),
            bid: quote.bid,
            ask: quote.ask,
            high: None,
            low: None,
            last: Some(quote.mid()),
            timestamp: Utc::now(),
        }
    }
}
