use std::sync::Arc;

use mercury_ports::{ExchangeAdapter, VenueError};

use super::{HandlerFuture, ProtocolInterface, mismatched};
use crate::messages::{Body, Performative};

pub(super) fn register(interface: ProtocolInterface) -> ProtocolInterface {
    interface
        .with_handler(Performative::GetAllMarkets, get_all_markets)
        .with_handler(Performative::GetMarket, get_market)
}

fn get_all_markets(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::GetAllMarkets { currency, .. } = body else {
            return Err(mismatched(Performative::GetAllMarkets));
        };
        let mut markets = adapter.fetch_markets().await?;
        if let Some(currency) = currency {
            markets.retain(|m| m.involves(&currency));
        }
        Ok(Some(Body::AllMarkets { markets }))
    })
}

// Matches either the venue's market id or the unified symbol
fn get_market(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::GetMarket { id, venue } = body else {
            return Err(mismatched(Performative::GetMarket));
        };
        let market = adapter
            .fetch_markets()
            .await?
            .into_iter()
            .find(|m| m.id == id || m.symbol == id)
            .ok_or_else(|| VenueError::BadSymbol(format!("{} lists no market {}", venue, id)))?;
        Ok(Some(Body::Market { market }))
    })
}
