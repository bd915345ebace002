use std::sync::Arc;

use mercury_ports::ExchangeAdapter;

use super::{HandlerFuture, ProtocolInterface, mismatched};
use crate::messages::{Body, Performative};

pub(super) fn register(interface: ProtocolInterface) -> ProtocolInterface {
    interface
        .with_handler(Performative::GetAllTickers, get_all_tickers)
        .with_handler(Performative::GetTicker, get_ticker)
}

fn get_all_tickers(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::GetAllTickers { .. } = body else {
            return Err(mismatched(Performative::GetAllTickers));
        };
        let tickers = adapter.fetch_tickers().await?;
        Ok(Some(Body::AllTickers { tickers }))
    })
}

fn get_ticker(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::GetTicker { symbol, .. } = body else {
            return Err(mismatched(Performative::GetTicker));
        };
        let ticker = adapter.fetch_ticker(&symbol).await?;
        Ok(Some(Body::Ticker { ticker }))
    })
}
