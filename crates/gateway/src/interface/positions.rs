use std::sync::Arc;

use mercury_ports::{ExchangeAdapter, VenueError};

use super::{HandlerFuture, ProtocolInterface, mismatched};
use crate::messages::{Body, Performative};

pub(super) fn register(interface: ProtocolInterface) -> ProtocolInterface {
    interface
        .with_handler(Performative::GetAllPositions, get_all_positions)
        .with_handler(Performative::GetPosition, get_position)
}

fn get_all_positions(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::GetAllPositions { .. } = body else {
            return Err(mismatched(Performative::GetAllPositions));
        };
        let positions = adapter.fetch_positions().await?;
        Ok(Some(Body::AllPositions { positions }))
    })
}

fn get_position(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::GetPosition { symbol, venue } = body else {
            return Err(mismatched(Performative::GetPosition));
        };
        let position = adapter
            .fetch_positions()
            .await?
            .into_iter()
            .find(|p| p.symbol == symbol)
            .ok_or_else(|| {
                VenueError::BadSymbol(format!("{} has no position in {}", venue, symbol))
            })?;
        Ok(Some(Body::Position { position }))
    })
}
