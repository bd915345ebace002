use std::sync::Arc;

use mercury_core::Order;
use mercury_ports::{ExchangeAdapter, VenueError, VenueResult};

use super::{HandlerFuture, ProtocolInterface, mismatched};
use crate::messages::{Body, Performative};

pub(super) fn register(interface: ProtocolInterface) -> ProtocolInterface {
    interface
        .with_handler(Performative::CreateOrder, create_order)
        .with_handler(Performative::CancelOrder, cancel_order)
        .with_handler(Performative::GetOrder, get_order)
        .with_handler(Performative::GetOrders, get_orders)
}

/// Id of a referenced order
fn order_id(order: &Order) -> VenueResult<&str> {
    order.validate_reference()?;
    order
        .id
        .as_deref()
        .ok_or_else(|| VenueError::InvalidOrder("order id is required".to_string()))
}

pub(super) fn create_order(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::CreateOrder { order } = body else {
            return Err(mismatched(Performative::CreateOrder));
        };
        order.validate()?;
        let order = adapter.create_order(order).await?;
        Ok(Some(Body::OrderCreated { order }))
    })
}

pub(super) fn cancel_order(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::CancelOrder { order } = body else {
            return Err(mismatched(Performative::CancelOrder));
        };
        let order = adapter.cancel_order(order_id(&order)?, &order.symbol).await?;
        Ok(Some(Body::OrderCancelled { order }))
    })
}

pub(super) fn get_order(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::GetOrder { order } = body else {
            return Err(mismatched(Performative::GetOrder));
        };
        let order = adapter.fetch_order(order_id(&order)?, &order.symbol).await?;
        Ok(Some(Body::Order { order }))
    })
}

pub(super) fn get_orders(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::GetOrders { symbol, .. } = body else {
            return Err(mismatched(Performative::GetOrders));
        };
        let orders = adapter.fetch_open_orders(symbol.as_deref()).await?;
        Ok(Some(Body::Orders { orders }))
    })
}
