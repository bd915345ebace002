use std::sync::Arc;

use mercury_ports::{ExchangeAdapter, VenueError};

use super::{HandlerFuture, ProtocolInterface, mismatched};
use crate::messages::{Body, Performative};

pub(super) fn register(interface: ProtocolInterface) -> ProtocolInterface {
    interface
        .with_handler(Performative::GetAllBalances, get_all_balances)
        .with_handler(Performative::GetBalance, get_balance)
}

fn get_all_balances(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::GetAllBalances { address, .. } = body else {
            return Err(mismatched(Performative::GetAllBalances));
        };
        let balances = adapter.fetch_balance(address.as_deref()).await?;
        Ok(Some(Body::AllBalances { balances }))
    })
}

fn get_balance(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::GetBalance {
            asset_id,
            venue,
            address,
        } = body
        else {
            return Err(mismatched(Performative::GetBalance));
        };
        let balance = adapter
            .fetch_balance(address.as_deref())
            .await?
            .into_iter()
            .find(|b| b.asset_id == asset_id)
            .ok_or_else(|| {
                VenueError::UnsupportedAsset(format!("{} holds no {}", venue, asset_id))
            })?;
        Ok(Some(Body::Balance { balance }))
    })
}
