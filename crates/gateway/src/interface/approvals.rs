use std::sync::Arc;

use mercury_ports::ExchangeAdapter;

use super::{HandlerFuture, ProtocolInterface, mismatched};
use crate::messages::{Body, Performative};

pub(super) fn register(interface: ProtocolInterface) -> ProtocolInterface {
    interface.with_handler(Performative::SetApproval, set_approval)
}

fn set_approval(adapter: Arc<dyn ExchangeAdapter>, body: Body) -> HandlerFuture {
    Box::pin(async move {
        let Body::SetApproval { approval } = body else {
            return Err(mismatched(Performative::SetApproval));
        };
        let approval = adapter.set_approval(approval).await?;
        Ok(Some(Body::ApprovalResponse { approval }))
    })
}
