//! Per-protocol dialogue state machines

use crate::messages::{Performative, ProtocolId};

use Performative::*;

/// Immutable table of legal conversations for one protocol
#[derive(Debug)]
pub struct DialogueContract {
    pub protocol_id: ProtocolId,
    /// Every performative the protocol knows
    pub performatives: &'static [Performative],
    /// Performatives that may open a dialogue
    pub initial: &'static [Performative],
    /// Performatives that close a dialogue
    pub terminal: &'static [Performative],
    /// Non-terminal performative -> legal replies
    pub replies: &'static [(Performative, &'static [Performative])],
}

pub static ORDERS: DialogueContract = DialogueContract {
    protocol_id: ProtocolId::Orders,
    performatives: &[
        CreateOrder,
        OrderCreated,
        CancelOrder,
        OrderCancelled,
        GetOrder,
        Order,
        GetOrders,
        Orders,
        Error,
    ],
    initial: &[CreateOrder, CancelOrder, GetOrder, GetOrders],
    terminal: &[OrderCreated, OrderCancelled, Order, Orders, Error],
    replies: &[
        (CreateOrder, &[OrderCreated, Error]),
        (CancelOrder, &[OrderCancelled, Error]),
        (GetOrder, &[Order, Error]),
        (GetOrders, &[Orders, Error]),
    ],
};

pub static MARKETS: DialogueContract = DialogueContract {
    protocol_id: ProtocolId::Markets,
    performatives: &[GetAllMarkets, AllMarkets, GetMarket, Market, Error],
    initial: &[GetAllMarkets, GetMarket],
    terminal: &[AllMarkets, Market, Error],
    replies: &[
        (GetAllMarkets, &[AllMarkets, Error]),
        (GetMarket, &[Market, Error]),
    ],
};

pub static TICKERS: DialogueContract = DialogueContract {
    protocol_id: ProtocolId::Tickers,
    performatives: &[GetAllTickers, AllTickers, GetTicker, Ticker, Error],
    initial: &[GetAllTickers, GetTicker],
    terminal: &[AllTickers, Ticker, Error],
    replies: &[
        (GetAllTickers, &[AllTickers, Error]),
        (GetTicker, &[Ticker, Error]),
    ],
};

pub static BALANCES: DialogueContract = DialogueContract {
    protocol_id: ProtocolId::Balances,
    performatives: &[GetAllBalances, AllBalances, GetBalance, Balance, Error],
    initial: &[GetAllBalances, GetBalance],
    terminal: &[AllBalances, Balance, Error],
    replies: &[
        (GetAllBalances, &[AllBalances, Error]),
        (GetBalance, &[Balance, Error]),
    ],
};

pub static POSITIONS: DialogueContract = DialogueContract {
    protocol_id: ProtocolId::Positions,
    performatives: &[GetAllPositions, AllPositions, GetPosition, Position, Error],
    initial: &[GetAllPositions, GetPosition],
    terminal: &[AllPositions, Position, Error],
    replies: &[
        (GetAllPositions, &[AllPositions, Error]),
        (GetPosition, &[Position, Error]),
    ],
};

pub static APPROVALS: DialogueContract = DialogueContract {
    protocol_id: ProtocolId::Approvals,
    performatives: &[SetApproval, ApprovalResponse, Error],
    initial: &[SetApproval],
    terminal: &[ApprovalResponse, Error],
    replies: &[(SetApproval, &[ApprovalResponse, Error])],
};

impl DialogueContract {
    pub fn for_protocol(protocol_id: ProtocolId) -> &'static DialogueContract {
        match protocol_id {
            ProtocolId::Orders => &ORDERS,
            ProtocolId::Markets => &MARKETS,
            ProtocolId::Tickers => &TICKERS,
            ProtocolId::Balances => &BALANCES,
            ProtocolId::Positions => &POSITIONS,
            ProtocolId::Approvals => &APPROVALS,
        }
    }

    pub fn contains(&self, performative: Performative) -> bool {
        self.performatives.contains(&performative)
    }

    pub fn is_initial(&self, performative: Performative) -> bool {
        self.initial.contains(&performative)
    }

    pub fn is_terminal(&self, performative: Performative) -> bool {
        self.terminal.contains(&performative)
    }

    /// Legal replies to a performative (empty for terminal ones)
    pub fn valid_replies(&self, performative: Performative) -> &'static [Performative] {
        self.replies
            .iter()
            .find(|(request, _)| *request == performative)
            .map(|(_, replies)| *replies)
            .unwrap_or(&[])
    }

    pub fn is_valid_reply(&self, previous: Performative, next: Performative) -> bool {
        self.valid_replies(previous).contains(&next)
    }

    /// The non-error reply that completes a request
    pub fn success_reply(&self, request: Performative) -> Option<Performative> {
        self.valid_replies(request)
            .iter()
            .copied()
            .find(|reply| *reply != Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contracts_are_well_formed() {
        for protocol in ProtocolId::ALL {
            let contract = DialogueContract::for_protocol(protocol);
            assert_eq!(contract.protocol_id, protocol);

            for &performative in contract.performatives {
                let replies = contract.valid_replies(performative);
                if contract.is_terminal(performative) {
                    assert!(replies.is_empty(), "{protocol}: {performative} is terminal");
                } else {
                    assert!(!replies.is_empty(), "{protocol}: {performative} has no replies");
                    assert!(replies.iter().all(|r| contract.contains(*r)));
                }
            }

            for &initial in contract.initial {
                assert!(contract.contains(initial));
                assert!(!contract.is_terminal(initial));
                assert!(contract.is_valid_reply(initial, Error));
                assert!(contract.success_reply(initial).is_some());
            }

            // every performative is either a request or a terminal reply
            for &performative in contract.performatives {
                assert!(contract.is_initial(performative) ^ contract.is_terminal(performative));
            }
        }
    }

    #[test]
    fn test_orders_replies() {
        assert_eq!(ORDERS.success_reply(CreateOrder), Some(OrderCreated));
        assert_eq!(ORDERS.success_reply(GetOrders), Some(Orders));
        assert!(!ORDERS.is_valid_reply(CreateOrder, Orders));
        assert!(ORDERS.valid_replies(OrderCreated).is_empty());
        assert!(!ORDERS.contains(GetTicker));
    }
}
