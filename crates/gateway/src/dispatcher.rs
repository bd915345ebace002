//! Task dispatcher
//!
//! Runs one tokio task per inbound envelope and queues the correlated reply
//! when it completes. A single actor task owns the set of executing units and
//! the unit -> envelope map, so every mutation of either is serialized.
//!
//! ```text
//!  send() ──validate──► Submit ──► actor ──spawn──► JoinSet
//!                                   │                 │
//!                                   ◄──join_next──────┘
//!                                   │
//!  receive() ◄──────── output ◄─────┘  build_envelope
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, error, info, warn};
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::{self, JoinError, JoinHandle, JoinSet};

use crate::error::GatewayError;
use crate::interface::InterfaceRegistry;
use crate::messages::{Envelope, Message};
use crate::registry::AdapterRegistry;

type UnitFuture = Pin<Box<dyn Future<Output = Option<Message>> + Send>>;

enum Command {
    Submit { envelope: Envelope, unit: UnitFuture },
    Shutdown { done: oneshot::Sender<()> },
}

/// Concurrent request broker
pub struct TaskDispatcher {
    interfaces: Arc<InterfaceRegistry>,
    adapters: Arc<AdapterRegistry>,
    commands: mpsc::UnboundedSender<Command>,
    output: Mutex<mpsc::UnboundedReceiver<Envelope>>,
    executing: Arc<AtomicUsize>,
    actor: Mutex<Option<JoinHandle<()>>>,
}

impl TaskDispatcher {
    /// Start the dispatcher actor on the current runtime
    pub fn spawn(interfaces: Arc<InterfaceRegistry>, adapters: Arc<AdapterRegistry>) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let executing = Arc::new(AtomicUsize::new(0));

        let actor = Actor {
            interfaces: interfaces.clone(),
            commands: command_rx,
            output: output_tx,
            units: JoinSet::new(),
            origins: HashMap::new(),
            executing: executing.clone(),
        };
        let handle = tokio::spawn(actor.run());

        Self {
            interfaces,
            adapters,
            commands,
            output: Mutex::new(output_rx),
            executing,
            actor: Mutex::new(Some(handle)),
        }
    }

    /// Submit an envelope for handling
    ///
    /// Validation happens here, so dialogues advance in submission order.
    /// A message that fails validation still yields exactly one ERROR reply.
    pub fn send(&self, envelope: Envelope) -> Result<(), GatewayError> {
        if self.commands.is_closed() {
            return Err(GatewayError::NotConnected);
        }

        let (unit, admitted) = match self.interfaces.validate(envelope.message()) {
            Ok(()) => {
                let interfaces = self.interfaces.clone();
                let adapters = self.adapters.clone();
                let message = envelope.message().clone();
                let unit: UnitFuture =
                    Box::pin(async move { interfaces.handle(&message, &adapters).await });
                (unit, true)
            }
            Err(err) => {
                warn!("Rejected message from {}: {}", envelope.sender(), err);
                let reply = self.interfaces.reject(envelope.message(), &err);
                let unit: UnitFuture = Box::pin(async move { Some(reply) });
                (unit, false)
            }
        };

        if let Err(mpsc::error::SendError(command)) =
            self.commands.send(Command::Submit { envelope, unit })
        {
            if let Command::Submit { envelope, .. } = command {
                if admitted {
                    self.interfaces.discard(envelope.message());
                }
            }
            return Err(GatewayError::NotConnected);
        }
        Ok(())
    }

    /// Next completed reply, in completion order
    ///
    /// Returns `None` once the dispatcher has shut down and every queued reply
    /// has been received.
    pub async fn receive(&self) -> Option<Envelope> {
        self.output.lock().await.recv().await
    }

    /// Cancel every pending and executing unit and stop the actor
    ///
    /// Calling it again is a no-op.
    pub async fn shutdown(&self) {
        let (done, ack) = oneshot::channel();
        if self.commands.send(Command::Shutdown { done }).is_ok() {
            let _ = ack.await;
        }
        if let Some(handle) = self.actor.lock().await.take() {
            if let Err(e) = handle.await {
                error!("Dispatcher actor failed: {}", e);
            }
        }
    }

    /// Units currently executing
    pub fn in_flight(&self) -> usize {
        self.executing.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }
}

struct Actor {
    interfaces: Arc<InterfaceRegistry>,
    commands: mpsc::UnboundedReceiver<Command>,
    output: mpsc::UnboundedSender<Envelope>,
    units: JoinSet<Option<Message>>,
    origins: HashMap<task::Id, Envelope>,
    executing: Arc<AtomicUsize>,
}

impl Actor {
    async fn run(mut self) {
        info!("Dispatcher started");
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Submit { envelope, unit }) => self.submit(envelope, unit),
                    Some(Command::Shutdown { done }) => {
                        self.stop().await;
                        let _ = done.send(());
                        return;
                    }
                    // every handle dropped
                    None => {
                        self.stop().await;
                        return;
                    }
                },
                Some(joined) = self.units.join_next_with_id(), if !self.units.is_empty() => {
                    self.complete(joined);
                }
            }
        }
    }

    fn submit(&mut self, envelope: Envelope, unit: UnitFuture) {
        let message = envelope.message();
        debug!(
            "Spawning unit: protocol={}, performative={}, dialogue={}",
            message.protocol_id(),
            message.performative(),
            message.dialogue_reference()
        );
        let handle = self.units.spawn(unit);
        self.origins.insert(handle.id(), envelope);
        self.track();
    }

    fn complete(&mut self, joined: Result<(task::Id, Option<Message>), JoinError>) {
        let (id, outcome) = match joined {
            Ok((id, response)) => (id, Ok(response)),
            Err(err) => (err.id(), Err(err)),
        };
        let Some(envelope) = self.origins.remove(&id) else {
            warn!("Completed unit {} has no originating envelope", id);
            self.track();
            return;
        };

        let reply = match outcome {
            Ok(response) => self.interfaces.build_envelope(&envelope, response),
            Err(err) if err.is_panic() => Some(self.interfaces.fail(&envelope, "handler panicked")),
            Err(_) => {
                self.interfaces.discard(envelope.message());
                None
            }
        };
        self.track();

        if let Some(reply) = reply {
            if self.output.send(reply).is_err() {
                debug!("Reply dropped: receiver is gone");
            }
        }
    }

    async fn stop(&mut self) {
        self.commands.close();

        let mut dropped = 0;
        while let Ok(command) = self.commands.try_recv() {
            match command {
                Command::Submit { envelope, .. } => {
                    self.interfaces.discard(envelope.message());
                    dropped += 1;
                }
                Command::Shutdown { done } => {
                    let _ = done.send(());
                }
            }
        }

        let aborted = self.units.len();
        self.units.abort_all();
        while let Some(joined) = self.units.join_next_with_id().await {
            let id = match &joined {
                Ok((id, _)) => *id,
                Err(err) => err.id(),
            };
            if let Some(envelope) = self.origins.remove(&id) {
                self.interfaces.discard(envelope.message());
            }
        }
        self.origins.clear();
        self.track();

        info!(
            "Dispatcher stopped: aborted={}, dropped={}",
            aborted, dropped
        );
    }

    fn track(&self) {
        self.executing.store(self.units.len(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::paper::{PaperExchange, PaperOptions};
    use crate::messages::{Body, ErrorCode, Performative, ProtocolId};
    use mercury_core::VenueId;
    use std::time::Duration;

    fn venue() -> VenueId {
        VenueId::off_chain("paper")
    }

    fn dispatcher(latency_ms: u64) -> TaskDispatcher {
        let mut adapters = AdapterRegistry::new();
        let options = PaperOptions {
            latency_ms,
            ..PaperOptions::default()
        };
        adapters
            .insert(Arc::new(PaperExchange::new(venue(), options).unwrap()))
            .unwrap();
        TaskDispatcher::spawn(Arc::new(InterfaceRegistry::standard()), Arc::new(adapters))
    }

    fn tickers_request() -> Envelope {
        Envelope::new(
            "gateway",
            "agent",
            Message::request(ProtocolId::Tickers, Body::GetAllTickers { venue: venue() }),
        )
    }

    #[tokio::test]
    async fn test_send_receive() {
        let dispatcher = dispatcher(0);
        let request = tickers_request();
        dispatcher.send(request.clone()).unwrap();

        let reply = dispatcher.receive().await.unwrap();
        assert_eq!(reply.message().performative(), Performative::AllTickers);
        assert_eq!(
            reply.message().dialogue_reference(),
            request.message().dialogue_reference()
        );
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_invalid_message_still_gets_a_reply() {
        let dispatcher = dispatcher(0);
        let orphan = Envelope::new(
            "gateway",
            "agent",
            Message::request(ProtocolId::Tickers, Body::AllTickers { tickers: vec![] }),
        );
        dispatcher.send(orphan).unwrap();

        let reply = dispatcher.receive().await.unwrap();
        assert_eq!(
            reply.message().body().error_code(),
            Some(ErrorCode::InvalidDialogue)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_in_flight_units() {
        let dispatcher = dispatcher(1_000);
        for _ in 0..3 {
            dispatcher.send(tickers_request()).unwrap();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(dispatcher.in_flight(), 3);

        dispatcher.shutdown().await;
        assert_eq!(dispatcher.in_flight(), 0);
        assert!(!dispatcher.is_running());
        assert!(dispatcher.receive().await.is_none());
        assert!(matches!(
            dispatcher.send(tickers_request()),
            Err(GatewayError::NotConnected)
        ));

        // idempotent
        dispatcher.shutdown().await;
        assert_eq!(dispatcher.in_flight(), 0);
    }
}
