use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::debug;
use mercury_core::VenueId;
use mercury_ports::{VenueError, VenueResult};
use tokio::time::{sleep, timeout};

use super::options::PaperOptions;

/// Simulated connection to a paper venue
///
/// Every call pays the configured latency and is bounded by the request
/// timeout, like a REST/RPC round trip.
#[derive(Debug)]
pub(crate) struct Session {
    venue: VenueId,
    latency: Duration,
    request_timeout: Duration,
    closed: AtomicBool,
}

impl Session {
    pub fn new(venue: VenueId, options: &PaperOptions) -> Self {
        Self {
            venue,
            latency: Duration::from_millis(options.latency_ms),
            request_timeout: Duration::from_millis(options.request_timeout_ms),
            closed: AtomicBool::new(false),
        }
    }

    pub fn venue(&self) -> &VenueId {
        &self.venue
    }

    /// Run one venue call
    pub async fn call<T, F>(&self, capability: &'static str, call: F) -> VenueResult<T>
    where
        F: Future<Output = VenueResult<T>>,
    {
        if self.closed.load(Ordering::Acquire) {
            return Err(VenueError::ExchangeNotAvailable(format!(
                "session to {} is closed",
                self.venue
            )));
        }
        debug!("{} {}", self.venue, capability);

        let latency = self.latency;
        let round_trip = async move {
            if !latency.is_zero() {
                sleep(latency).await;
            }
            call.await
        };

        match timeout(self.request_timeout, round_trip).await {
            Ok(result) => result,
            Err(_) => Err(VenueError::RequestTimeout(format!(
                "{} {} exceeded {}ms",
                self.venue,
                capability,
                self.request_timeout.as_millis()
            ))),
        }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(latency_ms: u64, request_timeout_ms: u64) -> Session {
        let options = PaperOptions {
            latency_ms,
            request_timeout_ms,
            ..PaperOptions::default()
        };
        Session::new(VenueId::off_chain("paper"), &options)
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_times_out() {
        let session = session(50, 20);
        let result = session.call("fetch_markets", async { Ok(()) }).await;
        assert!(matches!(result, Err(VenueError::RequestTimeout(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_within_timeout() {
        let session = session(5, 20);
        let result = session.call("fetch_markets", async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_closed_session_is_unavailable() {
        let session = session(0, 20);
        session.close();
        let result = session.call("fetch_markets", async { Ok(()) }).await;
        assert!(matches!(result, Err(VenueError::ExchangeNotAvailable(_))));
    }
}
