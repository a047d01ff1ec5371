//! Synthesis pacing gate
//!
//! Fixed-interval gate in front of the provider: every call to `acquire`
//! waits until at least the configured interval has passed since the
//! previous one. This is a rate-limit accommodation for third-party speech
//! APIs, configured once rather than sprinkled as sleeps through the loop.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Fixed-interval gate
#[derive(Debug)]
pub struct IntervalGate {
    interval: Duration,
    last: Option<Instant>,
}

impl IntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Wait until the interval since the previous acquisition has elapsed.
    /// The first acquisition passes immediately.
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last {
            sleep_until(last + self.interval).await;
        }
        self.last = Some(Instant::now());
    }
}
