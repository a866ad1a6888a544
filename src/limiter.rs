use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Enforces a minimum spacing between consecutive operations
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// A limiter that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until `interval` has elapsed since the previous operation, then
    /// records the current instant as the start of a new one
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last {
            let ready_at = last + self.interval;
            if ready_at > Instant::now() {
                ::log::trace!("Rate limiter waiting {:?}", ready_at - Instant::now());
                sleep_until(ready_at).await;
            }
        }
        self.last = Some(Instant::now());
    }

    /// Restarts the spacing from now (call when an operation finishes)
    pub fn mark(&mut self) {
        self.last = Some(Instant::now());
    }
}
