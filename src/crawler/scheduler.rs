//! Request pacing
//!
//! A single [`RateLimiter`] sits in front of every outbound request and
//! enforces a minimum wall-clock gap between consecutive request starts.
//! Time is read and slept through the [`Clock`] trait so the pacing can be
//! tested without real delays.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Source of the current time and of delays
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Enforces a minimum interval between consecutive outbound requests
///
/// The last-request timestamp is held behind an async mutex for the whole
/// wait, so callers sharing one limiter are paced globally rather than each
/// on their own.
pub struct RateLimiter<C = TokioClock> {
    stagger: Duration,
    clock: C,
    last_sent: Mutex<Option<Instant>>,
}

impl RateLimiter<TokioClock> {
    /// Creates a limiter on the wall clock
    pub fn new(stagger: Duration) -> Self {
        Self::with_clock(stagger, TokioClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Creates a limiter that reads time from `clock`
    pub fn with_clock(stagger: Duration, clock: C) -> Self {
        Self {
            stagger,
            clock,
            last_sent: Mutex::new(None),
        }
    }

    /// The configured minimum gap between requests
    pub fn stagger(&self) -> Duration {
        self.stagger
    }

    /// Waits until the stagger since the previous call has elapsed, then
    /// records now as the new reference point
    ///
    /// The first call never waits. A zero stagger never waits.
    pub async fn wait_then_mark(&self) {
        let mut last_sent = self.last_sent.lock().await;

        if let Some(wait) = time_until_ready(*last_sent, self.stagger, self.clock.now()) {
            tracing::trace!("Staggering next request by {:?}", wait);
            self.clock.sleep(wait).await;
        }

        *last_sent = Some(self.clock.now());
    }
}

/// Time left before the next request may start, or None if it may start now
fn time_until_ready(last_sent: Option<Instant>, stagger: Duration, now: Instant) -> Option<Duration> {
    let last = last_sent?;
    let elapsed = now.saturating_duration_since(last);
    if elapsed < stagger {
        Some(stagger - elapsed)
    } else {
        None
    }
}
