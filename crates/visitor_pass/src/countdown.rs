//! One-second pass countdown ticker.
//!
//! A [`Ticker`] sends a message into the owner's channel once per period
//! until it is cancelled. Every ticker carries a [`TickerId`] so the owner
//! can drop ticks from a ticker it has already replaced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Identifies one started ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TickerId(u64);

impl TickerId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

pub struct Ticker {
    id: TickerId,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Start ticking. The first tick fires one full `period` after start.
    /// Requires a Tokio runtime.
    pub fn start<T, F>(period: Duration, tx: UnboundedSender<T>, make: F) -> Self
    where
        T: Send + 'static,
        F: Fn(TickerId) -> T + Send + 'static,
    {
        let id = TickerId::next();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(make(id)).is_err() {
                            break;
                        }
                    }
                }
            }
            debug!(?id, "ticker stopped");
        });

        Self { id, cancel, handle }
    }

    pub fn id(&self) -> TickerId {
        self.id
    }

    /// Stop the ticker. No tick is sent after this returns.
    pub fn cancel(&self) {
        self.cancel.cancel();
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that fires when this ticker is cancelled or dropped.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
