/// Cancellable repeating scan timer
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Default period between frame evaluations
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(200);

/// Shared cancel switch for a [`ScanLoop`]
#[derive(Clone, Debug)]
pub struct ScanHandle {
    cancelled: Arc<watch::Sender<bool>>,
}

impl Default for ScanHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanHandle {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            cancelled: Arc::new(sender),
        }
    }

    /// Stop the loop. Returns `true` only for the call that actually
    /// cancelled it; later calls are no-ops.
    pub fn cancel(&self) -> bool {
        !self.cancelled.send_replace(true)
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }
}

/// Fixed-period ticker that ends once cancelled.
///
/// The owner awaits [`next_tick`](Self::next_tick) and does its work between
/// ticks, so evaluations never overlap. A slow evaluation delays the next
/// tick instead of queueing a burst.
pub struct ScanLoop {
    ticker: Interval,
    handle: ScanHandle,
    cancel_rx: watch::Receiver<bool>,
}

impl ScanLoop {
    pub fn new(period: Duration) -> Self {
        Self::with_handle(period, ScanHandle::new())
    }

    /// Loop driven by a handle the caller already holds. A handle cancelled
    /// beforehand yields no ticks at all.
    pub fn with_handle(period: Duration, handle: ScanHandle) -> Self {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let cancel_rx = handle.cancelled.subscribe();
        Self {
            ticker,
            handle,
            cancel_rx,
        }
    }

    pub fn handle(&self) -> ScanHandle {
        self.handle.clone()
    }

    /// Wait for the next tick. `false` once the loop has been cancelled.
    pub async fn next_tick(&mut self) -> bool {
        if self.handle.is_cancelled() {
            return false;
        }

        tokio::select! {
            biased;
            _ = self.cancel_rx.wait_for(|cancelled| *cancelled) => false,
            _ = self.ticker.tick() => !self.handle.is_cancelled(),
        }
    }
}
