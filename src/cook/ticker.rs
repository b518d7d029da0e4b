use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Interval between timer ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Periodic tick source for a running step timer.
///
/// The background task is aborted when the ticker is dropped, so
/// hosts create one only while a timer is running and let it go as soon as
/// the timer pauses, expires or the session ends.
pub struct Ticker {
    handle: JoinHandle<()>,
    ticks: mpsc::Receiver<()>,
}

impl Ticker {
    /// Start ticking once per [`TICK_PERIOD`]. Must be called inside a
    /// tokio runtime.
    pub fn start() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        let (tx, ticks) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        debug!("Ticker started ({:?})", period);
        Ticker { handle, ticks }
    }

    /// Wait for the next tick. Returns `None` if the tick task has ended.
    pub async fn tick(&mut self) -> Option<()> {
        self.ticks.recv().await
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Ticker stopped");
    }
}
