//! Fixed-interval cycle scheduling.
//!
//! The first tick fires immediately, then one tick per period. Each cycle
//! is awaited inside the loop, so two cycles are never in flight at once.
//! Ticks that come due while a cycle is still running are skipped rather
//! than queued.

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Call `tick` now and then every period until `shutdown` resolves.
    ///
    /// `shutdown` is only observed between cycles; a running cycle is allowed
    /// to finish.
    pub async fn run<F, Fut, S>(&self, mut tick: F, shutdown: S)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
        S: Future<Output = ()>,
    {
        info!("Scheduler started (interval: {} seconds)", self.period.as_secs());

        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping scheduler");
                    break;
                }
                _ = timer.tick() => {}
            }
            tick().await;
        }
    }
}
