//! Periodic price refresher.
//!
//! Re-walks all cards on a fixed interval and appends one fluctuated
//! tick per card (see `IngestService::refresh_all`). Writes serialize
//! against concurrent readers through the shared mutex, preserving the
//! original single-writer consistency on a multi-threaded runtime.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::CardTracker;

/// Spawn the background refresh loop. The first pass runs after one full
/// interval, then every `every` thereafter. Drop or abort the handle to
/// stop refreshing.
pub fn spawn_price_refresher(
    tracker: Arc<Mutex<CardTracker>>,
    every: Duration,
) -> JoinHandle<()> {
    info!(every_ms = every.as_millis() as u64, "price refresher started");

    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // An interval's first tick completes immediately; consume it so
        // the first refresh happens one full period after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let mut tracker = tracker.lock().await;
            tracker.refresh_prices();
        }
    })
}
