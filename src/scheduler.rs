// src/scheduler.rs
//! Periodic scan trigger. One scan runs to completion before another may
//! start: the session sits behind a `tokio::sync::Mutex` and a tick that
//! finds it locked is dropped, not queued. `/off` only disarms future
//! ticks; an in-flight scan is never aborted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use metrics::counter;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::MonitorConfig;
use crate::fetch::DocumentSource;
use crate::listing::ListingSource;
use crate::market_hours;
use crate::notify::Notifier;
use crate::scan::{MonitorSession, ScanMode};

/// Shared I/O collaborators of a scan.
#[derive(Clone)]
pub struct ScanDeps {
    pub listing: Arc<dyn ListingSource>,
    pub docs: Arc<dyn DocumentSource>,
    pub notifier: Arc<dyn Notifier>,
}

pub fn spawn_monitor_scheduler(
    cfg: MonitorConfig,
    session: Arc<Mutex<MonitorSession>>,
    deps: ScanDeps,
    armed: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(cfg.scan_interval_secs));
        // A slow scan must not cause a burst of catch-up ticks.
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if !armed.load(Ordering::SeqCst) {
                continue;
            }
            if !market_hours::is_market_open_now() {
                continue;
            }
            // Re-entrancy guard: the previous scan still holds the lock.
            let Ok(mut guard) = session.try_lock() else {
                tracing::debug!(target: "scan", "scan in flight, dropping tick");
                continue;
            };
            counter!("scan_runs_total").increment(1);
            let alerts = guard
                .scan(
                    &*deps.listing,
                    &*deps.docs,
                    &*deps.notifier,
                    cfg.max_items_per_scan,
                    ScanMode::Live,
                    None,
                )
                .await;
            tracing::info!(
                target: "scan",
                alerts = alerts.len(),
                seen = guard.seen_len(),
                "live scan tick"
            );
        }
    })
}
