// src/scan.rs
//! Scan orchestrator: pages the DART listing, runs the per-filing pipeline
//! (title gate → fetch → extract → decide), owns the dedup set, and emits
//! throttled notifications. The only component with I/O side effects
//! beyond the fetch itself.

use std::collections::HashSet;
use std::time::Duration;

use chrono::Local;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

use crate::classify;
use crate::config::MonitorConfig;
use crate::decision::decide;
use crate::extract;
use crate::fetch::{fetch_body, DocumentSource};
use crate::filing::Signal;
use crate::listing::{DateWindow, ListingSource};
use crate::market_hours::{LocalCalendar, MarketCalendar};
use crate::notify::{Alert, Notifier};

/// Fixed listing page size (API maximum).
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Mutates the dedup set, skips seen filings, honors live policies.
    Live,
    /// Idempotent: no dedup mutation, no market-hours gating.
    Simulation,
}

/// One-time metrics registration (teacher-style, so series have help text).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scan_filings_total", "Listing rows considered by the pipeline.");
        describe_counter!("scan_title_rejected_total", "Rows rejected by the title gate.");
        describe_counter!("scan_dedup_skipped_total", "Rows skipped as already seen.");
        describe_counter!("scan_earnings_deferred_total", "Earnings rows deferred by market-hours policy.");
        describe_counter!("scan_alerts_total", "Alerts emitted to the notification channel.");
        describe_counter!("scan_notify_errors_total", "Notification send failures.");
        describe_counter!("scan_listing_errors_total", "Listing page fetch failures.");
        describe_counter!("scan_fetch_errors_total", "Document fetch/decode failures.");
        describe_gauge!("scan_last_run_ts", "Unix ts when a scan last completed.");
    });
}

/// Process-lifetime monitoring state: the dedup set and the policy knobs.
/// Exclusively owns the set; cleared only on process restart.
pub struct MonitorSession {
    cfg: MonitorConfig,
    seen: HashSet<String>,
    calendar: Box<dyn MarketCalendar>,
}

impl MonitorSession {
    pub fn new(cfg: MonitorConfig) -> Self {
        Self {
            cfg,
            seen: HashSet::new(),
            calendar: Box::new(LocalCalendar),
        }
    }

    /// Substitute the trading-session calendar (tests use a fixed one).
    pub fn with_calendar(mut self, calendar: Box<dyn MarketCalendar>) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    pub fn has_seen(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Run one scan over up to `max_items` recent filings. Returns the
    /// alerts that passed (and were handed to the notifier).
    pub async fn scan(
        &mut self,
        listing: &dyn ListingSource,
        docs: &dyn DocumentSource,
        notifier: &dyn Notifier,
        max_items: u32,
        mode: ScanMode,
        window: Option<&DateWindow>,
    ) -> Vec<Alert> {
        ensure_metrics_described();

        let mut filings = self.collect_pages(listing, max_items, window).await;
        if mode == ScanMode::Live {
            // Listing is newest-first; process oldest filings first.
            filings.reverse();
        }

        let mut alerts = Vec::new();
        for filing in filings {
            counter!("scan_filings_total").increment(1);
            let key = filing.key();

            if mode == ScanMode::Live && self.seen.contains(&key) {
                counter!("scan_dedup_skipped_total").increment(1);
                continue;
            }

            // Cheap pre-filter; must run before any document fetch.
            if !classify::classify(&filing.report_nm) {
                counter!("scan_title_rejected_total").increment(1);
                tracing::debug!(corp = %filing.corp_name, title = %filing.report_nm, "title gate reject");
                continue;
            }

            let body = fetch_body(docs, &filing.rcept_no).await;
            let signal = extract::extract(&filing.report_nm, &body);

            // Live policy: earnings filings are deferred while the trading
            // session (09:00–15:30) is open; the scan window runs until
            // 18:00, so the post-close ticks pick them up the same day.
            if mode == ScanMode::Live
                && self.cfg.skip_earnings_while_open
                && matches!(signal, Some(Signal::Earnings { .. }))
                && self.calendar.in_trading_session()
            {
                counter!("scan_earnings_deferred_total").increment(1);
                continue;
            }

            let verdict = decide(true, signal.as_ref(), &self.cfg.thresholds);
            if !verdict.pass {
                continue;
            }

            // At-most-once: mark seen before the send so a failing message
            // is never retried on later scans.
            if mode == ScanMode::Live {
                self.seen.insert(key);
            }

            let alert = Alert::new(&filing, &verdict, Local::now());
            tracing::info!(corp = %alert.corp_name, tag = %alert.tag, "alert");
            if let Err(e) = notifier.send(&alert).await {
                counter!("scan_notify_errors_total").increment(1);
                tracing::warn!(error = ?e, corp = %alert.corp_name, "notification send failed");
            } else {
                counter!("scan_alerts_total").increment(1);
            }
            alerts.push(alert);

            // Deliberate throttle between outbound notifications.
            tokio::time::sleep(Duration::from_millis(self.cfg.notify_delay_ms)).await;
        }

        gauge!("scan_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);
        alerts
    }

    /// Page through the listing. A non-success status or an empty page ends
    /// pagination; a transport error aborts it but keeps earlier pages.
    async fn collect_pages(
        &self,
        listing: &dyn ListingSource,
        max_items: u32,
        window: Option<&DateWindow>,
    ) -> Vec<crate::filing::Filing> {
        let total_pages = max_items.div_ceil(PAGE_SIZE).max(1);
        let mut all = Vec::new();

        for page_no in 1..=total_pages {
            match listing.fetch_page(page_no, PAGE_SIZE, window).await {
                Ok(page) => {
                    if !page.is_success() || page.list.is_empty() {
                        break;
                    }
                    all.extend(page.list);
                }
                Err(e) => {
                    counter!("scan_listing_errors_total").increment(1);
                    tracing::warn!(error = ?e, page_no, "listing page failed, aborting pagination");
                    break;
                }
            }
            // Deliberate throttle between listing-page requests.
            tokio::time::sleep(Duration::from_millis(self.cfg.page_delay_ms)).await;
        }
        all
    }
}
