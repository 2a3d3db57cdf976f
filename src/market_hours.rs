// src/market_hours.rs
//! Market-hours gates. Two distinct windows, both pure functions of
//! weekday and wall-clock time; the process is expected to run with a
//! KST-local clock.
//!
//! - Scan window (08:30–18:00): when the scheduler triggers live scans.
//! - Trading session (09:00–15:30, KRX regular hours): while it is open,
//!   earnings filings are deferred; they alert in the post-close tail of
//!   the scan window. Simulations never consult either.

use chrono::{Datelike, Local, Timelike, Weekday};

/// Scan window, inclusive, as HHMM.
const SCAN_OPEN_HHMM: u32 = 830;
const SCAN_CLOSE_HHMM: u32 = 1800;

/// KRX regular trading session, inclusive, as HHMM.
const SESSION_OPEN_HHMM: u32 = 900;
const SESSION_CLOSE_HHMM: u32 = 1530;

fn in_window(weekday: Weekday, hour: u32, minute: u32, open: u32, close: u32) -> bool {
    if matches!(weekday, Weekday::Sat | Weekday::Sun) {
        return false;
    }
    let hhmm = hour * 100 + minute;
    (open..=close).contains(&hhmm)
}

pub fn is_open(weekday: Weekday, hour: u32, minute: u32) -> bool {
    in_window(weekday, hour, minute, SCAN_OPEN_HHMM, SCAN_CLOSE_HHMM)
}

pub fn in_trading_session(weekday: Weekday, hour: u32, minute: u32) -> bool {
    in_window(weekday, hour, minute, SESSION_OPEN_HHMM, SESSION_CLOSE_HHMM)
}

/// Gate for live scans, evaluated against the local clock.
pub fn is_market_open_now() -> bool {
    let now = Local::now();
    is_open(now.weekday(), now.hour(), now.minute())
}

/// Seam for the trading-session check so the deferral policy is testable
/// without touching the ambient clock.
pub trait MarketCalendar: Send + Sync {
    fn in_trading_session(&self) -> bool;
}

/// Production calendar backed by the local clock.
pub struct LocalCalendar;

impl MarketCalendar for LocalCalendar {
    fn in_trading_session(&self) -> bool {
        let now = Local::now();
        in_trading_session(now.weekday(), now.hour(), now.minute())
    }
}
