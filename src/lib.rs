// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod bot;
pub mod classify;
pub mod config;
pub mod decision;
pub mod extract;
pub mod fetch;
pub mod filing;
pub mod listing;
pub mod market_hours;
pub mod scan;
pub mod scheduler;

// Notifications (Telegram channel + formatting)
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::decision::{decide, DecisionThresholds, Verdict};
pub use crate::filing::{Filing, Signal};
pub use crate::notify::{Alert, Notifier};
pub use crate::scan::{MonitorSession, ScanMode};
