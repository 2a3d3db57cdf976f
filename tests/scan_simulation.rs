// tests/scan_simulation.rs
// Simulation-mode properties: idempotence (no state mutation between
// runs) and the title gate running strictly before any document fetch.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use dart_disclosure_monitor::config::MonitorConfig;
use dart_disclosure_monitor::fetch::{DocumentSource, FetchError};
use dart_disclosure_monitor::filing::Filing;
use dart_disclosure_monitor::listing::{DateWindow, ListingError, ListingPage, ListingSource};
use dart_disclosure_monitor::notify::{Alert, Notifier, NotifyError};
use dart_disclosure_monitor::scan::{MonitorSession, ScanMode};

struct FixedListing(Vec<Filing>);

#[async_trait]
impl ListingSource for FixedListing {
    async fn fetch_page(
        &self,
        page_no: u32,
        _page_count: u32,
        _window: Option<&DateWindow>,
    ) -> Result<ListingPage, ListingError> {
        Ok(ListingPage {
            status: "000".to_string(),
            list: if page_no == 1 { self.0.clone() } else { vec![] },
        })
    }
}

struct StaticDocs(HashMap<String, Vec<u8>>);

#[async_trait]
impl DocumentSource for StaticDocs {
    async fn fetch_raw(&self, rcept_no: &str) -> Result<Vec<u8>, FetchError> {
        self.0
            .get(rcept_no)
            .cloned()
            .ok_or(FetchError::EmptyArchive)
    }
}

/// Panics if the pipeline fetches at all.
struct NoFetchAllowed;

#[async_trait]
impl DocumentSource for NoFetchAllowed {
    async fn fetch_raw(&self, rcept_no: &str) -> Result<Vec<u8>, FetchError> {
        panic!("document {rcept_no} fetched for a title-rejected filing");
    }
}

#[derive(Default)]
struct Collecting {
    sent: Mutex<Vec<Alert>>,
}

#[async_trait]
impl Notifier for Collecting {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

fn fast_cfg() -> MonitorConfig {
    MonitorConfig {
        page_delay_ms: 0,
        notify_delay_ms: 0,
        ..MonitorConfig::default()
    }
}

#[tokio::test]
async fn simulation_is_idempotent_and_stateless() {
    let listing = FixedListing(vec![
        Filing::new("단일판매·공급계약체결", "X", "1"),
        Filing::new("주주총회소집결의", "Y", "2"),
        Filing::new("투자판단 관련 주요경영사항", "Z", "3"),
    ]);
    let docs = StaticDocs(HashMap::from([
        ("1".to_string(), "매출액 대비 (%) 52.0".as_bytes().to_vec()),
        ("2".to_string(), b"whatever".to_vec()),
        (
            "3".to_string(),
            "임상 시험 결과 보고서 수령".as_bytes().to_vec(),
        ),
    ]));
    let notifier = Collecting::default();
    let mut session = MonitorSession::new(fast_cfg());

    // Timestamps differ between runs; compare the decision payload.
    let payload = |alerts: Vec<dart_disclosure_monitor::notify::Alert>| {
        alerts
            .into_iter()
            .map(|a| (a.corp_name, a.tag, a.annotation))
            .collect::<Vec<_>>()
    };

    let first = payload(
        session
            .scan(&listing, &docs, &notifier, 1000, ScanMode::Simulation, None)
            .await,
    );
    let second = payload(
        session
            .scan(&listing, &docs, &notifier, 1000, ScanMode::Simulation, None)
            .await,
    );

    assert_eq!(first, second);
    assert_eq!(first.len(), 2); // supply + clinical; Y is gate-rejected
    assert_eq!(session.seen_len(), 0, "simulation must not mutate dedup");
    // Both runs notified: nothing was suppressed by state.
    assert_eq!(notifier.sent.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn title_gate_runs_before_any_fetch() {
    // Both titles are gate-rejected: one uninteresting, one discouraged.
    let listing = FixedListing(vec![
        Filing::new("주주총회소집결의", "A", "10"),
        Filing::new("기재정정 단일판매·공급계약체결", "B", "11"),
    ]);
    let notifier = Collecting::default();
    let mut session = MonitorSession::new(fast_cfg());

    let alerts = session
        .scan(
            &listing,
            &NoFetchAllowed,
            &notifier,
            10,
            ScanMode::Simulation,
            None,
        )
        .await;
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn fetch_failure_degrades_to_reject_for_body_dependent_categories() {
    // Supply title passes the gate, but the document cannot be fetched:
    // the sentinel body has no ratio, so the verdict is a plain reject.
    let listing = FixedListing(vec![Filing::new("단일판매·공급계약체결", "X", "404")]);
    let docs = StaticDocs(HashMap::new());
    let notifier = Collecting::default();
    let mut session = MonitorSession::new(fast_cfg());

    let alerts = session
        .scan(&listing, &docs, &notifier, 10, ScanMode::Simulation, None)
        .await;
    assert!(alerts.is_empty());
}
