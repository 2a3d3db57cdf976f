// tests/scan_e2e.rs
// End-to-end pipeline over fixture sources: listing page → title gate →
// zip document fetch → extraction → verdict → formatted alert.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::Mutex;

use async_trait::async_trait;

use dart_disclosure_monitor::config::MonitorConfig;
use dart_disclosure_monitor::fetch::{DocumentSource, FetchError};
use dart_disclosure_monitor::filing::Filing;
use dart_disclosure_monitor::listing::{DateWindow, ListingError, ListingPage, ListingSource};
use dart_disclosure_monitor::notify::{format_html, Alert, Notifier, NotifyError};
use dart_disclosure_monitor::scan::{MonitorSession, ScanMode};

struct PagedListing(Vec<Vec<Filing>>);

#[async_trait]
impl ListingSource for PagedListing {
    async fn fetch_page(
        &self,
        page_no: u32,
        _page_count: u32,
        _window: Option<&DateWindow>,
    ) -> Result<ListingPage, ListingError> {
        Ok(ListingPage {
            status: "000".to_string(),
            list: self
                .0
                .get(page_no as usize - 1)
                .cloned()
                .unwrap_or_default(),
        })
    }
}

/// First page succeeds, every later page times out.
struct FlakyListing(Vec<Filing>);

#[async_trait]
impl ListingSource for FlakyListing {
    async fn fetch_page(
        &self,
        page_no: u32,
        _page_count: u32,
        _window: Option<&DateWindow>,
    ) -> Result<ListingPage, ListingError> {
        if page_no == 1 {
            Ok(ListingPage {
                status: "000".to_string(),
                list: self.0.clone(),
            })
        } else {
            Err(ListingError::Timeout)
        }
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

fn zip_document(html: &str) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut w = zip::ZipWriter::new(&mut cursor);
        w.start_file("document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        w.write_all(html.as_bytes()).unwrap();
        w.finish().unwrap();
    }
    cursor.into_inner()
}

#[tokio::test]
async fn supply_filing_passes_as_large_scale() {
    let listing = PagedListing(vec![vec![Filing::new("단일판매·공급계약체결", "X", "123")]]);
    let docs = StaticDocs(HashMap::from([(
        "123".to_string(),
        zip_document(
            "<style>td{}</style><table><tr><td>매출액 대비 (%)</td><td>85.0</td></tr><tr><td>계약상대방 : 현대자동차(주)</td></tr></table>",
        ),
    )]));
    let notifier = Collecting::default();
    let mut session = MonitorSession::new(fast_cfg());

    let alerts = session
        .scan(&listing, &docs, &notifier, 10, ScanMode::Live, None)
        .await;

    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0];
    assert_eq!(alert.tag, "large-scale");
    assert!(alert.annotation.contains("85"));
    assert!(alert.annotation.contains("현대자동차"));

    let msg = format_html(alert);
    assert!(msg.contains("기업명:</b> X"));
    assert!(msg.contains("dart.fss.or.kr/dsaf001/main.do?rcpNo=123"));
}

#[tokio::test]
async fn pagination_stops_on_empty_page() {
    // 250 requested items → 3 pages, but page 2 is already empty.
    let page1: Vec<Filing> = (0..3)
        .map(|i| Filing::new("단일판매·공급계약체결", format!("C{i}"), format!("{i}")))
        .collect();
    let listing = PagedListing(vec![page1, vec![]]);
    let docs = StaticDocs(
        (0..3)
            .map(|i| {
                (
                    i.to_string(),
                    format!("매출액 대비 (%) {}", 40 + i).into_bytes(),
                )
            })
            .collect(),
    );
    let notifier = Collecting::default();
    let mut session = MonitorSession::new(fast_cfg());

    let alerts = session
        .scan(&listing, &docs, &notifier, 250, ScanMode::Live, None)
        .await;
    assert_eq!(alerts.len(), 3);
    assert_eq!(notifier.sent.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn listing_error_keeps_pages_already_collected() {
    let listing = FlakyListing(vec![Filing::new("단일판매·공급계약체결", "X", "1")]);
    let docs = StaticDocs(HashMap::from([(
        "1".to_string(),
        "매출액 대비 (%) 33.0".as_bytes().to_vec(),
    )]));
    let notifier = Collecting::default();
    let mut session = MonitorSession::new(fast_cfg());

    let alerts = session
        .scan(&listing, &docs, &notifier, 250, ScanMode::Live, None)
        .await;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].tag, "supply");
}
