// src/notify/mod.rs
//! Notification boundary: alert payload, message formatting (HTML with a
//! readable plain-text fallback), and the `Notifier` seam.

pub mod telegram;

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::decision::Verdict;
use crate::filing::Filing;

const DART_VIEWER_URL: &str = "https://dart.fss.or.kr/dsaf001/main.do?rcpNo=";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("telegram api rejected the message: {0}")]
    Api(String),
}

/// One message per accepted filing.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub corp_name: String,
    pub report_nm: String,
    pub tag: String,
    pub annotation: String,
    pub link: String,
    pub ts: DateTime<Local>,
}

impl Alert {
    pub fn new(filing: &Filing, verdict: &Verdict, ts: DateTime<Local>) -> Self {
        Self {
            corp_name: filing.corp_name.clone(),
            report_nm: filing.report_nm.clone(),
            tag: verdict.tag.clone(),
            annotation: verdict.annotation.clone(),
            link: dart_link(&filing.rcept_no),
            ts,
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError>;
}

/// Original-document viewer link for a receipt number.
pub fn dart_link(rcept_no: &str) -> String {
    format!("{DART_VIEWER_URL}{rcept_no}")
}

/// Korean display label for the alert's category tag.
pub fn category_label(tag: &str) -> &'static str {
    match tag {
        "supply" | "large-scale" | "supply-correction" => "💵 공급계약",
        "earnings-beat" | "earnings-turnaround" => "💰 실적발표",
        "clinical-success" | "clinical-detected" => "🧬 바이오/기술 호재",
        "major-investor" | "investment" => "🤝 투자/M&A",
        _ => "🔔 주요공시",
    }
}

/// Telegram-flavored HTML message body.
pub fn format_html(alert: &Alert) -> String {
    format!(
        "🚨 <b>[DART 호재 감지]</b>\n\n🏢 <b>기업명:</b> {}\n📄 <b>공시제목:</b> {}\n🏷️ <b>분류:</b> {}\n{}\n\n🔗 <a href=\"{}\">원문 보기</a>\n🕒 {}",
        alert.corp_name,
        alert.report_nm,
        category_label(&alert.tag),
        alert.annotation,
        alert.link,
        alert.ts.format("%Y-%m-%d %H:%M:%S"),
    )
}

static RE_HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+>").expect("html tag regex"));

/// Plain-text rendering for channels (or logs) without rich formatting.
pub fn format_plain(alert: &Alert) -> String {
    let html = format_html(alert);
    RE_HTML_TAG.replace_all(&html, "").into_owned()
}
