// src/fetch.rs
//! Document fetcher: retrieve a filing body by receipt number, unwrap the
//! zip payload when present, strip markup, and normalize the character set.
//!
//! Failure policy: callers treat a failed fetch as "no additional text
//! available", never as fatal. `fetch_body` therefore returns sentinel
//! strings instead of propagating errors; the sentinels match no extractor
//! pattern.

use std::io::{Cursor, Read};
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;

/// Returned when the fetch or decompression failed.
pub const FETCH_FAILED_SENTINEL: &str = "본문 추출 실패";
/// Returned when the fetch succeeded but normalization left nothing.
pub const EMPTY_BODY_SENTINEL: &str = "본문 내용 없음";

const DART_DOCUMENT_URL: &str = "https://opendart.fss.or.kr/api/document.xml";
/// Local file header magic of a zip archive.
const ZIP_MAGIC: &[u8; 2] = b"PK";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("document request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed document archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("document archive has no entries")]
    EmptyArchive,
    #[error("reading archive entry failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Seam for the raw document bytes, so tests can substitute fixtures.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_raw(&self, rcept_no: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP client for the DART document endpoint.
pub struct DartDocumentClient {
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl DartDocumentClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait]
impl DocumentSource for DartDocumentClient {
    async fn fetch_raw(&self, rcept_no: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self
            .client
            .get(DART_DOCUMENT_URL)
            .query(&[("crtfc_key", self.api_key.as_str()), ("rcept_no", rcept_no)])
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}

/// Fetch and normalize a filing body. Never fails; degrades to sentinels.
pub async fn fetch_body(source: &dyn DocumentSource, rcept_no: &str) -> String {
    let bytes = match source.fetch_raw(rcept_no).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = ?e, rcept_no, "document fetch failed");
            counter!("scan_fetch_errors_total").increment(1);
            return FETCH_FAILED_SENTINEL.to_string();
        }
    };
    match decode_payload(&bytes) {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => EMPTY_BODY_SENTINEL.to_string(),
        Err(e) => {
            tracing::warn!(error = ?e, rcept_no, "document decode failed");
            counter!("scan_fetch_errors_total").increment(1);
            FETCH_FAILED_SENTINEL.to_string()
        }
    }
}

/// `true` when the body is one of the degraded sentinels (no usable text).
pub fn is_sentinel(body: &str) -> bool {
    body == FETCH_FAILED_SENTINEL || body == EMPTY_BODY_SENTINEL
}

/// Sniff the zip magic, unwrap the first entry if archived, then normalize.
pub(crate) fn decode_payload(bytes: &[u8]) -> Result<String, FetchError> {
    let content = if bytes.len() >= 2 && &bytes[..2] == ZIP_MAGIC {
        first_zip_entry(bytes)?
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };
    Ok(normalize_document(&content))
}

fn first_zip_entry(bytes: &[u8]) -> Result<String, FetchError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    if archive.is_empty() {
        return Err(FetchError::EmptyArchive);
    }
    let mut entry = archive.by_index(0)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

static RE_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("style regex"));
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]*>").expect("tag regex"));
// Allow-list: Hangul syllables and jamo, ASCII alnum, whitespace, and the
// punctuation the extractors rely on.
static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^가-힣ㄱ-ㅎㅏ-ㅣa-zA-Z0-9.\s%()\[\]:,\-]").expect("allow-list regex")
});
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Markup strip + entity decode + allow-list filter + whitespace collapse.
pub fn normalize_document(raw: &str) -> String {
    let mut out = RE_STYLE.replace_all(raw, " ").into_owned();
    out = RE_TAGS.replace_all(&out, " ").into_owned();
    out = html_escape::decode_html_entities(&out).into_owned();
    out = RE_DISALLOWED.replace_all(&out, "").into_owned();
    out = RE_WS.replace_all(&out, " ").into_owned();
    out.trim().to_string()
}
