// src/extract/supply.rs
//! Supply-contract extractor: revenue-proportion ratio, optional
//! counter-party capture, and the correction-title fallback.

use once_cell::sync::Lazy;
use regex::Regex;

use super::numeric::revenue_ratio;
use crate::filing::Signal;

/// Title markers for single-buyer sale / supply contract filings.
pub static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)단일판매|공급계약").expect("supply title regex"));

static RE_CORRECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"기재\s*정정").expect("correction regex"));

/// "계약상대방 : <name>" — display only, never gates the verdict.
static RE_COUNTERPARTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"계약\s*상대방\s*:?\s*([가-힣A-Za-z0-9()\s]{2,40})").expect("counterparty regex")
});

pub fn extract(title: &str, body: &str) -> Signal {
    Signal::Supply {
        ratio: revenue_ratio(body),
        counterparty: counterparty(body),
        is_correction: RE_CORRECTION.is_match(title),
    }
}

fn counterparty(body: &str) -> Option<String> {
    let raw = RE_COUNTERPARTY.captures(body)?.get(1)?.as_str();
    let name = clean_party(raw);
    (!name.is_empty()).then_some(name)
}

/// Trim parenthetical and corporate-suffix noise from a captured name.
fn clean_party(raw: &str) -> String {
    let cut = raw.split('(').next().unwrap_or(raw);
    // The table often runs straight into the next cell; keep the first
    // few tokens only.
    cut.split_whitespace()
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
