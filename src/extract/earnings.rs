// src/extract/earnings.rs
//! Earnings extractor: change-amount/change-ratio rows for revenue,
//! operating profit and net profit, plus the turnaround marker.

use once_cell::sync::Lazy;
use regex::Regex;

use super::numeric::change_row;
use crate::filing::Signal;

/// Title markers for earnings / profit-structure-change filings.
pub static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)매출액|손익구조|영업실적").expect("earnings title regex"));

static RE_TURNAROUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"흑자\s*전환").expect("turnaround regex"));

pub fn extract(body: &str) -> Signal {
    Signal::Earnings {
        revenue: change_row(body, "매출액"),
        op_profit: change_row(body, "영업이익"),
        net_profit: change_row(body, "당기순이익"),
        is_turnaround: RE_TURNAROUND.is_match(body),
    }
}
