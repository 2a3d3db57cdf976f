// src/extract/ownership.rs
//! Ownership/investment extractor: transferee or allottee identification
//! and the major-investor check.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::filing::Signal;

/// Title markers: business transfer, controlling-shareholder change,
/// third-party allotment.
pub static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)양수도|최대주주|제3자배정").expect("ownership title regex"));

/// "양수인 : <name>" / "배정대상자 : <name>" labels.
static RE_ACTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:양수인|배정\s*대상자)\s*[:\s-]*([가-힣A-Za-z0-9()\s]{2,40})")
        .expect("actor label regex")
});

/// Large-conglomerate name variants.
static RE_MAJOR_INVESTORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)삼성|현대|기아|LG|SK|한화|네이버|NAVER|카카오|KAKAO|포스코")
        .expect("major investor regex")
});

/// Shown when no actor label was found in the body.
pub const ACTOR_FALLBACK: &str = "본문 참조";

pub fn extract(body: &str) -> Signal {
    let actor = RE_ACTOR
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| clean_actor(m.as_str()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ACTOR_FALLBACK.to_string());
    let is_major_investor = actor != ACTOR_FALLBACK && RE_MAJOR_INVESTORS.is_match(&actor);
    Signal::OwnershipChange {
        actor,
        is_major_investor,
    }
}

/// Strip trailing corporate-suffix and parenthetical noise from a captured
/// name: everything from the first "회사와의" or "(" on is dropped.
fn clean_actor(raw: &str) -> String {
    let cut = raw.split("회사와의").next().unwrap_or(raw);
    let cut = cut.split('(').next().unwrap_or(cut);
    cut.trim().to_string()
}
