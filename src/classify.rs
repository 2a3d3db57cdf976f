// src/classify.rs
//! Title gate: a cheap accept/reject pre-filter over the filing headline.
//! Runs before any document fetch. Both keyword sets are compiled once;
//! exclusion always wins over inclusion.

use once_cell::sync::Lazy;
use regex::Regex;

/// Titles worth a closer look: contracts, capital events, patents, clinical
/// and regulatory milestones, robotics/AI, earnings markers.
/// Multi-token keywords tolerate embedded whitespace (`기타 시장 안내`).
static INTERESTING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)단일판매|공급계약|무상증자|특허권|자기주식|제3자배정|양수도|투자판단|주요경영사항|기타\s*시장\s*안내|임상|FDA|승인|허가|기술이전|샌드박스|로봇|AI|탈모|신약|매출액|손익구조|영업실적",
    )
    .expect("interesting title regex")
});

/// Titles that read positive but rarely are: disposals, trust agreements,
/// plans/expectations, corrections, subsidiary-only news.
static DISCOURAGING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)주식처분|신탁계약|계획|예정|정정|자회사|검토|가능성|기대|준비중|추진")
        .expect("discouraging title regex")
});

pub fn is_interesting(title: &str) -> bool {
    INTERESTING.is_match(title)
}

pub fn is_discouraged(title: &str) -> bool {
    DISCOURAGING.is_match(title)
}

/// `true` when the title matches the interesting set and none of the
/// discouraging set.
pub fn classify(title: &str) -> bool {
    is_interesting(title) && !is_discouraged(title)
}
