// src/extract/mod.rs
//! Signal extractors. Dispatch is a tagged category match under a fixed
//! priority order, mutually exclusive per filing: supply → earnings →
//! clinical/tech → ownership. The first category whose trigger matches
//! wins; its extractor alone runs.

pub mod clinical;
pub mod earnings;
pub mod numeric;
pub mod ownership;
pub mod supply;

use crate::filing::Signal;

/// Extractor category, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Supply,
    Earnings,
    ClinicalOrTech,
    Ownership,
}

/// Pick the single category responsible for a filing, if any. Clinical
/// alone may also trigger from body text (hot keywords), so it is checked
/// against title+body.
pub fn detect_category(title: &str, body: &str) -> Option<Category> {
    if supply::RE_TITLE.is_match(title) {
        return Some(Category::Supply);
    }
    if earnings::RE_TITLE.is_match(title) {
        return Some(Category::Earnings);
    }
    if clinical::RE_TITLE.is_match(title) || clinical::RE_HOT.is_match(&format!("{title} {body}")) {
        return Some(Category::ClinicalOrTech);
    }
    if ownership::RE_TITLE.is_match(title) {
        return Some(Category::Ownership);
    }
    None
}

/// Run the matching extractor over `(title, body)`. `None` means no
/// category triggered (no signal).
pub fn extract(title: &str, body: &str) -> Option<Signal> {
    let signal = match detect_category(title, body)? {
        Category::Supply => supply::extract(title, body),
        Category::Earnings => earnings::extract(body),
        Category::ClinicalOrTech => clinical::extract(title, body),
        Category::Ownership => ownership::extract(body),
    };
    Some(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_supply_first() {
        // Title carries both supply and earnings markers; supply wins.
        let cat = detect_category("매출액 관련 단일판매·공급계약체결", "");
        assert_eq!(cat, Some(Category::Supply));
    }

    #[test]
    fn clinical_triggers_from_body_keywords() {
        let cat = detect_category("주요사항보고서", "FDA 품목 허가 신청 결과 수령");
        assert_eq!(cat, Some(Category::ClinicalOrTech));
    }

    #[test]
    fn ownership_requires_title_marker() {
        let cat = detect_category("제3자배정 유상증자 결정", "배정대상자 : 한화에어로");
        assert_eq!(cat, Some(Category::Ownership));
    }

    #[test]
    fn sentinel_body_matches_nothing() {
        assert_eq!(
            detect_category("주주총회소집결의", crate::fetch::FETCH_FAILED_SENTINEL),
            None
        );
    }

    #[test]
    fn unrelated_filing_yields_no_signal() {
        assert!(extract("주주총회소집결의", "정기 주주총회 소집").is_none());
    }
}
