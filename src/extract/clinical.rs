// src/extract/clinical.rs
//! Clinical/technology extractor: regulatory and trial-outcome language,
//! success classification, and a short body excerpt for the alert.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fetch::is_sentinel;
use crate::filing::Signal;

/// Hot keywords that flag a clinical / technology disclosure in the title
/// or body. Multi-token keywords tolerate embedded whitespace.
pub static RE_HOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)FDA|EMA|PMDA|CSR|보고서\s*수령|임상\s*시험\s*결과|통계적\s*유의성|탑라인|Top-?line|품목\s*허가|최종\s*승인|기술\s*이전|기술\s*수출|라이선스\s*아웃|신약\s*허가|NDA|BLA|협동\s*로봇|자율\s*주행|AMR|AGV|온디바이스\s*AI|LLM|결과|임상|수출|이전|승인|L\s*O",
    )
    .expect("clinical hot regex")
});

/// Direct title markers tried before the combined title+body scan.
pub static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)임상|CSR").expect("clinical title regex"));

/// Success-language markers promoting the finding to high confidence.
static RE_SUCCESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)통계적\s*유의성|확보|달성|성공|탑라인").expect("success regex")
});

/// "결과값 <cell text>" — the labeled result row of an outcome table.
static RE_RESULT_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"결과\s*값\s*:?\s*(.{1,200})").expect("result value regex"));

/// Vocabulary that marks a sentence as outcome-relevant.
static RE_OUTCOME_VOCAB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"중대한\s*이상\s*반응|이상\s*반응\s*없|유의|성공|뒷받침").expect("outcome regex")
});

const FALLBACK_EXCERPT_CHARS: usize = 240;

pub fn extract(title: &str, body: &str) -> Signal {
    let combined = format!("{title} {body}");
    Signal::ClinicalOrTech {
        is_success: RE_SUCCESS.is_match(&combined),
        excerpt: excerpt(body),
    }
}

/// Preferentially the 결과값-labeled cell, else the head of the body; then
/// narrowed to outcome-relevant sentences when any exist.
fn excerpt(body: &str) -> String {
    if body.is_empty() || is_sentinel(body) {
        return String::new();
    }
    let candidate = match RE_RESULT_VALUE.captures(body) {
        Some(c) => c[1].trim().to_string(),
        None => body.chars().take(FALLBACK_EXCERPT_CHARS).collect(),
    };

    let relevant: Vec<&str> = candidate
        .split('.')
        .map(str::trim)
        .filter(|seg| !seg.is_empty() && RE_OUTCOME_VOCAB.is_match(seg))
        .collect();
    if relevant.is_empty() {
        candidate
    } else {
        relevant.join(". ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_marker_promotes_confidence() {
        match extract("투자판단 관련 주요경영사항", "1차 평가변수에서 통계적 유의성 확보") {
            Signal::ClinicalOrTech { is_success, .. } => assert!(is_success),
            other => panic!("unexpected signal: {other:?}"),
        }
    }

    #[test]
    fn report_receipt_without_success_marker() {
        match extract("투자판단 관련 주요경영사항", "임상 시험 결과 보고서 수령") {
            Signal::ClinicalOrTech {
                is_success,
                excerpt,
            } => {
                assert!(!is_success);
                assert_eq!(excerpt, "임상 시험 결과 보고서 수령");
            }
            other => panic!("unexpected signal: {other:?}"),
        }
    }

    #[test]
    fn result_value_row_preferred_for_excerpt() {
        let body = "시험 개요 및 배경 설명. 결과값 : 위약군 대비 유의한 개선. 기타 사항";
        match extract("임상", body) {
            Signal::ClinicalOrTech { excerpt, .. } => {
                assert!(excerpt.contains("위약군 대비 유의한 개선"));
                assert!(!excerpt.contains("시험 개요"));
            }
            other => panic!("unexpected signal: {other:?}"),
        }
    }

    #[test]
    fn outcome_vocabulary_filters_fallback_excerpt() {
        let body = "서론 문단입니다. 중대한 이상반응은 관찰되지 않았습니다. 행정 절차 안내.";
        match extract("임상", body) {
            Signal::ClinicalOrTech { excerpt, .. } => {
                assert_eq!(excerpt, "중대한 이상반응은 관찰되지 않았습니다");
            }
            other => panic!("unexpected signal: {other:?}"),
        }
    }

    #[test]
    fn sentinel_body_yields_empty_excerpt() {
        match extract("임상", crate::fetch::FETCH_FAILED_SENTINEL) {
            Signal::ClinicalOrTech {
                is_success,
                excerpt,
            } => {
                assert!(excerpt.is_empty());
                assert!(!is_success);
            }
            other => panic!("unexpected signal: {other:?}"),
        }
    }
}
