// src/extract/numeric.rs
//! Small pure parsers for numbers embedded in loosely structured filing
//! text. All of them return `None` on failure, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::filing::ChangeRow;

/// "매출액 대비 (%) 85.0" — the revenue-proportion figure of a supply
/// contract. Tolerates optional parentheses and stray spacing around `%`.
static RE_REVENUE_RATIO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)매출액\s*대비\s*\(?\s*%\s*\)?\s*:?\s*([\d,]+(?:\.\d+)?)")
        .expect("revenue ratio regex")
});

/// "<amount>억 (<pct>%)" — one change-amount/change-ratio cell of an
/// earnings table, e.g. `120.0억원 (86.3%)`.
static RE_CHANGE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(-?[\d,]+(?:\.\d+)?)\s*억\s*원?\s*\(\s*(-?[\d,]+(?:\.\d+)?)\s*%?\s*\)")
        .expect("change token regex")
});

/// Line-item labels of the earnings change table.
pub const ROW_LABELS: [&str; 3] = ["매출액", "영업이익", "당기순이익"];

/// How far past a label (in chars) a row's numbers may sit.
const ROW_WINDOW_CHARS: usize = 200;

/// Parse a number that may carry thousands separators.
pub fn parse_number(s: &str) -> Option<f64> {
    s.replace(',', "").trim().parse::<f64>().ok()
}

/// Extract the supply-contract revenue ratio from a normalized body.
pub fn revenue_ratio(text: &str) -> Option<f64> {
    RE_REVENUE_RATIO
        .captures(text)
        .and_then(|c| parse_number(&c[1]))
}

/// Find the "<amount>억 (<pct>%)" token for one labeled line item. The
/// search window ends at the next line-item label so a row missing its
/// numbers never borrows them from a neighbor.
pub fn change_row(text: &str, label: &str) -> Option<ChangeRow> {
    let start = text.find(label)? + label.len();
    let rest = &text[start..];

    let mut end = rest
        .char_indices()
        .nth(ROW_WINDOW_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    for other in ROW_LABELS {
        if other == label {
            continue;
        }
        if let Some(pos) = rest.find(other) {
            end = end.min(pos);
        }
    }

    let caps = RE_CHANGE_TOKEN.captures(&rest[..end])?;
    let amount = parse_number(&caps[1])?;
    let pct = parse_number(&caps[2])?;
    Some(ChangeRow { amount, pct })
}
