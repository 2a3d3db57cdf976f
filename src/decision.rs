// src/decision.rs
//! Decision engine: pure, testable mapping from (classifier result,
//! extracted signal) to a terminal `Verdict`. Acceptance is
//! category-local; there is no numeric scoring across categories.

use serde::{Deserialize, Serialize};

use crate::filing::Signal;

/// Terminal decision for one filing, consumed by the notification boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub pass: bool,
    /// Stable category/severity tag for display grouping.
    pub tag: String,
    /// Human-readable annotation (HTML, Telegram-flavored).
    pub annotation: String,
}

impl Verdict {
    pub fn reject() -> Self {
        Self {
            pass: false,
            tag: String::new(),
            annotation: String::new(),
        }
    }

    fn accept(tag: &str, annotation: String) -> Self {
        Self {
            pass: true,
            tag: tag.to_string(),
            annotation,
        }
    }
}

/// Numeric acceptance policy, configurable via `config/monitor.toml`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DecisionThresholds {
    /// Supply-contract revenue ratio floor (percent).
    pub supply_min_ratio: f64,
    /// Ratio from which a supply contract counts as large-scale.
    pub supply_large_ratio: f64,
    /// Ratios at or above this are parsing noise, not percentages.
    pub supply_noise_ratio: f64,
    /// Operating-profit change ratio floor (percent).
    pub earnings_min_op_pct: f64,
    /// Operating-profit change amount floor (억원).
    pub earnings_min_op_amount: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            supply_min_ratio: 30.0,
            supply_large_ratio: 70.0,
            supply_noise_ratio: 1000.0,
            earnings_min_op_pct: 70.0,
            earnings_min_op_amount: 100.0,
        }
    }
}

/// Combine the title-gate result and the extracted signal into a verdict.
/// The orchestrator already short-circuits on a gate reject before any
/// fetch; the flag is still honored here so the function stands alone.
pub fn decide(gate_passed: bool, signal: Option<&Signal>, th: &DecisionThresholds) -> Verdict {
    if !gate_passed {
        return Verdict::reject();
    }
    let Some(signal) = signal else {
        return Verdict::reject();
    };
    match signal {
        Signal::Supply {
            ratio,
            counterparty,
            is_correction,
        } => decide_supply(*ratio, counterparty.as_deref(), *is_correction, th),
        Signal::Earnings {
            op_profit,
            net_profit,
            is_turnaround,
            ..
        } => {
            if *is_turnaround {
                return Verdict::accept(
                    "earnings-turnaround",
                    "💰 <b>[실적] ★흑자전환 성공★</b>".into(),
                );
            }
            let (Some(op), Some(net)) = (op_profit, net_profit) else {
                // Missing rows are a reject, not an error.
                return Verdict::reject();
            };
            if op.pct >= th.earnings_min_op_pct
                && op.amount >= th.earnings_min_op_amount
                && net.pct >= 0.0
            {
                Verdict::accept(
                    "earnings-beat",
                    format!(
                        "💰 <b>[실적 어닝서프] 영업이익 {}% 증가 ({}억)</b>",
                        op.pct, op.amount
                    ),
                )
            } else {
                Verdict::reject()
            }
        }
        Signal::ClinicalOrTech { is_success, excerpt } => {
            let mut annotation = if *is_success {
                "🔥 <b>[핵심 결과 발표] 데이터 유의성 확보</b>".to_string()
            } else {
                "🧬 <b>[바이오/기술] 공시 감지</b>".to_string()
            };
            if !excerpt.is_empty() {
                annotation.push_str(&format!("\n📋 {excerpt}"));
            }
            let tag = if *is_success {
                "clinical-success"
            } else {
                "clinical-detected"
            };
            Verdict::accept(tag, annotation)
        }
        Signal::OwnershipChange {
            actor,
            is_major_investor,
        } => {
            if *is_major_investor {
                Verdict::accept("major-investor", format!("💎 <b>[특급 투자자: {actor}]</b>"))
            } else {
                Verdict::accept("investment", format!("🤝 <b>[투자 유치: {actor}]</b>"))
            }
        }
    }
}

fn decide_supply(
    ratio: Option<f64>,
    counterparty: Option<&str>,
    is_correction: bool,
    th: &DecisionThresholds,
) -> Verdict {
    let party_suffix = counterparty
        .map(|p| format!(" (계약상대방: {p})"))
        .unwrap_or_default();
    match ratio {
        Some(r) if r >= th.supply_large_ratio && r < th.supply_noise_ratio => Verdict::accept(
            "large-scale",
            format!("🔴🔴 <b>[대형수주] 매출액 대비 {r}%</b>{party_suffix}"),
        ),
        Some(r) if r >= th.supply_min_ratio && r < th.supply_large_ratio => Verdict::accept(
            "supply",
            format!("🔴 <b>[수주] 매출액 대비 {r}%</b>{party_suffix}"),
        ),
        // Found a ratio but out of range: noise or immaterial, reject.
        Some(_) => Verdict::reject(),
        None if is_correction => Verdict::accept(
            "supply-correction",
            format!("🔄 <b>수주 내용 정정 공시</b>{party_suffix}"),
        ),
        None => Verdict::reject(),
    }
}
