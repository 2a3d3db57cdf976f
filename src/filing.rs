// src/filing.rs
//! Data model shared across the pipeline: listing rows, filing identity,
//! and the tagged extraction variants.

use serde::{Deserialize, Serialize};

/// One row from the DART `list.json` endpoint. Field names match the wire
/// format so serde needs no renames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Filing {
    /// Report title, e.g. "단일판매·공급계약체결".
    pub report_nm: String,
    /// Corporation display name.
    pub corp_name: String,
    /// Receipt number — unique per filing, used for retrieval and dedup.
    pub rcept_no: String,
}

impl Filing {
    pub fn new(
        report_nm: impl Into<String>,
        corp_name: impl Into<String>,
        rcept_no: impl Into<String>,
    ) -> Self {
        Self {
            report_nm: report_nm.into(),
            corp_name: corp_name.into(),
            rcept_no: rcept_no.into(),
        }
    }

    /// Dedup identity. Two rows with the same receipt number are the same
    /// filing even if the title drifted between listings.
    pub fn key(&self) -> String {
        format!("{}_{}", self.corp_name, self.rcept_no)
    }
}

/// One "change amount (change ratio%)" line item from an earnings table,
/// e.g. `120.0억 (86.3%)` → amount 120.0, pct 86.3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeRow {
    pub amount: f64,
    pub pct: f64,
}

/// Structured finding from one extractor. At most one category matches per
/// filing (priority order lives in `extract::extract`); threshold policy is
/// applied later by the decision engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Supply {
        /// Contract value as a percentage of revenue, when the body had one.
        ratio: Option<f64>,
        /// Counter-party captured from the 계약상대방 label, display only.
        counterparty: Option<String>,
        /// Title carried a 기재정정 (correction) marker.
        is_correction: bool,
    },
    Earnings {
        revenue: Option<ChangeRow>,
        op_profit: Option<ChangeRow>,
        net_profit: Option<ChangeRow>,
        /// Body contained the 흑자전환 turnaround marker.
        is_turnaround: bool,
    },
    ClinicalOrTech {
        /// Success-language marker found in title+body.
        is_success: bool,
        /// Short outcome excerpt from the body; empty when no body text.
        excerpt: String,
    },
    OwnershipChange {
        /// Transferee / allottee name, or "본문 참조" when not captured.
        actor: String,
        is_major_investor: bool,
    },
}
