//! Shared risk vocabulary: levels, reasons and reason accumulation.

use serde::Serialize;

/// Coarse risk classification.
///
/// Note the inversion relative to scores: a high reliability score is a
/// `Low` risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// One contribution to a penalty total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reason {
    /// Stable machine-readable identifier.
    pub code: &'static str,
    /// Human-readable explanation.
    pub label: String,
    pub penalty: f64,
}

impl Reason {
    pub fn new(code: &'static str, label: impl Into<String>, penalty: f64) -> Self {
        Self {
            code,
            label: label.into(),
            penalty,
        }
    }
}

/// Accumulates penalty reasons in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ReasonList {
    reasons: Vec<Reason>,
}

impl ReasonList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reason unconditionally.
    pub fn push(&mut self, reason: Reason) {
        self.reasons.push(reason);
    }

    /// Add a reason unless one with the same code is already present.
    ///
    /// Returns `true` if the reason was added.
    pub fn push_once(&mut self, reason: Reason) -> bool {
        if self.contains(reason.code) {
            return false;
        }
        self.reasons.push(reason);
        true
    }

    pub fn contains(&self, code: &str) -> bool {
        self.reasons.iter().any(|r| r.code == code)
    }

    /// Sum of all penalties.
    pub fn total(&self) -> f64 {
        self.reasons.iter().map(|r| r.penalty).sum()
    }

    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Reasons with the largest penalties first, truncated to `max`.
    ///
    /// Equal penalties keep their insertion order.
    pub fn into_ranked(mut self, max: usize) -> Vec<Reason> {
        self.reasons.sort_by(|a, b| b.penalty.total_cmp(&a.penalty));
        self.reasons.truncate(max);
        self.reasons
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
