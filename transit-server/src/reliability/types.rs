//! Reliability output types.

use serde::Serialize;

use crate::domain::{Reason, RiskLevel};

/// Why a connection lost reliability.
pub type ReliabilityReason = Reason;

/// Risk assessment of one change between legs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRisk {
    /// Station where the previous leg arrives.
    pub from_station: String,

    /// Station where the next leg departs.
    pub to_station: String,

    /// Minutes available to change. Negative when the change is infeasible;
    /// absent when a time could not be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_minutes: Option<i64>,

    pub risk_level: RiskLevel,
    pub is_big_station: bool,
}

/// Reliability assessment of a whole connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilityInsight {
    /// In `[0, 1]`; higher is more reliable.
    pub score: f64,
    pub level: RiskLevel,
    /// Largest penalties first.
    pub reasons: Vec<ReliabilityReason>,
    /// One entry per change, in leg order.
    pub transfer_risks: Vec<TransferRisk>,
}
