//! Scoring configuration for the reliability scorer.

/// Penalty weights and thresholds used when scoring a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliabilityConfig {
    /// Penalty per transfer (legs - 1).
    pub transfer_penalty: f64,

    /// Margins below this many minutes are tight.
    pub tight_margin_mins: i64,
    pub tight_penalty: f64,

    /// Margins up to and including this many minutes are short.
    pub short_margin_mins: i64,
    pub short_penalty: f64,

    /// Margins below this many minutes still carry a small silent penalty.
    pub comfortable_margin_mins: i64,
    pub snug_penalty: f64,

    /// Flat penalty when any transfer happens at a big interchange.
    pub big_station_penalty: f64,

    /// Penalty for departures in the weekday rush hours.
    pub peak_penalty: f64,

    /// Legs delayed by more than this many minutes trigger the live-delay penalty.
    pub live_delay_threshold_mins: u32,
    pub live_delay_penalty: f64,

    /// Scores at or above this are low risk.
    pub low_risk_min_score: f64,

    /// Scores at or above this (and below `low_risk_min_score`) are medium risk.
    pub medium_risk_min_score: f64,

    /// Maximum number of reasons reported.
    pub max_reasons: usize,
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            transfer_penalty: 0.12,
            tight_margin_mins: 4,
            tight_penalty: 0.35,
            short_margin_mins: 6,
            short_penalty: 0.20,
            comfortable_margin_mins: 8,
            snug_penalty: 0.10,
            big_station_penalty: 0.08,
            peak_penalty: 0.08,
            live_delay_threshold_mins: 3,
            live_delay_penalty: 0.05,
            low_risk_min_score: 0.75,
            medium_risk_min_score: 0.55,
            max_reasons: 3,
        }
    }
}
