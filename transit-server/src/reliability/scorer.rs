//! Connection reliability scoring.
//!
//! Scoring is a sum of independent penalties subtracted from 1. The sum is
//! only clamped to `[0, 1]` at the very end, so early penalties may push
//! the running total past 1 before later terms are added.

use chrono::{DateTime, Datelike, Timelike};
use chrono_tz::Tz;

use crate::domain::time::{minutes_between, parse_timestamp, to_swiss_local};
use crate::domain::{Leg, Reason, ReasonList, RiskLevel, is_big_station, round2};
use crate::weather::WeatherInsight;

use super::config::ReliabilityConfig;
use super::types::{ReliabilityInsight, TransferRisk};

/// Weekday rush hours, as minutes after local midnight (start inclusive,
/// end exclusive).
const PEAK_WINDOWS: [(u32, u32); 2] = [(7 * 60, 9 * 60), (16 * 60 + 30, 18 * 60 + 30)];

/// Whether a local departure falls in the weekday rush hours.
pub fn is_peak_time(local: &DateTime<Tz>) -> bool {
    if local.weekday().number_from_monday() > 5 {
        return false;
    }
    let minutes = local.hour() * 60 + local.minute();
    PEAK_WINDOWS
        .iter()
        .any(|&(start, end)| (start..end).contains(&minutes))
}

/// Scores connections for on-time arrival likelihood.
#[derive(Debug, Clone, Default)]
pub struct ReliabilityScorer {
    config: ReliabilityConfig,
}

impl ReliabilityScorer {
    pub fn new(config: ReliabilityConfig) -> Self {
        Self { config }
    }

    /// Score `legs` departing at `departure_time`.
    pub fn score(&self, legs: &[Leg], departure_time: &str) -> ReliabilityInsight {
        self.score_with_weather(legs, departure_time, None)
    }

    /// Score `legs`, folding in a weather assessment when one is supplied.
    pub fn score_with_weather(
        &self,
        legs: &[Leg],
        departure_time: &str,
        weather: Option<&WeatherInsight>,
    ) -> ReliabilityInsight {
        let config = &self.config;
        let mut reasons = ReasonList::new();
        let mut silent_penalty = 0.0;

        let transfers = legs.len().saturating_sub(1);
        if transfers > 0 {
            let plural = if transfers == 1 { "" } else { "s" };
            reasons.push(Reason::new(
                "transfers",
                format!("{transfers} transfer{plural}"),
                config.transfer_penalty * transfers as f64,
            ));
        }

        let mut transfer_risks = Vec::with_capacity(transfers);
        for pair in legs.windows(2) {
            let (arriving, departing) = (&pair[0], &pair[1]);
            let margin =
                minutes_between(arriving.to.effective_time(), &departing.from.time_planned);
            let is_big = is_big_station(&arriving.to.name) || is_big_station(&departing.from.name);
            let station = &departing.from.name;

            let (penalty, risk_level) = self.classify_margin(margin);
            match (risk_level, margin) {
                (RiskLevel::High, Some(m)) => reasons.push(Reason::new(
                    "tight_transfer",
                    format!("Tight transfer at {station} ({m} min)"),
                    penalty,
                )),
                (RiskLevel::Medium, Some(m)) => reasons.push(Reason::new(
                    "short_transfer",
                    format!("Short transfer at {station} ({m} min)"),
                    penalty,
                )),
                _ => silent_penalty += penalty,
            }

            if is_big {
                reasons.push_once(Reason::new(
                    "big_station",
                    "Transfer at a busy interchange station",
                    config.big_station_penalty,
                ));
            }

            transfer_risks.push(TransferRisk {
                from_station: arriving.to.name.clone(),
                to_station: departing.from.name.clone(),
                margin_minutes: margin,
                risk_level,
                is_big_station: is_big,
            });
        }

        let departs_in_peak = parse_timestamp(departure_time)
            .map(|dt| is_peak_time(&to_swiss_local(&dt)))
            .unwrap_or(false);
        if departs_in_peak {
            reasons.push_once(Reason::new(
                "peak_time",
                "Departure during rush hour",
                config.peak_penalty,
            ));
        }

        let delayed = legs
            .iter()
            .any(|l| l.delay_minutes.is_some_and(|d| d > config.live_delay_threshold_mins));
        if delayed {
            reasons.push_once(Reason::new(
                "live_delay",
                "Live delays reported on this connection",
                config.live_delay_penalty,
            ));
        }

        if let Some(weather) = weather.filter(|w| w.penalty > 0.0) {
            let label = weather
                .reasons
                .first()
                .map(|r| r.label.clone())
                .unwrap_or_else(|| "Adverse weather forecast".to_string());
            reasons.push_once(Reason::new("weather", label, weather.penalty));
        }

        let total = reasons.total() + silent_penalty;
        let score = round2((1.0 - total).clamp(0.0, 1.0));

        ReliabilityInsight {
            score,
            level: self.level_for(score),
            reasons: reasons.into_ranked(config.max_reasons),
            transfer_risks,
        }
    }

    /// Penalty and risk for a transfer margin. Unknown margins carry no penalty.
    fn classify_margin(&self, margin: Option<i64>) -> (f64, RiskLevel) {
        let config = &self.config;
        match margin {
            Some(m) if m < config.tight_margin_mins => (config.tight_penalty, RiskLevel::High),
            Some(m) if m <= config.short_margin_mins => (config.short_penalty, RiskLevel::Medium),
            Some(m) if m < config.comfortable_margin_mins => (config.snug_penalty, RiskLevel::Low),
            _ => (0.0, RiskLevel::Low),
        }
    }

    fn level_for(&self, score: f64) -> RiskLevel {
        if score >= self.config.low_risk_min_score {
            RiskLevel::Low
        } else if score >= self.config.medium_risk_min_score {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LegKind, StopTime};

    // 2024-03-13 is a Wednesday, 2024-03-16 a Saturday
    const WEDNESDAY: &str = "2024-03-13";
    const SATURDAY: &str = "2024-03-16";

    fn ts(date: &str, hhmm: &str) -> String {
        format!("{date}T{hhmm}:00+0100")
    }

    fn stop(name: &str, planned: String) -> StopTime {
        StopTime {
            name: name.to_string(),
            time_planned: planned,
            time_actual: None,
            platform: None,
        }
    }

    fn leg(date: &str, from: (&str, &str), to: (&str, &str)) -> Leg {
        Leg {
            kind: LegKind::Ride,
            line: Some("IR".to_string()),
            operator: None,
            from: stop(from.0, ts(date, from.1)),
            to: stop(to.0, ts(date, to.1)),
            stops: Vec::new(),
            delay_minutes: None,
        }
    }

    fn two_legs(date: &str, arrive: &str, depart: &str, at: &str) -> Vec<Leg> {
        vec![
            leg(date, ("Thun", "10:00"), (at, arrive)),
            leg(date, (at, depart), ("Spiez", "11:30")),
        ]
    }

    fn codes(insight: &ReliabilityInsight) -> Vec<&'static str> {
        insight.reasons.iter().map(|r| r.code).collect()
    }

    #[test]
    fn direct_off_peak_is_perfect() {
        let scorer = ReliabilityScorer::default();
        let legs = vec![leg(SATURDAY, ("Thun", "10:00"), ("Spiez", "10:10"))];

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        assert_eq!(insight.score, 1.0);
        assert_eq!(insight.level, RiskLevel::Low);
        assert!(insight.reasons.is_empty());
        assert!(insight.transfer_risks.is_empty());
    }

    #[test]
    fn six_minute_margin_is_short_transfer() {
        let scorer = ReliabilityScorer::default();
        let legs = vec![
            leg(SATURDAY, ("Thun", "08:00"), ("Interlaken Ost", "08:40")),
            leg(SATURDAY, ("Interlaken Ost", "08:46"), ("Brienz", "09:10")),
        ];

        let insight = scorer.score(&legs, &ts(SATURDAY, "08:00"));
        let risk = &insight.transfer_risks[0];
        assert_eq!(risk.margin_minutes, Some(6));
        assert_eq!(risk.risk_level, RiskLevel::Medium);

        let short = insight
            .reasons
            .iter()
            .find(|r| r.code == "short_transfer")
            .unwrap();
        assert_eq!(short.penalty, 0.20);
        assert_eq!(insight.score, 0.68);
        assert_eq!(insight.level, RiskLevel::Medium);
    }

    #[test]
    fn tight_transfer() {
        let scorer = ReliabilityScorer::default();
        let legs = two_legs(SATURDAY, "10:30", "10:33", "Spiez");

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        assert_eq!(insight.transfer_risks[0].risk_level, RiskLevel::High);
        assert_eq!(codes(&insight), vec!["tight_transfer", "transfers"]);
        // 1 - 0.12 - 0.35
        assert_eq!(insight.score, 0.53);
        assert_eq!(insight.level, RiskLevel::High);
    }

    #[test]
    fn four_minute_margin_is_short() {
        let scorer = ReliabilityScorer::default();
        let legs = two_legs(SATURDAY, "10:30", "10:34", "Spiez");

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        assert_eq!(insight.transfer_risks[0].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn seven_minute_margin_is_silent_penalty() {
        let scorer = ReliabilityScorer::default();
        let legs = two_legs(SATURDAY, "10:30", "10:37", "Spiez");

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        assert_eq!(insight.transfer_risks[0].risk_level, RiskLevel::Low);
        assert_eq!(codes(&insight), vec!["transfers"]);
        // 1 - 0.12 - 0.10
        assert_eq!(insight.score, 0.78);
    }

    #[test]
    fn comfortable_margin_is_free() {
        let scorer = ReliabilityScorer::default();
        let legs = two_legs(SATURDAY, "10:30", "10:38", "Spiez");

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        assert_eq!(insight.transfer_risks[0].margin_minutes, Some(8));
        assert_eq!(insight.score, 0.88);
    }

    #[test]
    fn negative_margin_is_tight() {
        let scorer = ReliabilityScorer::default();
        let legs = two_legs(SATURDAY, "10:30", "10:25", "Spiez");

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        assert_eq!(insight.transfer_risks[0].margin_minutes, Some(-5));
        assert_eq!(insight.transfer_risks[0].risk_level, RiskLevel::High);
    }

    #[test]
    fn actual_arrival_is_used_for_margin() {
        let scorer = ReliabilityScorer::default();
        let mut legs = two_legs(SATURDAY, "10:30", "10:40", "Spiez");
        legs[0].to.time_actual = Some(ts(SATURDAY, "10:38"));

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        assert_eq!(insight.transfer_risks[0].margin_minutes, Some(2));
    }

    #[test]
    fn unparseable_times_carry_no_margin_penalty() {
        let scorer = ReliabilityScorer::default();
        let mut legs = two_legs(SATURDAY, "10:30", "10:40", "Spiez");
        legs[1].from.time_planned = String::new();

        let insight = scorer.score(&legs, "");
        assert_eq!(insight.transfer_risks[0].margin_minutes, None);
        assert_eq!(insight.transfer_risks[0].risk_level, RiskLevel::Low);
        assert_eq!(insight.score, 0.88);
    }

    #[test]
    fn big_station_penalty_added_once() {
        let scorer = ReliabilityScorer::default();
        let legs = vec![
            leg(SATURDAY, ("Thun", "10:00"), ("Bern", "10:20")),
            leg(SATURDAY, ("Bern", "10:30"), ("Zürich HB", "11:26")),
            leg(SATURDAY, ("Zürich HB", "11:40"), ("Winterthur", "12:00")),
        ];

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        assert!(insight.transfer_risks.iter().all(|r| r.is_big_station));
        let big: Vec<_> = insight
            .reasons
            .iter()
            .filter(|r| r.code == "big_station")
            .collect();
        assert_eq!(big.len(), 1);
        // 1 - 0.24 - 0.08
        assert_eq!(insight.score, 0.68);
    }

    #[test]
    fn tight_transfers_are_not_deduplicated() {
        let scorer = ReliabilityScorer::default();
        let legs = vec![
            leg(SATURDAY, ("Thun", "10:00"), ("Spiez", "10:10")),
            leg(SATURDAY, ("Spiez", "10:12"), ("Frutigen", "10:30")),
            leg(SATURDAY, ("Frutigen", "10:32"), ("Kandersteg", "10:50")),
        ];

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        let tight = insight
            .reasons
            .iter()
            .filter(|r| r.code == "tight_transfer")
            .count();
        assert_eq!(tight, 2);
        // 1 - 0.24 - 0.35 - 0.35
        assert_eq!(insight.score, 0.06);
        assert_eq!(insight.level, RiskLevel::High);
    }

    #[test]
    fn weekday_rush_hour_is_penalized() {
        let scorer = ReliabilityScorer::default();
        let legs = vec![leg(WEDNESDAY, ("Thun", "08:15"), ("Spiez", "08:25"))];

        let insight = scorer.score(&legs, &ts(WEDNESDAY, "08:15"));
        assert_eq!(codes(&insight), vec!["peak_time"]);
        assert_eq!(insight.reasons[0].penalty, 0.08);
        assert_eq!(insight.score, 0.92);
    }

    #[test]
    fn weekend_rush_hour_is_not_penalized() {
        let scorer = ReliabilityScorer::default();
        let legs = vec![leg(SATURDAY, ("Thun", "08:15"), ("Spiez", "08:25"))];

        let insight = scorer.score(&legs, &ts(SATURDAY, "08:15"));
        assert!(insight.reasons.is_empty());
    }

    #[test]
    fn peak_windows() {
        let at = |date: &str, hhmm: &str| {
            let dt = parse_timestamp(&ts(date, hhmm)).unwrap();
            is_peak_time(&to_swiss_local(&dt))
        };

        assert!(at(WEDNESDAY, "07:00"));
        assert!(at(WEDNESDAY, "08:59"));
        assert!(!at(WEDNESDAY, "09:00"));
        assert!(!at(WEDNESDAY, "16:29"));
        assert!(at(WEDNESDAY, "16:30"));
        assert!(at(WEDNESDAY, "18:29"));
        assert!(!at(WEDNESDAY, "18:30"));
        assert!(!at(WEDNESDAY, "12:00"));
        assert!(!at(SATURDAY, "17:00"));
    }

    #[test]
    fn live_delay_penalty_once() {
        let scorer = ReliabilityScorer::default();
        let mut legs = two_legs(SATURDAY, "10:30", "10:45", "Spiez");
        legs[0].delay_minutes = Some(4);
        legs[1].delay_minutes = Some(10);

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        let delays = insight
            .reasons
            .iter()
            .filter(|r| r.code == "live_delay")
            .count();
        assert_eq!(delays, 1);
    }

    #[test]
    fn small_delay_is_ignored() {
        let scorer = ReliabilityScorer::default();
        let mut legs = vec![leg(SATURDAY, ("Thun", "10:00"), ("Spiez", "10:10"))];
        legs[0].delay_minutes = Some(3);

        let insight = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        assert!(insight.reasons.is_empty());
    }

    #[test]
    fn reasons_capped_and_sorted() {
        let scorer = ReliabilityScorer::default();
        let mut legs = vec![
            leg(WEDNESDAY, ("Thun", "08:00"), ("Bern", "08:20")),
            leg(WEDNESDAY, ("Bern", "08:22"), ("Olten", "08:50")),
        ];
        legs[0].delay_minutes = Some(5);

        let insight = scorer.score(&legs, &ts(WEDNESDAY, "08:00"));
        assert_eq!(insight.reasons.len(), 3);
        assert_eq!(codes(&insight), vec!["tight_transfer", "transfers", "big_station"]);
        assert!(
            insight
                .reasons
                .windows(2)
                .all(|w| w[0].penalty >= w[1].penalty)
        );
    }

    #[test]
    fn weather_penalty_is_optional_input() {
        let scorer = ReliabilityScorer::default();
        let legs = vec![leg(SATURDAY, ("Thun", "10:00"), ("Spiez", "10:10"))];
        let weather = WeatherInsight {
            level: RiskLevel::High,
            penalty: 0.2,
            reasons: vec![Reason::new("snow_risk", "Snow expected", 0.2)],
            samples: Vec::new(),
        };

        let without = scorer.score(&legs, &ts(SATURDAY, "10:00"));
        let with = scorer.score_with_weather(&legs, &ts(SATURDAY, "10:00"), Some(&weather));

        assert_eq!(without.score, 1.0);
        assert_eq!(with.score, 0.8);
        assert_eq!(with.reasons[0].code, "weather");
        assert_eq!(with.reasons[0].label, "Snow expected");
    }
}
