//! Canonical domain types.
//!
//! Everything the presentation layer sees is defined here: stations,
//! stop times, legs, connections and the shared risk vocabulary. Provider
//! quirks never leak past `transport::convert`.

mod connection;
mod risk;
mod station;
pub mod time;

pub use connection::{Connection, ConnectionBatch, Leg, LegKind, Station, StopTime, Tag};
pub use risk::{Reason, ReasonList, RiskLevel, round2};
pub use station::{BIG_STATIONS, HUB_STATIONS, is_big_station};
