//! Conversion from transport DTOs to the canonical connection model.
//!
//! Parsing is permissive: a missing prognosis, platform or duration falls
//! back to an empty or zero value instead of failing the whole batch.

use tracing::warn;

use crate::domain::time::{minutes_between, parse_duration};
use crate::domain::{Connection, ConnectionBatch, Leg, LegKind, Station, StopTime, Tag};

use super::types::{RawCheckpoint, RawConnection, RawSection, RawStation};

/// Normalize one raw section into a leg.
pub fn normalize_leg(section: &RawSection) -> Leg {
    let kind = if section.walk.is_some() {
        LegKind::Walk
    } else {
        LegKind::Ride
    };

    let dep = &section.departure;
    let arr = &section.arrival;
    let dep_prognosis = dep.prognosis.as_ref();
    let arr_prognosis = arr.prognosis.as_ref();

    let from = stop_time(
        dep,
        dep.departure.as_deref(),
        dep_prognosis.and_then(|p| p.departure.as_deref()),
    );
    let to = stop_time(
        arr,
        arr.arrival.as_deref(),
        arr_prognosis.and_then(|p| p.arrival.as_deref()),
    );

    let journey = section.journey.as_ref();
    let line = match kind {
        LegKind::Walk => None,
        LegKind::Ride => journey.and_then(|j| {
            non_empty(j.name.as_deref()).or_else(|| non_empty(j.category.as_deref()))
        }),
    };

    let stops = journey
        .and_then(|j| j.pass_list.as_deref())
        .unwrap_or(&[])
        .iter()
        .map(|cp| {
            let prognosis = cp.prognosis.as_ref();
            stop_time(
                cp,
                cp.departure.as_deref().or(cp.arrival.as_deref()),
                prognosis.and_then(|p| p.departure.as_deref().or(p.arrival.as_deref())),
            )
        })
        .collect();

    Leg {
        kind,
        line,
        operator: journey.and_then(|j| non_empty(j.operator.as_deref())),
        from,
        to,
        stops,
        delay_minutes: departure_delay(dep),
    }
}

/// Build a stop time from a checkpoint and the relevant scheduled/live times.
fn stop_time(checkpoint: &RawCheckpoint, planned: Option<&str>, live: Option<&str>) -> StopTime {
    let time_planned = planned.unwrap_or("").to_string();
    let time_actual = live
        .filter(|t| !t.is_empty() && *t != time_planned)
        .map(str::to_string);

    // Live platform wins; the provider marks changed platforms with "!"
    let live_platform = checkpoint
        .prognosis
        .as_ref()
        .and_then(|p| non_empty(p.platform.as_deref()));
    let platform = live_platform.or_else(|| non_empty(checkpoint.platform.as_deref()));

    StopTime {
        name: checkpoint.station_name().to_string(),
        time_planned,
        time_actual,
        platform,
    }
}

/// Departure delay in whole minutes, only when the vehicle runs late.
fn departure_delay(checkpoint: &RawCheckpoint) -> Option<u32> {
    let scheduled = checkpoint.departure.as_deref()?;
    let live = checkpoint.prognosis.as_ref()?.departure.as_deref()?;
    let delay = minutes_between(scheduled, live)?;
    u32::try_from(delay).ok().filter(|d| *d > 0)
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Deterministic id from the departure time and ride line names.
///
/// Every character other than ASCII alphanumerics and `-` becomes `_`.
///
/// # Examples
///
/// ```
/// use transit_server::transport::connection_id;
///
/// let id = connection_id("2024-03-13T08:02:00+0100", ["IC 1", "S 3"]);
/// assert_eq!(id, "2024-03-13T08_02_00_0100-IC_1-S_3");
/// ```
pub fn connection_id<'a>(departure: &str, lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut raw = departure.to_string();
    for line in lines {
        raw.push('-');
        raw.push_str(line);
    }

    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The raw connections that make it into a batch of at most `limit`.
///
/// Connections without sections cannot produce a leg and are skipped.
pub fn batch_window(raw: &[RawConnection], limit: usize) -> impl Iterator<Item = &RawConnection> {
    raw.iter().take(limit).filter(|c| !c.sections().is_empty())
}

/// Assemble a page of raw connections into canonical connections with tags.
pub fn assemble_connections(raw: &[RawConnection], limit: usize) -> ConnectionBatch {
    let skipped = raw
        .iter()
        .take(limit)
        .filter(|c| c.sections().is_empty())
        .count();
    if skipped > 0 {
        warn!(skipped, "skipping connections without sections");
    }

    let mut connections: Vec<Connection> =
        batch_window(raw, limit).map(convert_connection).collect();

    if let (Some(fastest), Some(fewest)) = (
        connections.iter().map(|c| c.duration_minutes).min(),
        connections.iter().map(|c| c.transfers_count).min(),
    ) {
        for (idx, connection) in connections.iter_mut().enumerate() {
            if connection.duration_minutes == fastest {
                connection.tags.push(Tag::Fastest);
            }
            if connection.transfers_count == fewest {
                connection.tags.push(Tag::FewestTransfers);
            }
            // Provider order is trusted as the recommendation
            if idx == 0 {
                connection.tags.push(Tag::Recommended);
            }
        }
    }

    let first = raw.first();
    ConnectionBatch {
        from_station: first.and_then(|c| c.from.as_ref()).and_then(batch_station),
        to_station: first.and_then(|c| c.to.as_ref()).and_then(batch_station),
        connections,
    }
}

fn batch_station(checkpoint: &RawCheckpoint) -> Option<Station> {
    let RawStation { id, name, .. } = checkpoint.station.as_ref()?;
    Some(Station {
        id: id.clone(),
        name: name.clone().unwrap_or_default(),
    })
}

/// Convert one raw connection, without tags.
pub fn convert_connection(raw: &RawConnection) -> Connection {
    let legs: Vec<Leg> = raw.sections().iter().map(normalize_leg).collect();

    let departure_time = raw
        .from
        .as_ref()
        .and_then(|c| c.departure.clone())
        .unwrap_or_default();
    let arrival_time = raw
        .to
        .as_ref()
        .and_then(|c| c.arrival.clone())
        .unwrap_or_default();

    let id = connection_id(
        &departure_time,
        legs.iter()
            .filter(|l| l.kind == LegKind::Ride)
            .filter_map(|l| l.line.as_deref()),
    );

    Connection {
        id,
        departure_time,
        arrival_time,
        duration_minutes: raw.duration.as_deref().and_then(parse_duration).unwrap_or(0),
        transfers_count: raw.transfers.unwrap_or(0),
        legs,
        reliability_score: None,
        reliability: None,
        weather: None,
        tags: Vec::new(),
    }
}
