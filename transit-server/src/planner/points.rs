//! Where and when to sample the weather along a connection.

use crate::transport::{RawCheckpoint, RawConnection};
use crate::weather::{MAX_SAMPLES, WeatherQuery};

/// Weather sample points for one raw connection.
///
/// Points are the origin at departure, each transfer station at arrival and
/// the destination at arrival, one per station. When there are too many,
/// the destination is kept and transfers are dropped from the end.
/// Checkpoints without coordinates or a time are skipped.
pub fn weather_points(raw: &RawConnection) -> Vec<WeatherQuery> {
    let sections = raw.sections();
    let mut points: Vec<WeatherQuery> = Vec::new();

    let mut push = |checkpoint: Option<&RawCheckpoint>, departing: bool| {
        let Some(point) = checkpoint.and_then(|cp| sample_point(cp, departing)) else {
            return;
        };
        if let Some(existing) = points.iter().position(|p| p.station == point.station) {
            // Keep the later visit so the destination survives truncation
            if !departing {
                points.remove(existing);
                points.push(point);
            }
            return;
        }
        points.push(point);
    };

    push(raw.from.as_ref(), true);
    if let Some((_, transfers)) = sections.split_last() {
        for section in transfers {
            push(Some(&section.arrival), false);
        }
    }
    push(raw.to.as_ref(), false);

    if points.len() > MAX_SAMPLES {
        let destination = points.pop();
        points.truncate(MAX_SAMPLES - 1);
        points.extend(destination);
    }
    points
}

fn sample_point(checkpoint: &RawCheckpoint, departing: bool) -> Option<WeatherQuery> {
    let (lat, lon) = checkpoint.coordinates()?;
    let time = if departing {
        checkpoint.departure.as_deref()
    } else {
        checkpoint.arrival.as_deref()
    }
    .filter(|t| !t.is_empty())?;

    Some(WeatherQuery::new(checkpoint.station_name(), lat, lon, time))
}
