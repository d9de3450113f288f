//! Well-known Swiss stations.

/// High-traffic interchanges where changing trains carries extra risk:
/// long walks between platforms and crowded underpasses.
///
/// Matched case-insensitively as substrings of a station name.
pub const BIG_STATIONS: &[&str] = &[
    "zürich hb",
    "zürich flughafen",
    "bern",
    "basel sbb",
    "genève",
    "lausanne",
    "luzern",
    "olten",
    "winterthur",
    "st. gallen",
    "biel/bienne",
    "lugano",
];

/// Hubs sampled when checking area-wide disruption.
pub const HUB_STATIONS: [&str; 8] = [
    "Zürich HB",
    "Bern",
    "Basel SBB",
    "Genève",
    "Lausanne",
    "Luzern",
    "St. Gallen",
    "Lugano",
];

/// Whether `name` refers to one of the big interchange stations.
///
/// # Examples
///
/// ```
/// use transit_server::domain::is_big_station;
///
/// assert!(is_big_station("Zürich HB"));
/// assert!(is_big_station("BERN"));
/// assert!(!is_big_station("Thun"));
/// ```
pub fn is_big_station(name: &str) -> bool {
    let name = name.to_lowercase();
    BIG_STATIONS.iter().any(|big| name.contains(big))
}
