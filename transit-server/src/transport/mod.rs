//! Transport API (transport.opendata.ch) client and normalization.
//!
//! Key characteristics of the provider:
//! - Times are ISO 8601 with compact offsets (`+0100`)
//! - Durations look like `"00d01:23:00"`
//! - Live data ("prognosis") is only present where it exists, and a
//!   changed platform is flagged with a trailing `!`

mod client;
mod convert;
mod error;
mod provider;
mod types;

pub use client::{ConnectionQuery, MAX_CONNECTIONS, TransportClient, TransportConfig};
pub use convert::{
    assemble_connections, batch_window, connection_id, convert_connection, normalize_leg,
};
pub use error::TransportError;
pub use provider::ConnectionProvider;
pub use types::{
    ConnectionsResponse, LocationsResponse, RawCheckpoint, RawConnection, RawCoordinate,
    RawJourney, RawPrognosis, RawSection, RawStation,
};
