//! Swiss transit connection server.
//!
//! Answers: "what connections exist between two stations, and how far
//! can I trust each one?" Raw provider responses are normalized into
//! canonical connections, then scored for reliability, optionally
//! enriched with a weather penalty.

pub mod clock;
pub mod disruption;
pub mod domain;
pub mod planner;
pub mod reliability;
pub mod transport;
pub mod weather;
pub mod web;
