//! JSON web layer over the planner, station lookup, disruption checks and
//! weather estimates.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
