//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{error, warn};

use crate::disruption::DisruptionReport;
use crate::domain::ConnectionBatch;
use crate::planner::PlanError;
use crate::transport::TransportError;
use crate::weather::{WeatherInsight, WeatherQuery};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(search_stations))
        .route("/connections", get(plan_connections))
        .route("/disruptions", get(check_disruptions))
        .route("/weather", post(estimate_weather))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Look up stations by name.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Result<Json<StationSearchResponse>, AppError> {
    let q = req.q.trim();
    if q.is_empty() {
        return Err(AppError::BadRequest {
            message: "Station query is empty".to_string(),
        });
    }

    let limit = req
        .limit
        .unwrap_or(DEFAULT_STATION_LIMIT)
        .min(MAX_STATION_LIMIT);
    let mut stations = state.transport.locations(q).await?;
    stations.truncate(limit);

    Ok(Json(StationSearchResponse { stations }))
}

/// Plan and score connections between two stations.
async fn plan_connections(
    State(state): State<AppState>,
    Query(req): Query<ConnectionsRequest>,
) -> Result<Json<ConnectionBatch>, AppError> {
    let query = req.into_query();
    let batch = state.planner.plan(&query).await?;
    Ok(Json(batch))
}

/// Sample routes from a station and report area-wide service health.
async fn check_disruptions(
    State(state): State<AppState>,
    Query(req): Query<DisruptionRequest>,
) -> Result<Json<DisruptionReport>, AppError> {
    let station = req.station.trim();
    if station.is_empty() {
        return Err(AppError::BadRequest {
            message: "Station is empty".to_string(),
        });
    }

    Ok(Json(state.disruptions.check(station).await))
}

/// Weather risk for a set of station samples.
async fn estimate_weather(
    State(state): State<AppState>,
    Json(queries): Json<Vec<WeatherQuery>>,
) -> Json<WeatherInsight> {
    Json(state.weather.estimate(&queries).await)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    RateLimited { message: String },
    Upstream { message: String },
}

impl From<TransportError> for AppError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::InvalidRequest(message) => AppError::BadRequest { message },
            e @ TransportError::RateLimited => AppError::RateLimited {
                message: e.to_string(),
            },
            e => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidRequest(message) => AppError::BadRequest { message },
            PlanError::Transport(e) => AppError::from(e),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::RateLimited { message }
            | AppError::Upstream { message } => message,
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
