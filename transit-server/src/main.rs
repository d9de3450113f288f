use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_server::clock::{Clock, SystemClock};
use transit_server::disruption::DisruptionAggregator;
use transit_server::planner::ConnectionPlanner;
use transit_server::reliability::{ReliabilityConfig, ReliabilityScorer};
use transit_server::transport::{TransportClient, TransportConfig};
use transit_server::weather::{
    ForecastClient, ForecastConfig, WeatherCacheConfig, WeatherRiskEstimator,
};
use transit_server::web::{AppState, create_router};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Read a boolean switch from the environment.
fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transit_server=info")),
        )
        .init();

    let mut transport_config = TransportConfig::default();
    if let Ok(url) = std::env::var("TRANSPORT_BASE_URL") {
        transport_config = transport_config.with_base_url(url);
    }
    let transport =
        TransportClient::new(transport_config).expect("Failed to create transport client");

    let mut forecast_config = ForecastConfig::default();
    if let Ok(url) = std::env::var("FORECAST_BASE_URL") {
        forecast_config = forecast_config.with_base_url(url);
    }
    let forecast = ForecastClient::new(forecast_config).expect("Failed to create forecast client");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let weather = Arc::new(WeatherRiskEstimator::new(
        forecast,
        &WeatherCacheConfig::default(),
        clock.clone(),
    ));

    let scorer = ReliabilityScorer::new(ReliabilityConfig::default());
    let mut planner: ConnectionPlanner<TransportClient> =
        ConnectionPlanner::new(transport.clone(), scorer);
    if env_flag("ENABLE_WEATHER", true) {
        planner = planner
            .with_weather(weather.clone())
            .fold_weather(env_flag("WEATHER_IN_SCORE", false));
    } else {
        warn!("weather enrichment disabled");
    }

    let disruptions = DisruptionAggregator::new(transport.clone(), clock);

    let state = AppState::new(planner, transport, disruptions, weather);
    let app = create_router(state);

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let addr: SocketAddr = bind.parse().expect("BIND_ADDR is not a socket address");

    info!(%addr, "transit server listening");
    info!("  GET  /health       - Health check");
    info!("  GET  /stations     - Station lookup");
    info!("  GET  /connections  - Scored connections");
    info!("  GET  /disruptions  - Area disruption check");
    info!("  POST /weather      - Weather risk for station samples");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
