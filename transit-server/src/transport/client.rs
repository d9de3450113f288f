//! Transport API HTTP client.
//!
//! Provides async methods for querying connections and locations.
//! Concurrency against the provider is bounded by a semaphore.

use std::sync::Arc;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::Station;
use crate::domain::time::{parse_timestamp, to_swiss_local};

use super::error::TransportError;
use super::types::{ConnectionsResponse, LocationsResponse};

/// Default base URL for the transport API.
const DEFAULT_BASE_URL: &str = "https://transport.opendata.ch/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// The provider never returns more than this many connections.
pub const MAX_CONNECTIONS: usize = 16;

/// Configuration for the transport client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 20,
        }
    }
}

/// A connection search, already resolved from free text by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionQuery {
    pub from: String,
    pub to: String,
    /// ISO 8601 timestamp; `None` means "now".
    pub datetime: Option<String>,
    pub limit: usize,
    /// Interpret `datetime` as the latest arrival instead of earliest departure.
    pub is_arrival_time: bool,
}

impl ConnectionQuery {
    /// A departure-now query.
    pub fn new(from: impl Into<String>, to: impl Into<String>, limit: usize) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            datetime: None,
            limit,
            is_arrival_time: false,
        }
    }

    pub fn at(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }

    pub fn arriving_by(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self.is_arrival_time = true;
        self
    }

    /// Provider query parameters.
    ///
    /// The timestamp is split into Swiss local `date` and `time`. The
    /// arrival flag is only sent alongside a timestamp.
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>, TransportError> {
        let mut params = vec![
            ("from", self.from.clone()),
            ("to", self.to.clone()),
            ("limit", self.limit.clamp(1, MAX_CONNECTIONS).to_string()),
        ];

        if let Some(datetime) = &self.datetime {
            let dt = parse_timestamp(datetime).ok_or_else(|| {
                TransportError::InvalidRequest(format!("unparseable datetime: {datetime}"))
            })?;
            let local = to_swiss_local(&dt);
            params.push(("date", local.format("%Y-%m-%d").to_string()));
            params.push(("time", local.format("%H:%M").to_string()));
            if self.is_arrival_time {
                params.push(("isArrivalTime", "1".to_string()));
            }
        }

        Ok(params)
    }
}

/// Transport API client.
#[derive(Debug, Clone)]
pub struct TransportClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl TransportClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch the raw connections page for a query.
    pub async fn connections(
        &self,
        query: &ConnectionQuery,
    ) -> Result<ConnectionsResponse, TransportError> {
        let params = query.to_params()?;
        let url = format!("{}/connections", self.base_url);

        debug!(from = %query.from, to = %query.to, limit = query.limit, "fetching connections");
        self.get_json(&url, &params).await
    }

    /// Look up stations by name.
    ///
    /// Entries without a name are dropped.
    pub async fn locations(&self, query: &str) -> Result<Vec<Station>, TransportError> {
        let url = format!("{}/locations", self.base_url);
        let params = [("query", query.to_string()), ("type", "station".to_string())];

        let response: LocationsResponse = self.get_json(&url, &params).await?;

        Ok(response
            .stations
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| {
                let name = s.name.filter(|n| !n.is_empty())?;
                Some(Station { id: s.id, name })
            })
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TransportError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self.http.get(url).query(params).send().await?;
        let body = check_status(response).await?.text().await?;

        serde_json::from_str(&body).map_err(|e| TransportError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

async fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(TransportError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(response)
}
