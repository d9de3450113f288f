//! Connection source abstraction.

use std::future::Future;

use super::client::{ConnectionQuery, TransportClient};
use super::error::TransportError;
use super::types::ConnectionsResponse;

/// Trait for fetching raw connection pages.
///
/// This abstraction allows the planner and disruption checks to be tested
/// with canned provider data.
pub trait ConnectionProvider: Send + Sync {
    /// Fetch the raw connections page for `query`.
    fn fetch_connections(
        &self,
        query: &ConnectionQuery,
    ) -> impl Future<Output = Result<ConnectionsResponse, TransportError>> + Send;
}

impl ConnectionProvider for TransportClient {
    async fn fetch_connections(
        &self,
        query: &ConnectionQuery,
    ) -> Result<ConnectionsResponse, TransportError> {
        self.connections(query).await
    }
}
