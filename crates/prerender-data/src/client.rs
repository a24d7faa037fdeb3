//! Request-scoped GraphQL client.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::GraphQlConfig;
use crate::error::DataError;
use crate::query::{QueryRequest, QueryResponse};

/// GraphQL client for one request.
///
/// Holds the viewer's `Cookie` header and a result cache. The underlying
/// `reqwest::Client` (connection pool) is shared between requests; the
/// cache never is.
#[derive(Debug)]
pub struct GraphQlClient {
    http: reqwest::Client,
    config: GraphQlConfig,
    cookie: Option<String>,
    cache: Mutex<Map<String, Value>>,
    network_requests: AtomicUsize,
}

impl GraphQlClient {
    /// Create a client for a request.
    pub fn new(http: reqwest::Client, config: GraphQlConfig) -> Self {
        Self {
            http,
            config,
            cookie: None,
            cache: Mutex::new(Map::new()),
            network_requests: AtomicUsize::new(0),
        }
    }

    /// Forward the inbound `Cookie` header with every query.
    pub fn with_cookie(mut self, cookie: Option<&str>) -> Self {
        self.cookie = cookie.filter(|c| !c.is_empty()).map(str::to_string);
        self
    }

    /// Endpoint queries are sent to.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn cache(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a query, answering from the cache when it already ran.
    ///
    /// Returns the `data` member of the response (`null` when absent).
    pub async fn query(&self, request: &QueryRequest) -> Result<Value, DataError> {
        if let Some(hit) = self.cached(request) {
            tracing::trace!(operation = ?request.operation_name, "query served from cache");
            return Ok(hit);
        }

        let data = self.send(request).await?;
        self.cache().insert(request.cache_key(), data.clone());
        Ok(data)
    }

    /// Run a query and deserialize its data.
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        request: &QueryRequest,
    ) -> Result<T, DataError> {
        let data = self.query(request).await?;
        serde_json::from_value(data).map_err(|e| DataError::Decode {
            endpoint: self.config.endpoint.clone(),
            message: e.to_string(),
        })
    }

    async fn send(&self, request: &QueryRequest) -> Result<Value, DataError> {
        let endpoint = &self.config.endpoint;
        let start = Instant::now();

        let mut builder = self.http.post(endpoint).json(request);
        for (name, value) in &self.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(reqwest::header::COOKIE, cookie.as_str());
        }

        self.network_requests.fetch_add(1, Ordering::Relaxed);
        let response = builder.send().await.map_err(|source| DataError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(endpoint = %endpoint, status = status.as_u16(), "graphql request failed");
            return Err(DataError::Status {
                status: status.as_u16(),
                endpoint: endpoint.clone(),
            });
        }

        let body: QueryResponse = response.json().await.map_err(|e| DataError::Decode {
            endpoint: endpoint.clone(),
            message: e.to_string(),
        })?;

        if let Some(first) = body.errors.into_iter().next() {
            return Err(DataError::GraphQl(first.message));
        }

        tracing::debug!(
            operation = ?request.operation_name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "graphql query complete"
        );

        Ok(body.data.unwrap_or(Value::Null))
    }

    /// Result of a query that already ran during this request.
    pub fn cached(&self, request: &QueryRequest) -> Option<Value> {
        self.cache().get(&request.cache_key()).cloned()
    }

    /// Every cached result, keyed by cache key, in the order they arrived.
    pub fn extract(&self) -> Value {
        Value::Object(self.cache().clone())
    }

    /// Whether any query result is cached.
    pub fn has_data(&self) -> bool {
        !self.cache().is_empty()
    }

    /// Number of queries that went over the network.
    pub fn network_requests(&self) -> usize {
        self.network_requests.load(Ordering::Relaxed)
    }
}
