//! Error type for data fetching.

/// Errors returned by `GraphQlClient::query`.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("invalid response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),
}

impl DataError {
    /// HTTP status, when the endpoint answered with an error status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
