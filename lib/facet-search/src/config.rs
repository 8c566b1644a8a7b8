use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://ldf.fi/mmm/sparql";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Holds the runtime configuration of a [`FacetSearch`](crate::FacetSearch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// The SPARQL endpoint every query is sent to.
    pub endpoint: String,
    /// How long a single query may take, including the transfer of the results.
    pub request_timeout: Duration,
    /// Whether assembled queries are parsed before they are executed.
    pub validate_queries: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            validate_queries: true,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    #[must_use]
    pub fn with_query_validation(mut self, validate_queries: bool) -> Self {
        self.validate_queries = validate_queries;
        self
    }
}
