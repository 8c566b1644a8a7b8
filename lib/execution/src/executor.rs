use async_trait::async_trait;
use facet_search_model::ExecutionError;
use reqwest::header::ACCEPT;
use reqwest::Client;
use sparesults::{
    QueryResultsFormat, QueryResultsParser, QuerySolution, ReaderQueryResultsParserOutput,
};
use std::time::Duration;

/// The media type of SPARQL results in JSON.
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Longest part of an error response kept in [`ExecutionError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Runs `SELECT` queries against a SPARQL endpoint.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Executes `query` and returns all solutions in the order the endpoint produced them.
    async fn execute(
        &self,
        query: &str,
        endpoint: &str,
    ) -> Result<Vec<QuerySolution>, ExecutionError>;
}

/// Sends queries over the SPARQL 1.1 protocol as URL-encoded `POST` requests.
#[derive(Debug, Clone)]
pub struct HttpQueryExecutor {
    client: Client,
    timeout: Duration,
}

impl HttpQueryExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(Client::new(), timeout)
    }

    /// Uses an existing client, e.g. one with a connection pool shared with other services.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl QueryExecutor for HttpQueryExecutor {
    async fn execute(
        &self,
        query: &str,
        endpoint: &str,
    ) -> Result<Vec<QuerySolution>, ExecutionError> {
        let response = self
            .client
            .post(endpoint)
            .timeout(self.timeout)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|error| request_error(endpoint, error))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let end = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|index| body.is_char_boundary(*index))
                    .unwrap_or(0);
                body.truncate(end);
            }
            return Err(ExecutionError::Status {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
                body,
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| request_error(endpoint, error))?;
        let solutions = parse_solutions(endpoint, &body)?;
        tracing::debug!(endpoint, rows = solutions.len(), "Received query results");
        Ok(solutions)
    }
}

/// Parses a SPARQL JSON results document.
pub fn parse_solutions(
    endpoint: &str,
    body: &[u8],
) -> Result<Vec<QuerySolution>, ExecutionError> {
    let parse_error = |error: sparesults::QueryResultsParseError| ExecutionError::Parse {
        endpoint: endpoint.to_owned(),
        source: Box::new(error),
    };
    match QueryResultsParser::from_format(QueryResultsFormat::Json)
        .for_reader(body)
        .map_err(parse_error)?
    {
        ReaderQueryResultsParserOutput::Solutions(solutions) => solutions
            .collect::<Result<Vec<_>, _>>()
            .map_err(parse_error),
        ReaderQueryResultsParserOutput::Boolean(_) => {
            Err(ExecutionError::NotSolutions(endpoint.to_owned()))
        }
    }
}

fn request_error(endpoint: &str, error: reqwest::Error) -> ExecutionError {
    if error.is_timeout() {
        ExecutionError::Timeout {
            endpoint: endpoint.to_owned(),
        }
    } else {
        ExecutionError::Transport {
            endpoint: endpoint.to_owned(),
            source: Box::new(error),
        }
    }
}
