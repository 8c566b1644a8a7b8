//! The entry points of the faceted search.
//!
//! Every operation assembles its query, sends it to the executor, maps the rows, and returns the
//! typed result together with the query text that produced it. A failure in any of these steps
//! fails the whole operation.

use crate::config::SearchConfig;
use facet_search_compiler::{AssembledQuery, QueryAssembler, QueryRequest};
use facet_search_execution::results::{
    link_endpoints, make_object_list, map_count, map_links, map_listing, map_nodes,
    map_result_set,
};
use facet_search_execution::{HttpQueryExecutor, QueryExecutor, QuerySolution};
use facet_search_model::{
    AllResults, Constraints, ExecutionError, FacetSearchResult, InstanceResult, ListingData,
    NetworkGraph, PaginatedResults, Pagination, PortalSchema, ResultCount, ResultShape, Sort,
};
use std::sync::Arc;

/// Runs faceted queries of a [`PortalSchema`] against a SPARQL endpoint.
///
/// A `FacetSearch` holds no per-request state. It is cheap to clone and can serve concurrent
/// requests.
#[derive(Clone)]
pub struct FacetSearch {
    schema: Arc<PortalSchema>,
    executor: Arc<dyn QueryExecutor>,
    config: SearchConfig,
}

impl FacetSearch {
    pub fn new(
        schema: Arc<PortalSchema>,
        executor: Arc<dyn QueryExecutor>,
        config: SearchConfig,
    ) -> Self {
        Self {
            schema,
            executor,
            config,
        }
    }

    /// Sends queries over HTTP with the timeout of `config`.
    pub fn with_http(schema: Arc<PortalSchema>, config: SearchConfig) -> Self {
        let executor = HttpQueryExecutor::new(config.request_timeout);
        Self::new(schema, Arc::new(executor), config)
    }

    pub fn schema(&self) -> &PortalSchema {
        &self.schema
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Assembles the query of `request` without executing it.
    pub fn compile(&self, request: &QueryRequest<'_>) -> FacetSearchResult<AssembledQuery> {
        self.assembler().assemble(request)
    }

    /// Counts the instances of `result_class` that satisfy `constraints`.
    pub async fn result_count(
        &self,
        result_class: &str,
        constraints: Option<&Constraints>,
    ) -> FacetSearchResult<ResultCount> {
        let query = self.compile(&QueryRequest::Count {
            result_class,
            constraints,
        })?;
        let rows = self.execute(&query.text).await?;
        let count = map_count(&rows)?;
        tracing::info!(result_class, count, "Counted results");
        Ok(ResultCount {
            result_class: result_class.to_owned(),
            count,
            sparql_query: query.text,
        })
    }

    /// Fetches one sorted page of `result_class`.
    ///
    /// A page with fewer than `page_size` objects is the last one.
    pub async fn paginated_results(
        &self,
        result_class: &str,
        pagination: Pagination,
        constraints: Option<&Constraints>,
        sort: &Sort,
    ) -> FacetSearchResult<PaginatedResults> {
        let query = self.compile(&QueryRequest::ResultSet {
            result_class,
            constraints,
            pagination,
            sort,
        })?;
        let rows = self.execute(&query.text).await?;
        let data = map_result_set(&rows)?;
        tracing::info!(
            result_class,
            page = pagination.page,
            rows = rows.len(),
            objects = data.len(),
            "Fetched result page"
        );
        Ok(PaginatedResults {
            result_class: result_class.to_owned(),
            page: pagination.page,
            page_size: pagination.page_size,
            data,
            sparql_query: query.text,
        })
    }

    /// Runs the unpaginated listing registered for `result_class`.
    ///
    /// The shape of the data depends on the listing. Network listings run a second query for the
    /// nodes of the returned links.
    pub async fn all_results(
        &self,
        result_class: &str,
        facet_class: Option<&str>,
        constraints: Option<&Constraints>,
        group_by: bool,
    ) -> FacetSearchResult<AllResults> {
        let query = self.compile(&QueryRequest::Listing {
            result_class,
            facet_class,
            constraints,
            group_by,
        })?;
        let rows = self.execute(&query.text).await?;

        let (data, sparql_query) = match &query.shape {
            ResultShape::Network { nodes_query } => {
                let links = map_links(&rows)?;
                let endpoints = link_endpoints(&links)?;
                if endpoints.is_empty() {
                    (ListingData::Network(NetworkGraph::default()), query.text)
                } else {
                    let nodes_text = self
                        .assembler()
                        .assemble_network_nodes(nodes_query, &endpoints)?;
                    let nodes = map_nodes(&self.execute(&nodes_text).await?)?;
                    (
                        ListingData::Network(NetworkGraph { nodes, links }),
                        format!("{}\n\n{nodes_text}", query.text),
                    )
                }
            }
            shape => (map_listing(shape, &rows)?, query.text),
        };
        tracing::info!(result_class, rows = rows.len(), "Fetched listing");
        Ok(AllResults {
            result_class: result_class.to_owned(),
            data,
            sparql_query,
        })
    }

    /// Fetches the entity `uri` with the properties of the `result_class` page.
    ///
    /// The constraints restrict the related instances, not the entity itself. `data` is `None`
    /// if the lookup returned no rows.
    pub async fn instance_by_uri(
        &self,
        result_class: &str,
        facet_class: Option<&str>,
        constraints: Option<&Constraints>,
        uri: &str,
    ) -> FacetSearchResult<InstanceResult> {
        let query = self.compile(&QueryRequest::Lookup {
            result_class,
            facet_class,
            constraints,
            uri,
        })?;
        let rows = self.execute(&query.text).await?;
        let data = make_object_list(&rows)?.into_iter().next();
        tracing::info!(result_class, uri, found = data.is_some(), "Fetched instance");
        Ok(InstanceResult {
            result_class: result_class.to_owned(),
            data,
            sparql_query: query.text,
        })
    }

    fn assembler(&self) -> QueryAssembler<'_> {
        QueryAssembler::new(&self.schema).with_validation(self.config.validate_queries)
    }

    async fn execute(&self, query: &str) -> Result<Vec<QuerySolution>, ExecutionError> {
        let endpoint = self.config.endpoint.as_str();
        self.executor
            .execute(query, endpoint)
            .await
            .inspect_err(|error| tracing::warn!(endpoint, %error, "Query execution failed"))
    }
}
