#![doc(test(attr(deny(warnings))))]

//! Runs assembled queries and turns their rows into typed results.
//!
//! # Executors
//!
//! The facet search treats the SPARQL endpoint as an opaque collaborator behind the
//! [`QueryExecutor`] trait. [`HttpQueryExecutor`] implements it with the SPARQL 1.1 protocol and
//! parses `application/sparql-results+json` documents with `sparesults`. Tests can plug in any
//! other engine.
//!
//! # Result Mapping
//!
//! The functions in [`results`] map the solutions of a query into counts, object lists, places,
//! coordinates, or the nodes and links of a network. A row that lacks an expected column is a
//! [`MappingError`](facet_search_model::MappingError), never a silently defaulted value.

mod executor;
pub mod results;

pub use executor::{parse_solutions, HttpQueryExecutor, QueryExecutor, SPARQL_RESULTS_JSON};
pub use sparesults::QuerySolution;
