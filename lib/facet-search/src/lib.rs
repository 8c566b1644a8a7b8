#![doc(test(attr(deny(warnings))))]

//! Faceted search over a SPARQL endpoint.
//!
//! [`FacetSearch`] offers the four operations of a faceted search portal: counting the results
//! of a result class, fetching a sorted page of them, running the unpaginated listings behind
//! maps and charts, and looking up a single entity. Each response carries the SPARQL query that
//! produced it.
//!
//! The queries are described by a [`PortalSchema`](model::PortalSchema). The schema of the
//! Mapping Manuscript Migrations portal is built in, see [`mmm::schema`].
//!
//! ```
//! use facet_search::compiler::QueryRequest;
//! use facet_search::model::{Constraint, Constraints};
//! use facet_search::{mmm, FacetSearch, SearchConfig};
//! use std::sync::Arc;
//!
//! let search = FacetSearch::with_http(Arc::new(mmm::schema()), SearchConfig::default());
//! let constraints = Constraints::new().with(
//!     "productionPlace",
//!     Constraint::uris(["http://ldf.fi/mmm/place/tgn_7008038"]).with_subconcepts(),
//! );
//! let query = search.compile(&QueryRequest::Count {
//!     result_class: "manuscripts",
//!     constraints: Some(&constraints),
//! })?;
//! assert!(query.text.contains("(gvp:broaderPreferred)*"));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```
//!
//! Running the operations needs an async runtime:
//!
//! ```no_run
//! use facet_search::{mmm, FacetSearch, SearchConfig};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let search = FacetSearch::with_http(Arc::new(mmm::schema()), SearchConfig::default());
//! let count = search.result_count("manuscripts", None).await?;
//! println!("{} manuscripts", count.count);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! # }).unwrap();
//! ```

mod config;
pub mod mmm;
mod search;

pub use config::{SearchConfig, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT};
pub use search::FacetSearch;

pub mod model {
    pub use facet_search_model::*;
}

pub mod compiler {
    pub use facet_search_compiler::*;
}

pub mod execution {
    pub use facet_search_execution::*;
}
