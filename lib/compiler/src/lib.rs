//! Compiles facet constraints into SPARQL queries.
//!
//! Constraints are turned into fragments by the [filter generators](filters), conjoined into a
//! [`ConstraintBlock`], and spliced into the query templates of a
//! [`PortalSchema`](facet_search_model::PortalSchema) by the [`QueryAssembler`].
//!
//! ```
//! use facet_search_compiler::{QueryAssembler, QueryRequest};
//! use facet_search_model::{Constraint, Constraints, FacetConfig, PortalSchema, Prefix, ResultClassSpec};
//!
//! let schema = PortalSchema {
//!     prefixes: vec![Prefix::new("dct", "http://purl.org/dc/terms/")],
//!     result_classes: vec![ResultClassSpec::new("works", ["<http://erlangen-crm.org/efrbroo/F1_Work>"])
//!         .with_facet(FacetConfig::uri("source", "dct:source"))],
//!     ..PortalSchema::default()
//! };
//! let constraints =
//!     Constraints::new().with("source", Constraint::uris(["http://ldf.fi/mmm/source/SDBM"]));
//!
//! let query = QueryAssembler::new(&schema)
//!     .with_validation(true)
//!     .assemble(&QueryRequest::Count {
//!         result_class: "works",
//!         constraints: Some(&constraints),
//!     })?;
//! assert!(query.text.contains("FILTER(?sourceFilter IN (<http://ldf.fi/mmm/source/SDBM>))"));
//! # Ok::<_, facet_search_model::FacetSearchError>(())
//! ```

mod assembler;
pub mod clause;
mod compose;
pub mod filters;
mod templates;
mod validate;

pub use assembler::{AssembledQuery, QueryAssembler, QueryRequest};
pub use compose::{compose, ConstraintBlock};
pub use templates::{Placeholder, Template, COUNT_QUERY, INSTANCE_QUERY, RESULT_SET_QUERY};
pub use validate::validate_schema;
