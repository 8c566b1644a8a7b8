//! Data model shared by the facet search crates: the portal schema, request constraints,
//! typed results, and the error kinds of the query pipeline.

mod constraint;
mod error;
mod facet;
mod request;
mod results;
mod schema;

pub use constraint::*;
pub use error::*;
pub use facet::*;
pub use request::*;
pub use results::*;
pub use schema::*;

// Re-export some oxrdf types.
pub use oxiri::IriParseError;
pub use oxrdf::vocab;
pub use oxrdf::{Literal, NamedNode, Term, Variable, VariableNameParseError};
pub use oxsdatatypes::Date;
