//! Maps result rows into the typed results of the facet search.
//!
//! Every mapper is a pure function over the rows and fails with a [`MappingError`] if a row
//! does not have the expected shape.

mod network;
mod objects;
mod places;

pub use network::{link_endpoints, map_links, map_nodes};
pub use objects::{make_object_list, map_result_set};
pub use places::{map_coordinates, map_places};

use facet_search_model::{ListingData, MappingError, ResultShape, Term};
use sparesults::QuerySolution;
use std::str::FromStr;

/// Reads the `count` column of the single row of a count query.
pub fn map_count(rows: &[QuerySolution]) -> Result<u64, MappingError> {
    let row = rows.first().ok_or(MappingError::EmptyResult)?;
    required(row, 0, "count", "non-negative integer")
}

/// Maps the rows of a listing whose shape needs a single query.
///
/// Network listings run a second query and are assembled by the caller from [`map_links`] and
/// [`map_nodes`].
pub fn map_listing(
    shape: &ResultShape,
    rows: &[QuerySolution],
) -> Result<ListingData, MappingError> {
    Ok(match shape {
        ResultShape::Places => ListingData::Places(map_places(rows)?),
        ResultShape::Coordinates => ListingData::Coordinates(map_coordinates(rows)?),
        ResultShape::Objects => ListingData::Objects(make_object_list(rows)?),
        ResultShape::Count => return Err(MappingError::UnsupportedShape("count")),
        ResultShape::Network { .. } => return Err(MappingError::UnsupportedShape("network")),
    })
}

/// The lexical value of a term: the IRI, the blank node id, or the literal value.
pub fn term_value(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_owned(),
        Term::Literal(literal) => literal.value().to_owned(),
        // Blank nodes keep their id.
        other => other.to_string().trim_start_matches("_:").to_owned(),
    }
}

/// The value of `column` in `row`, if bound.
fn text(row: &QuerySolution, column: &str) -> Option<String> {
    row.get(column).map(term_value)
}

/// The value of `column` in `row` parsed as `T`. Fails if the column is unbound.
fn required<T: FromStr>(
    row: &QuerySolution,
    index: usize,
    column: &'static str,
    expected: &'static str,
) -> Result<T, MappingError> {
    optional(row, index, column, expected)?
        .ok_or(MappingError::MissingColumn { column, row: index })
}

/// The value of `column` in `row` parsed as `T`, `None` if the column is unbound.
fn optional<T: FromStr>(
    row: &QuerySolution,
    index: usize,
    column: &'static str,
    expected: &'static str,
) -> Result<Option<T>, MappingError> {
    text(row, column)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| MappingError::InvalidValue {
                    column,
                    row: index,
                    value,
                    expected,
                })
        })
        .transpose()
}
