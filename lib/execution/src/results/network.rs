use super::{optional, text};
use facet_search_model::{MappingError, NamedNode, NetworkLink, NetworkNode};
use sparesults::QuerySolution;
use std::collections::HashSet;

/// Maps rows with `source`, `target` and an optional `weight` column to links.
pub fn map_links(rows: &[QuerySolution]) -> Result<Vec<NetworkLink>, MappingError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            Ok(NetworkLink {
                source: column(row, index, "source")?,
                target: column(row, index, "target")?,
                weight: optional(row, index, "weight", "non-negative integer")?,
            })
        })
        .collect()
}

/// Maps rows with `id` and optional `prefLabel` and `class` columns to nodes, one per id.
pub fn map_nodes(rows: &[QuerySolution]) -> Result<Vec<NetworkNode>, MappingError> {
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let id = column(row, index, "id")?;
        if seen.insert(id.clone()) {
            nodes.push(NetworkNode {
                id,
                pref_label: text(row, "prefLabel"),
                class: text(row, "class"),
            });
        }
    }
    Ok(nodes)
}

/// The distinct nodes referenced by `links`, in order of first appearance.
pub fn link_endpoints(links: &[NetworkLink]) -> Result<Vec<NamedNode>, MappingError> {
    let mut seen = HashSet::new();
    let mut endpoints = Vec::new();
    for (index, link) in links.iter().enumerate() {
        for (column, value) in [("source", &link.source), ("target", &link.target)] {
            if !seen.insert(value.as_str()) {
                continue;
            }
            let node = NamedNode::new(value.as_str()).map_err(|_| MappingError::InvalidValue {
                column,
                row: index,
                value: value.clone(),
                expected: "IRI",
            })?;
            endpoints.push(node);
        }
    }
    Ok(endpoints)
}

fn column(row: &QuerySolution, index: usize, column: &'static str) -> Result<String, MappingError> {
    text(row, column).ok_or(MappingError::MissingColumn { column, row: index })
}
