use super::{optional, required, text};
use facet_search_model::{Coordinates, MappingError, Place};
use sparesults::QuerySolution;
use std::collections::HashSet;

const DEGREES: &str = "decimal degrees";

/// Maps rows with `id`, `lat`, `long` and optionally `prefLabel` and `instanceCount` columns to
/// places. Only the first row of each place is kept.
pub fn map_places(rows: &[QuerySolution]) -> Result<Vec<Place>, MappingError> {
    let mut seen = HashSet::new();
    let mut places = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let id = text(row, "id").ok_or(MappingError::MissingColumn {
            column: "id",
            row: index,
        })?;
        if !seen.insert(id.clone()) {
            continue;
        }
        places.push(Place {
            id,
            pref_label: text(row, "prefLabel"),
            location: coordinates(row, index)?,
            instance_count: optional(row, index, "instanceCount", "non-negative integer")?,
        });
    }
    Ok(places)
}

/// Maps rows with `lat` and `long` columns to bare coordinates, e.g. for heatmaps.
pub fn map_coordinates(rows: &[QuerySolution]) -> Result<Vec<Coordinates>, MappingError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| coordinates(row, index))
        .collect()
}

fn coordinates(row: &QuerySolution, index: usize) -> Result<Coordinates, MappingError> {
    Ok(Coordinates {
        lat: required(row, index, "lat", DEGREES)?,
        long: required(row, index, "long", DEGREES)?,
    })
}
