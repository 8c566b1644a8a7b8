use super::term_value;
use facet_search_model::{MappingError, Record, Value, ORDER_BY_COLUMN};
use sparesults::QuerySolution;
use std::collections::HashMap;

/// Separates the path segments of a nested column, e.g. `author__prefLabel`.
const NESTING_SEPARATOR: &str = "__";

/// Groups rows by their `id` column into objects, in the order the ids first appear.
///
/// A column `a__b` becomes the field `b` of a nested object `a`. Repeated values accumulate and
/// nested objects with the same `id` are merged.
pub fn make_object_list(rows: &[QuerySolution]) -> Result<Vec<Record>, MappingError> {
    object_list(rows, &[])
}

/// Maps the rows of a result set page like [`make_object_list`], without the sort column.
pub fn map_result_set(rows: &[QuerySolution]) -> Result<Vec<Record>, MappingError> {
    object_list(rows, &[ORDER_BY_COLUMN])
}

fn object_list(rows: &[QuerySolution], skipped: &[&str]) -> Result<Vec<Record>, MappingError> {
    let mut objects: Vec<Record> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, row) in rows.iter().enumerate() {
        let bindings = row
            .iter()
            .filter(|(variable, _)| !skipped.contains(&variable.as_str()))
            .map(|(variable, term)| (variable.as_str(), term_value(term)))
            .collect();
        let record = row_record(bindings);
        let id = record
            .id()
            .map(str::to_owned)
            .ok_or(MappingError::MissingColumn {
                column: "id",
                row: index,
            })?;

        match positions.get(&id) {
            Some(position) => objects[*position].merge(record),
            None => {
                positions.insert(id, objects.len());
                objects.push(record);
            }
        }
    }
    Ok(objects)
}

fn row_record(bindings: Vec<(&str, String)>) -> Record {
    let mut record = Record::new();
    let mut nested: Vec<(&str, Vec<(&str, String)>)> = Vec::new();
    for (column, value) in bindings {
        match column.split_once(NESTING_SEPARATOR) {
            None => record.push(column, Value::Term(value)),
            Some((head, tail)) => match nested.iter_mut().find(|(key, _)| *key == head) {
                Some((_, fields)) => fields.push((tail, value)),
                None => nested.push((head, vec![(tail, value)])),
            },
        }
    }
    for (key, fields) in nested {
        record.push(key, Value::Record(row_record(fields)));
    }
    record
}
