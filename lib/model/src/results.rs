use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::slice;

/// A result object: an ordered set of properties.
///
/// A property holds one value until a second distinct value arrives, from then on it holds a
/// list. Nested objects that share an `id` are merged instead of repeated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, PropertyValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record holding only the given id.
    pub fn with_id(id: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.push("id", Value::Term(id.into()));
        record
    }

    pub fn id(&self) -> Option<&str> {
        match self.get("id")? {
            PropertyValue::Single(Value::Term(id)) => Some(id),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a value to a property. Repeated distinct values accumulate, duplicates are ignored.
    pub fn push(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(name, _)| name == key) {
            Some((_, existing)) => existing.accumulate(value),
            None => self
                .entries
                .push((key.to_owned(), PropertyValue::Single(value))),
        }
    }

    /// Adds every value of `other` to this record.
    pub fn merge(&mut self, other: Record) {
        for (key, values) in other.entries {
            for value in values.into_values() {
                self.push(&key, value);
            }
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Single(Value),
    Multiple(Vec<Value>),
}

impl PropertyValue {
    pub fn values(&self) -> &[Value] {
        match self {
            PropertyValue::Single(value) => slice::from_ref(value),
            PropertyValue::Multiple(values) => values,
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            PropertyValue::Single(value) => vec![value],
            PropertyValue::Multiple(values) => values,
        }
    }

    /// The plain string values of this property.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.values().iter().filter_map(Value::as_term)
    }

    fn record_mut(&mut self, id: &str) -> Option<&mut Record> {
        let values = match self {
            PropertyValue::Single(value) => slice::from_mut(value),
            PropertyValue::Multiple(values) => values.as_mut_slice(),
        };
        values.iter_mut().find_map(|value| match value {
            Value::Record(record) if record.id() == Some(id) => Some(record),
            _ => None,
        })
    }

    fn accumulate(&mut self, value: Value) {
        let value = match value {
            Value::Record(incoming) => {
                let id = incoming.id().map(str::to_owned);
                match id.and_then(|id| self.record_mut(&id)) {
                    Some(existing) => {
                        existing.merge(incoming);
                        return;
                    }
                    None => Value::Record(incoming),
                }
            }
            value @ Value::Term(_) => value,
        };
        if self.values().contains(&value) {
            return;
        }
        *self = match std::mem::replace(self, PropertyValue::Multiple(Vec::new())) {
            PropertyValue::Single(first) => PropertyValue::Multiple(vec![first, value]),
            PropertyValue::Multiple(mut values) => {
                values.push(value);
                PropertyValue::Multiple(values)
            }
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// The lexical value of an IRI or literal.
    Term(String),
    Record(Record),
}

impl Value {
    pub fn as_term(&self) -> Option<&str> {
        match self {
            Value::Term(term) => Some(term),
            Value::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            Value::Term(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

/// A place on a map with an optional label and instance count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    pub location: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNode {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkLink {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkGraph {
    pub nodes: Vec<NetworkNode>,
    pub links: Vec<NetworkLink>,
}

/// The data of an unpaginated listing. Its shape depends on the result class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListingData {
    Objects(Vec<Record>),
    Places(Vec<Place>),
    Coordinates(Vec<Coordinates>),
    Network(NetworkGraph),
}

/// The number of instances of a result class that satisfy the constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultCount {
    pub result_class: String,
    pub count: u64,
    pub sparql_query: String,
}

/// One page of a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResults {
    pub result_class: String,
    pub page: u64,
    pub page_size: u64,
    pub data: Vec<Record>,
    pub sparql_query: String,
}

/// An unpaginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllResults {
    pub result_class: String,
    pub data: ListingData,
    pub sparql_query: String,
}

/// A single entity, `None` if the lookup returned no rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceResult {
    pub result_class: String,
    pub data: Option<Record>,
    pub sparql_query: String,
}
