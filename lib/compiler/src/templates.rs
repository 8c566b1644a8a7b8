//! The query templates shared by all result classes and their placeholder substitution.

use facet_search_model::ConfigurationError;
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

/// Matches any placeholder left in a template.
static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<[A-Z][A-Z_]*>").ok());

/// Counts the instances of the facet class that satisfy `<FILTER>`.
pub const COUNT_QUERY: &str = "
SELECT (COUNT(DISTINCT ?id) AS ?count)
WHERE {
  <FILTER>
  VALUES ?facetClass { <FACET_CLASS> }
  ?id a ?facetClass .
}";

/// Selects one page of ids in a sub query, then projects the result set columns for them.
pub const RESULT_SET_QUERY: &str = "
SELECT *
WHERE {
  {
    SELECT ?id (<ORDER_BY_AGGREGATE>(?orderByValue) AS ?orderBy)
    WHERE {
      <FILTER>
      VALUES ?facetClass { <FACET_CLASS> }
      ?id a ?facetClass .
      <ORDER_BY_TRIPLE>
    }
    GROUP BY ?id
    <ORDER_BY>
    <PAGE>
  }
  FILTER(BOUND(?id))
  <RESULT_SET_PROPERTIES>
}
<ORDER_BY>";

/// Projects the properties of a single entity and of the entities related to it.
pub const INSTANCE_QUERY: &str = "
SELECT *
WHERE {
  BIND(<ID> AS ?id)
  <PROPERTIES>
  <RELATED_INSTANCES>
}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Filter,
    FacetClass,
    ResultSetProperties,
    Properties,
    OrderByAggregate,
    OrderByTriple,
    OrderBy,
    Page,
    Id,
    RelatedInstances,
    IdSet,
    Periods,
}

impl Placeholder {
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Filter => "<FILTER>",
            Placeholder::FacetClass => "<FACET_CLASS>",
            Placeholder::ResultSetProperties => "<RESULT_SET_PROPERTIES>",
            Placeholder::Properties => "<PROPERTIES>",
            Placeholder::OrderByAggregate => "<ORDER_BY_AGGREGATE>",
            Placeholder::OrderByTriple => "<ORDER_BY_TRIPLE>",
            Placeholder::OrderBy => "<ORDER_BY>",
            Placeholder::Page => "<PAGE>",
            Placeholder::Id => "<ID>",
            Placeholder::RelatedInstances => "<RELATED_INSTANCES>",
            Placeholder::IdSet => "<ID_SET>",
            Placeholder::Periods => "<PERIODS>",
        }
    }
}

/// A template being filled in.
///
/// Every occurrence of a placeholder is replaced. Multi-line values are indented like the
/// placeholder they replace.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    text: String,
}

impl Template {
    /// `name` identifies the template in errors.
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            text: text.trim_start_matches('\n').to_owned(),
        }
    }

    #[must_use]
    pub fn fill(mut self, placeholder: Placeholder, value: &str) -> Self {
        let token = placeholder.token();
        let mut filled = String::with_capacity(self.text.len() + value.len());
        let mut rest = self.text.as_str();
        while let Some(position) = rest.find(token) {
            let (before, after) = rest.split_at(position);
            filled.push_str(before);
            let line_start = filled.rfind('\n').map_or(0, |newline| newline + 1);
            let indent = &filled[line_start..];
            if indent.chars().all(char::is_whitespace) {
                let indent = indent.to_owned();
                filled.push_str(&value.replace('\n', &format!("\n{indent}")));
            } else {
                filled.push_str(value);
            }
            rest = &after[token.len()..];
        }
        filled.push_str(rest);
        self.text = filled;
        self
    }

    /// Returns the query text, failing if a placeholder was left unfilled. Trailing whitespace
    /// is stripped from every line.
    pub fn finish(self) -> Result<String, ConfigurationError> {
        let pattern = PLACEHOLDER
            .as_ref()
            .ok_or_else(|| ConfigurationError::InvalidQuery {
                template: self.name.clone(),
                message: "the placeholder pattern does not compile".to_owned(),
            })?;
        match pattern.find(&self.text) {
            Some(placeholder) => Err(ConfigurationError::UnresolvedPlaceholder {
                template: self.name,
                placeholder: placeholder.as_str().to_owned(),
            }),
            None => Ok(self.text.lines().map(str::trim_end).join("\n")),
        }
    }
}
