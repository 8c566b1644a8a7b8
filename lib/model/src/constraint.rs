use crate::error::ValidationError;
use crate::facet::FilterType;
use oxsdatatypes::Date;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The active constraints of a request, keyed by facet id.
///
/// Across facets constraints are conjunctive. Entries whose value is empty are kept as
/// given but never produce a filter: an empty string is the same as an absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraints(BTreeMap<String, Constraint>);

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, facet: impl Into<String>, constraint: impl Into<Constraint>) -> Self {
        self.insert(facet, constraint);
        self
    }

    pub fn insert(&mut self, facet: impl Into<String>, constraint: impl Into<Constraint>) {
        self.0.insert(facet.into(), constraint.into());
    }

    pub fn get(&self, facet: &str) -> Option<&Constraint> {
        self.0.get(facet)
    }

    /// The constraints that actually restrict the result, in facet id order.
    pub fn active(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.0
            .iter()
            .filter(|(_, constraint)| !constraint.is_empty())
            .map(|(facet, constraint)| (facet.as_str(), constraint))
    }

    /// Whether no constraint restricts the result.
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

impl<K: Into<String>, C: Into<Constraint>> FromIterator<(K, C)> for Constraints {
    fn from_iter<T: IntoIterator<Item = (K, C)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(facet, constraint)| (facet.into(), constraint.into()))
                .collect(),
        )
    }
}

/// The active filter value of one facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    #[serde(flatten)]
    pub value: ConstraintValue,
    /// For hierarchical facets: also match everything below the selected concepts.
    #[serde(default, skip_serializing_if = "is_false")]
    pub select_also_subconcepts: bool,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl Constraint {
    pub fn uris<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConstraintValue::UriFilter(uris.into_iter().map(Into::into).collect()).into()
    }

    pub fn text(text: impl Into<String>) -> Self {
        ConstraintValue::TextFilter(text.into()).into()
    }

    pub fn timespan(min: Option<TimeBound>, max: Option<TimeBound>) -> Self {
        ConstraintValue::TimespanFilter(TimespanRange { min, max }).into()
    }

    pub fn bounding_box(bounding_box: BoundingBox) -> Self {
        ConstraintValue::SpatialFilter(bounding_box).into()
    }

    #[must_use]
    pub fn with_subconcepts(mut self) -> Self {
        self.select_also_subconcepts = true;
        self
    }

    pub fn kind(&self) -> FilterType {
        self.value.kind()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<ConstraintValue> for Constraint {
    fn from(value: ConstraintValue) -> Self {
        Self {
            value,
            select_also_subconcepts: false,
        }
    }
}

/// The value of a constraint. Its shape depends on the filter type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintValue {
    UriFilter(Vec<String>),
    TextFilter(String),
    TimespanFilter(TimespanRange),
    SpatialFilter(BoundingBox),
}

impl ConstraintValue {
    pub fn kind(&self) -> FilterType {
        match self {
            ConstraintValue::UriFilter(_) => FilterType::UriFilter,
            ConstraintValue::TextFilter(_) => FilterType::TextFilter,
            ConstraintValue::TimespanFilter(_) => FilterType::TimespanFilter,
            ConstraintValue::SpatialFilter(_) => FilterType::SpatialFilter,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ConstraintValue::UriFilter(uris) => uris.iter().all(|uri| uri.trim().is_empty()),
            ConstraintValue::TextFilter(text) => text.trim().is_empty(),
            ConstraintValue::TimespanFilter(range) => {
                range.min().is_none() && range.max().is_none()
            }
            ConstraintValue::SpatialFilter(_) => false,
        }
    }
}

/// A time range. Either end may be open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimespanRange {
    #[serde(default)]
    pub min: Option<TimeBound>,
    #[serde(default)]
    pub max: Option<TimeBound>,
}

impl TimespanRange {
    pub fn new(min: impl Into<TimeBound>, max: impl Into<TimeBound>) -> Self {
        Self {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    pub fn min(&self) -> Option<&TimeBound> {
        self.min.as_ref().filter(|bound| !bound.is_blank())
    }

    pub fn max(&self) -> Option<&TimeBound> {
        self.max.as_ref().filter(|bound| !bound.is_blank())
    }
}

/// One end of a time range: a year or an ISO date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeBound {
    Year(i64),
    Text(String),
}

impl From<i64> for TimeBound {
    fn from(year: i64) -> Self {
        TimeBound::Year(year)
    }
}

impl From<&str> for TimeBound {
    fn from(text: &str) -> Self {
        TimeBound::Text(text.to_owned())
    }
}

impl TimeBound {
    fn is_blank(&self) -> bool {
        matches!(self, TimeBound::Text(text) if text.trim().is_empty())
    }

    /// The first day covered by this bound. A year starts on January 1st.
    pub fn lower_date(&self) -> Result<Date, ValidationError> {
        self.to_date("01-01")
    }

    /// The last day covered by this bound. A year ends on December 31st.
    pub fn upper_date(&self) -> Result<Date, ValidationError> {
        self.to_date("12-31")
    }

    fn to_date(&self, month_day: &str) -> Result<Date, ValidationError> {
        match self {
            TimeBound::Year(year) => year_date(*year, month_day),
            TimeBound::Text(text) => {
                let text = text.trim();
                match text.parse::<i64>() {
                    Ok(year) => year_date(year, month_day),
                    Err(_) => Date::from_str(text)
                        .map_err(|_| ValidationError::InvalidTimeBound(text.to_owned())),
                }
            }
        }
    }
}

fn year_date(year: i64, month_day: &str) -> Result<Date, ValidationError> {
    let sign = if year < 0 { "-" } else { "" };
    let lexical = format!("{sign}{:04}-{month_day}", year.unsigned_abs());
    Date::from_str(&lexical).map_err(|_| ValidationError::InvalidTimeBound(year.to_string()))
}

/// A latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub lat_min: f64,
    pub long_min: f64,
    pub lat_max: f64,
    pub long_max: f64,
}

impl BoundingBox {
    /// Checks that the box is finite, on the globe, and not inverted.
    pub fn validate(&self) -> Result<(), &'static str> {
        let corners = [self.lat_min, self.long_min, self.lat_max, self.long_max];
        if !corners.iter().all(|value| value.is_finite()) {
            return Err("coordinates must be finite numbers");
        }
        if !(-90.0..=90.0).contains(&self.lat_min) || !(-90.0..=90.0).contains(&self.lat_max) {
            return Err("latitudes must lie between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&self.long_min) || !(-180.0..=180.0).contains(&self.long_max)
        {
            return Err("longitudes must lie between -180 and 180");
        }
        if self.lat_min > self.lat_max || self.long_min > self.long_max {
            return Err("the minimum corner lies beyond the maximum corner");
        }
        Ok(())
    }
}
