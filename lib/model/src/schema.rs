use crate::error::ConfigurationError;
use crate::facet::FacetConfig;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A `PREFIX` declaration shared by every query of a portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefix {
    pub name: String,
    pub iri: String,
}

impl Prefix {
    pub fn new(name: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iri: iri.into(),
        }
    }
}

/// Everything the compiler needs to know about one result class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultClassSpec {
    pub id: String,
    /// Instances of any of these classes are counted and listed.
    pub rdf_classes: Vec<String>,
    /// Patterns projecting the columns of the paginated result table. They bind `?id`.
    #[serde(default)]
    pub result_set_properties: String,
    /// Sort key used when a paginated request does not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort_by: Option<String>,
    #[serde(default)]
    pub facets: Vec<FacetConfig>,
}

impl ResultClassSpec {
    pub fn new<I, S>(id: impl Into<String>, rdf_classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            rdf_classes: rdf_classes.into_iter().map(Into::into).collect(),
            result_set_properties: String::new(),
            default_sort_by: None,
            facets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_result_set_properties(mut self, properties: impl Into<String>) -> Self {
        self.result_set_properties = properties.into();
        self
    }

    #[must_use]
    pub fn with_default_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.default_sort_by = Some(sort_by.into());
        self
    }

    #[must_use]
    pub fn with_facet(mut self, facet: FacetConfig) -> Self {
        self.facets.push(facet);
        self
    }

    pub fn facet(&self, id: &str) -> Option<&FacetConfig> {
        self.facets.iter().find(|facet| facet.id == id)
    }

    /// Looks up a facet, failing with a configuration error if it is unknown.
    pub fn require_facet(&self, id: &str) -> Result<&FacetConfig, ConfigurationError> {
        self.facet(id).ok_or_else(|| ConfigurationError::UnknownFacet {
            facet_class: self.id.clone(),
            facet: id.to_owned(),
        })
    }
}

/// How the rows of a query are turned into a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultShape {
    /// A single row with a `count` column.
    Count,
    /// Rows grouped by `id` into objects.
    Objects,
    /// One place with coordinates per row.
    Places,
    /// Bare coordinates, one per row.
    Coordinates,
    /// Link rows. A second query fetches the nodes the links connect.
    #[serde(rename_all = "camelCase")]
    Network {
        /// Query over the node ids. Contains the `<ID_SET>` placeholder.
        nodes_query: String,
    },
}

/// The query text of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListingQuery {
    /// A template with a `<FILTER>` placeholder.
    Static(String),
    /// A template with `<FILTER>` and `<PERIODS>` placeholders, where `<PERIODS>` is replaced
    /// by one `VALUES` row per time bucket.
    #[serde(rename_all = "camelCase")]
    TimeBuckets {
        template: String,
        start_year: i32,
        end_year: i32,
        period_length: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingVariant {
    pub query: ListingQuery,
    pub shape: ResultShape,
}

/// An unpaginated listing registered for a result class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRoute {
    pub result_class: String,
    /// The result class whose facets interpret the constraints when the request names none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_class: Option<String>,
    /// The variable constraints are bound to.
    pub filter_target: String,
    pub variant: ListingVariant,
    /// Used instead of `variant` when the caller asks for grouped results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouped: Option<ListingVariant>,
}

impl ListingRoute {
    pub fn new(
        result_class: impl Into<String>,
        filter_target: impl Into<String>,
        query: ListingQuery,
        shape: ResultShape,
    ) -> Self {
        Self {
            result_class: result_class.into(),
            facet_class: None,
            filter_target: filter_target.into(),
            variant: ListingVariant { query, shape },
            grouped: None,
        }
    }

    #[must_use]
    pub fn with_facet_class(mut self, facet_class: impl Into<String>) -> Self {
        self.facet_class = Some(facet_class.into());
        self
    }

    #[must_use]
    pub fn with_grouped(mut self, query: ListingQuery, shape: ResultShape) -> Self {
        self.grouped = Some(ListingVariant { query, shape });
        self
    }

    /// Picks the variant for the `group_by` flag. Routes without a grouped variant ignore it.
    pub fn variant(&self, group_by: bool) -> &ListingVariant {
        match (&self.grouped, group_by) {
            (Some(grouped), true) => grouped,
            _ => &self.variant,
        }
    }
}

/// The single-entity page of a result class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRoute {
    pub result_class: String,
    /// The result class whose facets interpret the constraints when the request names none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_class: Option<String>,
    /// Patterns projecting the properties of `?id`.
    pub properties: String,
    /// Patterns binding entities related to `?id`. They expose `?related__id` and contain the
    /// `<FILTER>` placeholder.
    #[serde(default)]
    pub related_instances: String,
}

impl LookupRoute {
    pub fn new(result_class: impl Into<String>, properties: impl Into<String>) -> Self {
        Self {
            result_class: result_class.into(),
            facet_class: None,
            properties: properties.into(),
            related_instances: String::new(),
        }
    }

    #[must_use]
    pub fn with_facet_class(mut self, facet_class: impl Into<String>) -> Self {
        self.facet_class = Some(facet_class.into());
        self
    }

    #[must_use]
    pub fn with_related_instances(mut self, related_instances: impl Into<String>) -> Self {
        self.related_instances = related_instances.into();
        self
    }
}

/// The complete, immutable description of a faceted search portal.
///
/// A schema is built once at startup and shared read-only between requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalSchema {
    pub prefixes: Vec<Prefix>,
    pub result_classes: Vec<ResultClassSpec>,
    #[serde(default)]
    pub listings: Vec<ListingRoute>,
    #[serde(default)]
    pub lookups: Vec<LookupRoute>,
}

impl PortalSchema {
    /// Reads a schema from its JSON serialization.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, ConfigurationError> {
        serde_json::from_reader(reader).map_err(|error| ConfigurationError::Schema(Box::new(error)))
    }

    pub fn result_class(&self, id: &str) -> Result<&ResultClassSpec, ConfigurationError> {
        self.result_classes
            .iter()
            .find(|spec| spec.id == id)
            .ok_or_else(|| ConfigurationError::UnknownResultClass(id.to_owned()))
    }

    pub fn listing(&self, result_class: &str) -> Result<&ListingRoute, ConfigurationError> {
        self.listings
            .iter()
            .find(|route| route.result_class == result_class)
            .ok_or_else(|| ConfigurationError::UnknownListing(result_class.to_owned()))
    }

    pub fn lookup(&self, result_class: &str) -> Result<&LookupRoute, ConfigurationError> {
        self.lookups
            .iter()
            .find(|route| route.result_class == result_class)
            .ok_or_else(|| ConfigurationError::UnknownLookup(result_class.to_owned()))
    }

    /// The `PREFIX` lines prepended to every query.
    pub fn prefix_declarations(&self) -> String {
        self.prefixes
            .iter()
            .map(|prefix| format!("PREFIX {}: <{}>\n", prefix.name, prefix.iri))
            .collect()
    }
}
