use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of constraint a facet produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    /// Membership in a set of selected IRIs.
    UriFilter,
    /// Case-insensitive substring match on a label.
    TextFilter,
    /// Overlap with a time range.
    TimespanFilter,
    /// Containment in a bounding box.
    SpatialFilter,
}

impl FilterType {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::UriFilter => "uriFilter",
            FilterType::TextFilter => "textFilter",
            FilterType::TimespanFilter => "timespanFilter",
            FilterType::SpatialFilter => "spatialFilter",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a single facet.
///
/// All paths are SPARQL property paths that may use the prefixes declared in the
/// [`PortalSchema`](crate::PortalSchema). They start at the variable the facet filters
/// (the *filter target*).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetConfig {
    pub id: String,
    pub filter_type: FilterType,
    /// Path from the filter target to the facet values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    /// Path from the filter target to a label. Used by text filters and sorting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<HierarchyConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timespan: Option<TimespanConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialConfig>,
    /// Display order in the facet bar. Lower comes first.
    #[serde(default)]
    pub priority: u32,
}

/// The facet values form a hierarchy, e.g. places that fall within other places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyConfig {
    /// Path from a concept to its direct broader concept.
    pub parent_property: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimespanConfig {
    /// Path from the time-span node to its start date.
    pub start_property: String,
    /// Path from the time-span node to its end date.
    pub end_property: String,
    /// Path from the entity to the value used when sorting ascending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by_asc_predicate: Option<String>,
    /// Path from the entity to the value used when sorting descending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by_desc_predicate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialConfig {
    pub lat_property: String,
    pub long_property: String,
}

impl FacetConfig {
    /// Creates a facet of the given type without any paths.
    pub fn new(id: impl Into<String>, filter_type: FilterType) -> Self {
        Self {
            id: id.into(),
            filter_type,
            predicate: None,
            label_path: None,
            hierarchy: None,
            timespan: None,
            spatial: None,
            priority: 0,
        }
    }

    pub fn uri(id: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self::new(id, FilterType::UriFilter).with_predicate(predicate)
    }

    pub fn text(id: impl Into<String>, label_path: impl Into<String>) -> Self {
        Self::new(id, FilterType::TextFilter).with_label_path(label_path)
    }

    pub fn timespan(
        id: impl Into<String>,
        predicate: impl Into<String>,
        start_property: impl Into<String>,
        end_property: impl Into<String>,
    ) -> Self {
        let mut facet = Self::new(id, FilterType::TimespanFilter).with_predicate(predicate);
        facet.timespan = Some(TimespanConfig {
            start_property: start_property.into(),
            end_property: end_property.into(),
            sort_by_asc_predicate: None,
            sort_by_desc_predicate: None,
        });
        facet
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    #[must_use]
    pub fn with_label_path(mut self, label_path: impl Into<String>) -> Self {
        self.label_path = Some(label_path.into());
        self
    }

    #[must_use]
    pub fn with_hierarchy(mut self, parent_property: impl Into<String>) -> Self {
        self.hierarchy = Some(HierarchyConfig {
            parent_property: parent_property.into(),
        });
        self
    }

    #[must_use]
    pub fn with_spatial(
        mut self,
        lat_property: impl Into<String>,
        long_property: impl Into<String>,
    ) -> Self {
        self.spatial = Some(SpatialConfig {
            lat_property: lat_property.into(),
            long_property: long_property.into(),
        });
        self
    }

    /// Sets the direction-specific sort paths. Only has an effect on timespan facets.
    #[must_use]
    pub fn with_timespan_sort(
        mut self,
        asc_predicate: impl Into<String>,
        desc_predicate: impl Into<String>,
    ) -> Self {
        if let Some(timespan) = &mut self.timespan {
            timespan.sort_by_asc_predicate = Some(asc_predicate.into());
            timespan.sort_by_desc_predicate = Some(desc_predicate.into());
        }
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether a constraint of the given kind may be placed on this facet.
    ///
    /// Place facets are declared as URI facets but also accept a bounding box when they
    /// know where to find coordinates.
    pub fn accepts(&self, kind: FilterType) -> bool {
        kind == self.filter_type || (kind == FilterType::SpatialFilter && self.spatial.is_some())
    }

    pub fn is_hierarchical(&self) -> bool {
        self.hierarchy.is_some()
    }

    /// Every property path this facet configures, paired with a name for error messages.
    pub fn paths(&self) -> Vec<(&'static str, &str)> {
        let mut paths = Vec::new();
        if let Some(predicate) = &self.predicate {
            paths.push(("predicate", predicate.as_str()));
        }
        if let Some(label_path) = &self.label_path {
            paths.push(("label path", label_path.as_str()));
        }
        if let Some(hierarchy) = &self.hierarchy {
            paths.push(("parent property", hierarchy.parent_property.as_str()));
        }
        if let Some(timespan) = &self.timespan {
            paths.push(("start property", timespan.start_property.as_str()));
            paths.push(("end property", timespan.end_property.as_str()));
            if let Some(asc) = &timespan.sort_by_asc_predicate {
                paths.push(("ascending sort predicate", asc.as_str()));
            }
            if let Some(desc) = &timespan.sort_by_desc_predicate {
                paths.push(("descending sort predicate", desc.as_str()));
            }
        }
        if let Some(spatial) = &self.spatial {
            paths.push(("latitude property", spatial.lat_property.as_str()));
            paths.push(("longitude property", spatial.long_property.as_str()));
        }
        paths
    }
}
