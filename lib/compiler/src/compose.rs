use crate::clause::PatternElement;
use crate::filters::{generate, FilterValue};
use facet_search_model::{
    ConfigurationError, Constraint, ConstraintValue, Constraints, FacetConfig, FacetSearchResult,
    NamedNode, PortalSchema, ValidationError, Variable,
};
use itertools::Itertools;
use std::fmt;

/// The conjunction of the fragments of all active facets of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintBlock {
    elements: Vec<PatternElement>,
}

impl ConstraintBlock {
    /// The block of a request without constraints. Renders as a comment.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }
}

impl fmt::Display for ConstraintBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            return f.write_str("# no filters");
        }
        write!(f, "{}", self.elements.iter().join("\n"))
    }
}

/// Composes the constraint block binding `constraints` to `?{filter_target}`.
///
/// The facets are looked up in `facet_class`. Constraints on different facets are conjoined.
/// Without any active constraint the schema is not consulted at all.
pub fn compose(
    schema: &PortalSchema,
    facet_class: &str,
    constraints: Option<&Constraints>,
    filter_target: &str,
) -> FacetSearchResult<ConstraintBlock> {
    let Some(constraints) = constraints.filter(|constraints| !constraints.is_empty()) else {
        return Ok(ConstraintBlock::empty());
    };

    let spec = schema.result_class(facet_class)?;
    let target = Variable::new(filter_target)
        .map_err(|_| ConfigurationError::InvalidVariableName(filter_target.to_owned()))?;

    let mut elements = Vec::new();
    for (facet_id, constraint) in constraints.active() {
        let facet = spec.require_facet(facet_id)?;
        let value = filter_value(facet, constraint)?;
        elements.extend(generate(facet_class, facet, &target, &value)?);
    }
    Ok(ConstraintBlock { elements })
}

/// Checks a constraint against its facet and normalizes its value.
fn filter_value(
    facet: &FacetConfig,
    constraint: &Constraint,
) -> Result<FilterValue, ValidationError> {
    if !facet.accepts(constraint.kind()) {
        return Err(ValidationError::FilterTypeMismatch {
            facet: facet.id.clone(),
            expected: facet.filter_type.as_str(),
            actual: constraint.kind().as_str(),
        });
    }

    Ok(match &constraint.value {
        ConstraintValue::UriFilter(uris) => FilterValue::Uris {
            uris: uris
                .iter()
                .map(|uri| uri.trim())
                .filter(|uri| !uri.is_empty())
                .map(|uri| {
                    NamedNode::new(uri).map_err(|error| ValidationError::InvalidIri {
                        iri: uri.to_owned(),
                        error,
                    })
                })
                .collect::<Result<_, _>>()?,
            include_subconcepts: constraint.select_also_subconcepts,
        },
        ConstraintValue::TextFilter(text) => FilterValue::Text(text.trim().to_lowercase()),
        ConstraintValue::TimespanFilter(range) => {
            let min = range.min().map(|min| min.lower_date()).transpose()?;
            let max = range.max().map(|max| max.upper_date()).transpose()?;
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(ValidationError::InvertedTimeRange {
                        facet: facet.id.clone(),
                        min: min.to_string(),
                        max: max.to_string(),
                    });
                }
            }
            FilterValue::Timespan { min, max }
        }
        ConstraintValue::SpatialFilter(bounding_box) => {
            bounding_box
                .validate()
                .map_err(|reason| ValidationError::InvalidBoundingBox {
                    facet: facet.id.clone(),
                    reason,
                })?;
            FilterValue::Spatial(*bounding_box)
        }
    })
}
