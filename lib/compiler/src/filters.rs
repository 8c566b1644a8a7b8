//! Filter generators: one pattern fragment per active facet.
//!
//! Every fragment binds the facet values to variables derived from the facet id, so fragments
//! of different facets can be conjoined without clashing.

use crate::clause::{Expression, Function, PatternElement, PropertyPath};
use facet_search_model::vocab::xsd;
use facet_search_model::{
    BoundingBox, ConfigurationError, Date, FacetConfig, Literal, NamedNode, Variable,
};

/// A validated constraint value, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Any of the given IRIs (OR semantics).
    Uris {
        uris: Vec<NamedNode>,
        include_subconcepts: bool,
    },
    /// A lowercased substring.
    Text(String),
    /// A time range, inclusive on both ends. At least one end is set.
    Timespan { min: Option<Date>, max: Option<Date> },
    Spatial(BoundingBox),
}

/// The pattern and filter clauses of one facet.
pub type Fragment = Vec<PatternElement>;

/// Generates the fragment restricting `target` by `value` on `facet`.
///
/// `facet_class` only names the facet in errors.
pub fn generate(
    facet_class: &str,
    facet: &FacetConfig,
    target: &Variable,
    value: &FilterValue,
) -> Result<Fragment, ConfigurationError> {
    let generator = FacetFilter {
        facet_class,
        facet,
        target,
    };
    match value {
        FilterValue::Uris {
            uris,
            include_subconcepts,
        } => generator.uris(uris, *include_subconcepts),
        FilterValue::Text(text) => generator.text(text),
        FilterValue::Timespan { min, max } => generator.timespan(*min, *max),
        FilterValue::Spatial(bounding_box) => generator.spatial(bounding_box),
    }
}

struct FacetFilter<'a> {
    facet_class: &'a str,
    facet: &'a FacetConfig,
    target: &'a Variable,
}

impl FacetFilter<'_> {
    fn uris(
        &self,
        uris: &[NamedNode],
        include_subconcepts: bool,
    ) -> Result<Fragment, ConfigurationError> {
        let predicate = self.predicate()?;
        let values = self.variable("Filter")?;

        if !include_subconcepts {
            return Ok(vec![
                PatternElement::triple(self.target.clone(), predicate, values.clone()),
                PatternElement::Filter(Expression::In(
                    Box::new(values.into()),
                    uris.iter().cloned().map(Expression::NamedNode).collect(),
                )),
            ]);
        }

        let parent = self
            .facet
            .hierarchy
            .as_ref()
            .ok_or_else(|| self.missing("parent property"))?;
        let subconcepts = self.variable("FilterWithSubconcepts")?;
        Ok(vec![
            PatternElement::Values {
                variable: values.clone(),
                values: uris.to_vec(),
            },
            PatternElement::triple(
                subconcepts.clone(),
                PropertyPath::new(parent.parent_property.as_str()).zero_or_more(),
                values,
            ),
            PatternElement::triple(self.target.clone(), predicate, subconcepts),
        ])
    }

    fn text(&self, text: &str) -> Result<Fragment, ConfigurationError> {
        let label_path = self
            .facet
            .label_path
            .as_deref()
            .ok_or_else(|| self.missing("label path"))?;
        let label = self.variable("Label")?;
        let lowercased = Expression::call(
            Function::LCase,
            [Expression::call(Function::Str, [label.clone().into()])],
        );
        Ok(vec![
            PatternElement::triple(self.target.clone(), PropertyPath::new(label_path), label),
            PatternElement::Filter(Expression::call(
                Function::Contains,
                [
                    lowercased,
                    Literal::new_simple_literal(text.to_lowercase()).into(),
                ],
            )),
        ])
    }

    /// Matches entities whose time-span overlaps `[min, max]`.
    ///
    /// A time-span missing one of its ends is treated as the instant given by the other end.
    fn timespan(
        &self,
        min: Option<Date>,
        max: Option<Date>,
    ) -> Result<Fragment, ConfigurationError> {
        let predicate = self.predicate()?;
        let config = self
            .facet
            .timespan
            .as_ref()
            .ok_or_else(|| self.missing("timespan start and end properties"))?;
        let span = self.variable("Timespan")?;
        let start = self.variable("Start")?;
        let end = self.variable("End")?;

        let earliest = || {
            Expression::call(
                Function::Coalesce,
                [start.clone().into(), end.clone().into()],
            )
        };
        let latest = || {
            Expression::call(
                Function::Coalesce,
                [end.clone().into(), start.clone().into()],
            )
        };
        let conditions = max
            .map(|max| earliest().less_or_equal(date_literal(max)))
            .into_iter()
            .chain(min.map(|min| latest().greater_or_equal(date_literal(min))));

        let mut fragment = vec![
            PatternElement::triple(self.target.clone(), predicate, span.clone()),
            PatternElement::Optional(vec![PatternElement::triple(
                span.clone(),
                PropertyPath::new(config.start_property.as_str()),
                start.clone(),
            )]),
            PatternElement::Optional(vec![PatternElement::triple(
                span,
                PropertyPath::new(config.end_property.as_str()),
                end.clone(),
            )]),
        ];
        if let Some(condition) = Expression::all(conditions) {
            fragment.push(PatternElement::Filter(condition));
        }
        Ok(fragment)
    }

    fn spatial(&self, bounding_box: &BoundingBox) -> Result<Fragment, ConfigurationError> {
        let config = self
            .facet
            .spatial
            .as_ref()
            .ok_or_else(|| self.missing("latitude and longitude properties"))?;
        let lat = self.variable("Lat")?;
        let long = self.variable("Long")?;

        let mut fragment = Vec::new();
        // Without a predicate the target itself carries the coordinates.
        let located = match &self.facet.predicate {
            Some(predicate) => {
                let located = self.variable("Filter")?;
                fragment.push(PatternElement::triple(
                    self.target.clone(),
                    PropertyPath::new(predicate.as_str()),
                    located.clone(),
                ));
                located
            }
            None => self.target.clone(),
        };
        fragment.push(PatternElement::triple(
            located.clone(),
            PropertyPath::new(config.lat_property.as_str()),
            lat.clone(),
        ));
        fragment.push(PatternElement::triple(
            located,
            PropertyPath::new(config.long_property.as_str()),
            long.clone(),
        ));

        let within = |variable: Variable, min: f64, max: f64| {
            let cast = || Expression::Cast(xsd::DOUBLE.into_owned(), Box::new(variable.clone().into()));
            cast()
                .greater_or_equal(Literal::from(min).into())
                .and(cast().less_or_equal(Literal::from(max).into()))
        };
        fragment.push(PatternElement::Filter(
            within(lat, bounding_box.lat_min, bounding_box.lat_max).and(within(
                long,
                bounding_box.long_min,
                bounding_box.long_max,
            )),
        ));
        Ok(fragment)
    }

    fn predicate(&self) -> Result<PropertyPath, ConfigurationError> {
        self.facet
            .predicate
            .as_deref()
            .map(PropertyPath::new)
            .ok_or_else(|| ConfigurationError::MissingPredicate {
                facet_class: self.facet_class.to_owned(),
                facet: self.facet.id.clone(),
            })
    }

    fn variable(&self, suffix: &str) -> Result<Variable, ConfigurationError> {
        facet_variable(&self.facet.id, suffix)
    }

    fn missing(&self, property: &'static str) -> ConfigurationError {
        ConfigurationError::MissingFacetProperty {
            facet_class: self.facet_class.to_owned(),
            facet: self.facet.id.clone(),
            property,
        }
    }
}

/// The variable `?{facet_id}{suffix}`.
pub fn facet_variable(facet_id: &str, suffix: &str) -> Result<Variable, ConfigurationError> {
    Variable::new(format!("{facet_id}{suffix}"))
        .map_err(|_| ConfigurationError::InvalidVariableName(facet_id.to_owned()))
}

fn date_literal(date: Date) -> Expression {
    Literal::new_typed_literal(date.to_string(), xsd::DATE).into()
}
