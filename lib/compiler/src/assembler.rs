use crate::compose::{compose, ConstraintBlock};
use crate::templates::{Placeholder, Template, COUNT_QUERY, INSTANCE_QUERY, RESULT_SET_QUERY};
use facet_search_model::vocab::xsd;
use facet_search_model::{
    ConfigurationError, Constraints, Date, FacetSearchResult, ListingQuery, Literal, NamedNode,
    Pagination, PortalSchema, ResultClassSpec, ResultShape, Sort, SortDirection, TimeBound,
    ValidationError,
};
use itertools::Itertools;
use spargebra::Query;

/// The filter target of count and result set queries.
const ID: &str = "id";
/// The filter target of the related instances of a lookup.
const RELATED_ID: &str = "related__id";

/// One of the queries the dispatcher can run.
#[derive(Debug, Clone, Copy)]
pub enum QueryRequest<'a> {
    /// Number of instances of the result class satisfying the constraints.
    Count {
        result_class: &'a str,
        constraints: Option<&'a Constraints>,
    },
    /// One sorted page of the result class.
    ResultSet {
        result_class: &'a str,
        constraints: Option<&'a Constraints>,
        pagination: Pagination,
        sort: &'a Sort,
    },
    /// The unpaginated listing registered for the result class.
    Listing {
        result_class: &'a str,
        facet_class: Option<&'a str>,
        constraints: Option<&'a Constraints>,
        group_by: bool,
    },
    /// A single entity and its related instances.
    Lookup {
        result_class: &'a str,
        facet_class: Option<&'a str>,
        constraints: Option<&'a Constraints>,
        uri: &'a str,
    },
}

impl QueryRequest<'_> {
    pub fn result_class(&self) -> &str {
        match self {
            QueryRequest::Count { result_class, .. }
            | QueryRequest::ResultSet { result_class, .. }
            | QueryRequest::Listing { result_class, .. }
            | QueryRequest::Lookup { result_class, .. } => result_class,
        }
    }
}

/// A complete query together with the shape its rows are mapped into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledQuery {
    pub text: String,
    pub shape: ResultShape,
}

/// Fills the templates of a [`PortalSchema`] into complete queries.
#[derive(Debug, Clone, Copy)]
pub struct QueryAssembler<'a> {
    schema: &'a PortalSchema,
    validate: bool,
}

impl<'a> QueryAssembler<'a> {
    pub fn new(schema: &'a PortalSchema) -> Self {
        Self {
            schema,
            validate: false,
        }
    }

    /// Parses every assembled query before handing it out.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn assemble(&self, request: &QueryRequest<'_>) -> FacetSearchResult<AssembledQuery> {
        let (name, body, shape) = match *request {
            QueryRequest::Count {
                result_class,
                constraints,
            } => {
                let spec = self.schema.result_class(result_class)?;
                let body = Template::new("count", COUNT_QUERY)
                    .fill(Placeholder::FacetClass, &facet_classes(spec))
                    .fill(
                        Placeholder::Filter,
                        &self.block(result_class, constraints, ID)?.to_string(),
                    )
                    .finish()?;
                ("count", body, ResultShape::Count)
            }
            QueryRequest::ResultSet {
                result_class,
                constraints,
                pagination,
                sort,
            } => {
                let spec = self.schema.result_class(result_class)?;
                let (limit, offset) = pagination.window()?;
                let (order_by_triple, order_by) = order_by(spec, sort)?;
                let body = Template::new("result set", RESULT_SET_QUERY)
                    .fill(
                        Placeholder::Filter,
                        &self.block(result_class, constraints, ID)?.to_string(),
                    )
                    .fill(Placeholder::FacetClass, &facet_classes(spec))
                    .fill(Placeholder::OrderByAggregate, order_by_aggregate(sort))
                    .fill(Placeholder::OrderByTriple, &order_by_triple)
                    .fill(Placeholder::OrderBy, &order_by)
                    .fill(Placeholder::Page, &format!("LIMIT {limit} OFFSET {offset}"))
                    .fill(Placeholder::ResultSetProperties, &spec.result_set_properties)
                    .finish()?;
                ("result set", body, ResultShape::Objects)
            }
            QueryRequest::Listing {
                result_class,
                facet_class,
                constraints,
                group_by,
            } => {
                let route = self.schema.listing(result_class)?;
                let variant = route.variant(group_by);
                let facet_class = facet_class
                    .or(route.facet_class.as_deref())
                    .unwrap_or(result_class);
                let template = match &variant.query {
                    ListingQuery::Static(text) => Template::new(result_class, text),
                    ListingQuery::TimeBuckets {
                        template,
                        start_year,
                        end_year,
                        period_length,
                    } => Template::new(result_class, template).fill(
                        Placeholder::Periods,
                        &time_buckets(result_class, *start_year, *end_year, *period_length)?,
                    ),
                };
                let body = self
                    .fill_filter(template, facet_class, constraints, &route.filter_target)?
                    .finish()?;
                ("listing", body, variant.shape.clone())
            }
            QueryRequest::Lookup {
                result_class,
                facet_class,
                constraints,
                uri,
            } => {
                let route = self.schema.lookup(result_class)?;
                let id = NamedNode::new(uri).map_err(|error| ValidationError::InvalidIri {
                    iri: uri.to_owned(),
                    error,
                })?;
                let facet_class = facet_class
                    .or(route.facet_class.as_deref())
                    .unwrap_or(result_class);
                let template = Template::new(result_class, INSTANCE_QUERY)
                    .fill(Placeholder::Properties, &route.properties)
                    .fill(Placeholder::RelatedInstances, &route.related_instances);
                let body = self
                    .fill_filter(template, facet_class, constraints, RELATED_ID)?
                    .fill(Placeholder::Id, &id.to_string())
                    .finish()?;
                ("instance", body, ResultShape::Objects)
            }
        };

        let text = self.finish(name, &body)?;
        tracing::debug!(
            result_class = request.result_class(),
            query = %text,
            "Assembled {name} query"
        );
        Ok(AssembledQuery { text, shape })
    }

    /// Assembles the query fetching the nodes of a network listing.
    pub fn assemble_network_nodes(
        &self,
        nodes_query: &str,
        ids: &[NamedNode],
    ) -> Result<String, ConfigurationError> {
        let body = Template::new("network nodes", nodes_query)
            .fill(Placeholder::IdSet, &ids.iter().join(" "))
            .finish()?;
        self.finish("network nodes", &body)
    }

    /// Composes the constraint block and fills it in where the template filters.
    ///
    /// The constraints are checked even if the template has no `<FILTER>`.
    fn fill_filter(
        &self,
        template: Template,
        facet_class: &str,
        constraints: Option<&Constraints>,
        filter_target: &str,
    ) -> FacetSearchResult<Template> {
        let block = self.block(facet_class, constraints, filter_target)?;
        Ok(template.fill(Placeholder::Filter, &block.to_string()))
    }

    fn block(
        &self,
        facet_class: &str,
        constraints: Option<&Constraints>,
        filter_target: &str,
    ) -> FacetSearchResult<ConstraintBlock> {
        compose(self.schema, facet_class, constraints, filter_target)
    }

    fn finish(&self, name: &str, body: &str) -> Result<String, ConfigurationError> {
        let text = format!("{}{body}", self.schema.prefix_declarations());
        if self.validate {
            parse(name, &text)?;
        }
        Ok(text)
    }
}

/// Parses a query, turning syntax errors into configuration errors.
pub(crate) fn parse(name: &str, text: &str) -> Result<Query, ConfigurationError> {
    Query::parse(text, None).map_err(|error| ConfigurationError::InvalidQuery {
        template: name.to_owned(),
        message: error.to_string(),
    })
}

fn facet_classes(spec: &ResultClassSpec) -> String {
    spec.rdf_classes.join(" ")
}

/// Ascending pages sort an entity by its smallest value, descending pages by its largest.
fn order_by_aggregate(sort: &Sort) -> &'static str {
    match sort.sort_direction {
        SortDirection::Asc => "MIN",
        SortDirection::Desc => "MAX",
    }
}

/// Resolves the sort key into the optional triple binding `?orderByValue` and the order clause.
///
/// Ties and unsorted requests are ordered by `?id` so that pages are stable.
fn order_by(spec: &ResultClassSpec, sort: &Sort) -> Result<(String, String), ConfigurationError> {
    let Some(sort_by) = sort.sort_by.as_deref().or(spec.default_sort_by.as_deref()) else {
        return Ok((String::new(), "ORDER BY ?id".to_owned()));
    };
    let facet = spec
        .facet(sort_by)
        .ok_or_else(|| ConfigurationError::UnknownSortKey {
            result_class: spec.id.clone(),
            sort_by: sort_by.to_owned(),
        })?;
    let missing = |property| ConfigurationError::MissingFacetProperty {
        facet_class: spec.id.clone(),
        facet: facet.id.clone(),
        property,
    };

    let path = if sort_by.ends_with("Timespan") {
        let timespan = facet.timespan.as_ref();
        match sort.sort_direction {
            SortDirection::Asc => timespan
                .and_then(|timespan| timespan.sort_by_asc_predicate.as_deref())
                .ok_or_else(|| missing("ascending sort predicate"))?,
            SortDirection::Desc => timespan
                .and_then(|timespan| timespan.sort_by_desc_predicate.as_deref())
                .ok_or_else(|| missing("descending sort predicate"))?,
        }
    } else {
        facet
            .label_path
            .as_deref()
            .ok_or_else(|| missing("label path"))?
    };

    Ok((
        format!("OPTIONAL {{ ?id {path} ?orderByValue }}"),
        format!(
            "ORDER BY (!BOUND(?orderBy)) {}(?orderBy) ?id",
            sort.sort_direction.keyword()
        ),
    ))
}

/// One `VALUES` row `(?period ?periodStart ?periodEnd)` per bucket of `period_length` years,
/// starting at `start_year` and covering `end_year`.
fn time_buckets(
    name: &str,
    start_year: i32,
    end_year: i32,
    period_length: u32,
) -> Result<String, ConfigurationError> {
    let invalid = |message: String| ConfigurationError::InvalidQuery {
        template: name.to_owned(),
        message,
    };
    let step = usize::try_from(period_length)
        .ok()
        .filter(|step| *step > 0)
        .ok_or_else(|| invalid("the period length must be positive".to_owned()))?;
    let date = |date: Result<Date, ValidationError>| {
        date.map(|date| Literal::new_typed_literal(date.to_string(), xsd::DATE))
            .map_err(|error| invalid(error.to_string()))
    };

    let rows = (i64::from(start_year)..=i64::from(end_year))
        .step_by(step)
        .map(|start| {
            let end = start + i64::from(period_length) - 1;
            Ok(format!(
                "({} {} {})",
                Literal::new_simple_literal(format!("{start}-{end}")),
                date(TimeBound::Year(start).lower_date())?,
                date(TimeBound::Year(end).upper_date())?,
            ))
        })
        .collect::<Result<Vec<_>, ConfigurationError>>()?;
    Ok(format!(
        "VALUES (?period ?periodStart ?periodEnd) {{\n  {}\n}}",
        rows.join("\n  ")
    ))
}
