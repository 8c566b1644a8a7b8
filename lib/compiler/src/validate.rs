use crate::assembler::{parse, QueryAssembler, QueryRequest};
use crate::clause::PropertyPath;
use crate::filters::facet_variable;
use facet_search_model::{
    ConfigurationError, FacetSearchError, NamedNode, Pagination, PortalSchema, ResultShape, Sort,
    SortDirection,
};

/// Checks a schema before it serves requests.
///
/// Every property path and class list must parse under the schema's prefixes, every facet id
/// must yield variable names, and every query the schema can produce must parse when no
/// constraints are given.
pub fn validate_schema(schema: &PortalSchema) -> Result<(), ConfigurationError> {
    let prefixes = schema.prefix_declarations();

    for spec in &schema.result_classes {
        probe(
            &prefixes,
            &format!("the classes of '{}'", spec.id),
            &format!("VALUES ?facetClass {{ {} }}", spec.rdf_classes.join(" ")),
            &spec.rdf_classes.join(" "),
        )?;
        for facet in &spec.facets {
            facet_variable(&facet.id, "FilterWithSubconcepts")?;
            for (name, path) in facet.paths() {
                probe(
                    &prefixes,
                    &format!("the {name} of facet '{}' of '{}'", facet.id, spec.id),
                    &format!("?s {path} ?o"),
                    path,
                )?;
            }
            if let Some(hierarchy) = &facet.hierarchy {
                let closure = PropertyPath::new(hierarchy.parent_property.as_str()).zero_or_more();
                probe(
                    &prefixes,
                    &format!("the hierarchy of facet '{}' of '{}'", facet.id, spec.id),
                    &format!("?s {closure} ?o"),
                    closure.as_str(),
                )?;
            }
        }
    }

    let assembler = QueryAssembler::new(schema).with_validation(true);
    for spec in &schema.result_classes {
        assemble(
            &assembler,
            QueryRequest::Count {
                result_class: &spec.id,
                constraints: None,
            },
        )?;
        for sort_direction in [SortDirection::Asc, SortDirection::Desc] {
            assemble(
                &assembler,
                QueryRequest::ResultSet {
                    result_class: &spec.id,
                    constraints: None,
                    pagination: Pagination::new(0, 1),
                    sort: &Sort {
                        sort_by: None,
                        sort_direction,
                    },
                },
            )?;
        }
    }

    let placeholder_id = "http://example.org/instance";
    for route in &schema.listings {
        if let Some(facet_class) = &route.facet_class {
            schema.result_class(facet_class)?;
        }
        for group_by in [false, true] {
            let query = assemble(
                &assembler,
                QueryRequest::Listing {
                    result_class: &route.result_class,
                    facet_class: None,
                    constraints: None,
                    group_by,
                },
            )?;
            if let ResultShape::Network { nodes_query } = &query.shape {
                assembler
                    .assemble_network_nodes(nodes_query, &[NamedNode::new_unchecked(placeholder_id)])?;
            }
        }
    }

    for route in &schema.lookups {
        if let Some(facet_class) = &route.facet_class {
            schema.result_class(facet_class)?;
        }
        assemble(
            &assembler,
            QueryRequest::Lookup {
                result_class: &route.result_class,
                facet_class: None,
                constraints: None,
                uri: placeholder_id,
            },
        )?;
    }

    tracing::debug!(
        result_classes = schema.result_classes.len(),
        listings = schema.listings.len(),
        lookups = schema.lookups.len(),
        "Validated portal schema"
    );
    Ok(())
}

fn probe(prefixes: &str, location: &str, pattern: &str, path: &str) -> Result<(), ConfigurationError> {
    parse(location, &format!("{prefixes}SELECT * WHERE {{ {pattern} }}"))
        .map(|_| ())
        .map_err(|error| ConfigurationError::InvalidPropertyPath {
            location: location.to_owned(),
            path: path.to_owned(),
            message: match error {
                ConfigurationError::InvalidQuery { message, .. } => message,
                other => other.to_string(),
            },
        })
}

fn assemble(
    assembler: &QueryAssembler<'_>,
    request: QueryRequest<'_>,
) -> Result<crate::AssembledQuery, ConfigurationError> {
    assembler.assemble(&request).map_err(|error| match error {
        FacetSearchError::Configuration(error) => error,
        other => ConfigurationError::InvalidQuery {
            template: request.result_class().to_owned(),
            message: other.to_string(),
        },
    })
}
