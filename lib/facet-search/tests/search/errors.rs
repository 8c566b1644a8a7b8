use crate::test_utils::{search, search_with, CannedExecutor, FailingExecutor, PLACE};
use facet_search::model::{
    ConfigurationError, Constraint, Constraints, ErrorKind, ExecutionError, FacetSearchError,
    MappingError, Pagination, Sort, ValidationError,
};
use std::error::Error;

#[tokio::test]
async fn unknown_result_class_is_not_retryable() -> Result<(), Box<dyn Error>> {
    let error = search()?
        .result_count("books", None)
        .await
        .err()
        .ok_or("books were counted")?;
    assert!(matches!(
        error,
        FacetSearchError::Configuration(ConfigurationError::UnknownResultClass(_))
    ));
    assert!(!error.is_retryable());
    Ok(())
}

#[tokio::test]
async fn invalid_requests_are_rejected_before_execution() -> Result<(), Box<dyn Error>> {
    // Every query would fail with an execution error.
    let search = search_with(FailingExecutor::new("")?);

    let empty_page = search
        .paginated_results("events", Pagination::new(0, 0), None, &Sort::default())
        .await;
    assert!(matches!(
        empty_page,
        Err(FacetSearchError::Validation(ValidationError::EmptyPage))
    ));

    let mismatch = Constraints::new().with("place", Constraint::text("Paris"));
    let count = search.result_count("events", Some(&mismatch)).await;
    assert!(matches!(
        count,
        Err(FacetSearchError::Validation(
            ValidationError::FilterTypeMismatch { .. }
        ))
    ));

    let lookup = search
        .instance_by_uri("places", None, None, "not an iri")
        .await;
    assert!(matches!(
        lookup,
        Err(FacetSearchError::Validation(ValidationError::InvalidIri { .. }))
    ));

    let unknown_facet = Constraints::new().with("shelfmark", Constraint::text("MS 1"));
    let count = search.result_count("manuscripts", Some(&unknown_facet)).await;
    assert_eq!(
        count.err().map(|error| error.kind()),
        Some(ErrorKind::Configuration)
    );
    Ok(())
}

#[tokio::test]
async fn lookup_constraints_are_checked_without_related_instances() -> Result<(), Box<dyn Error>> {
    // The places lookup has no related instances to filter, every query would still fail.
    let search = search_with(FailingExecutor::new("")?);
    let paris = format!("{PLACE}paris");

    let invalid_iri = Constraints::new().with("area", Constraint::uris(["not an iri"]));
    let lookup = search
        .instance_by_uri("places", None, Some(&invalid_iri), &paris)
        .await;
    assert!(matches!(
        lookup,
        Err(FacetSearchError::Validation(ValidationError::InvalidIri { .. }))
    ));

    let mismatch = Constraints::new().with("prefLabel", Constraint::uris([&paris]));
    let lookup = search
        .instance_by_uri("places", None, Some(&mismatch), &paris)
        .await;
    assert!(matches!(
        lookup,
        Err(FacetSearchError::Validation(
            ValidationError::FilterTypeMismatch { .. }
        ))
    ));

    let unknown_facet = Constraints::new().with("noSuchFacet", Constraint::text("x"));
    let lookup = search
        .instance_by_uri("placesAll", None, Some(&unknown_facet), &paris)
        .await;
    assert_eq!(
        lookup.err().map(|error| error.kind()),
        Some(ErrorKind::Configuration)
    );
    Ok(())
}

#[tokio::test]
async fn executor_failures_are_retryable() -> Result<(), Box<dyn Error>> {
    let search = search_with(FailingExecutor::new("COUNT")?);
    let paris = Constraints::new().with("place", Constraint::uris([format!("{PLACE}paris")]));
    let error = search
        .result_count("events", Some(&paris))
        .await
        .err()
        .ok_or("the count succeeded")?;
    assert!(matches!(
        error,
        FacetSearchError::Execution(ExecutionError::Timeout { .. })
    ));
    assert!(error.is_retryable());
    Ok(())
}

#[tokio::test]
async fn network_fails_if_the_nodes_query_fails() -> Result<(), Box<dyn Error>> {
    let search = search_with(FailingExecutor::new("VALUES ?id")?);
    let result = search
        .all_results("manuscriptsNetwork", None, None, false)
        .await;
    assert!(matches!(result, Err(FacetSearchError::Execution(_))));
    Ok(())
}

#[tokio::test]
async fn network_fails_if_the_links_query_fails() -> Result<(), Box<dyn Error>> {
    let search = search_with(FailingExecutor::new("?weight")?);
    let result = search
        .all_results("manuscriptsNetwork", None, None, false)
        .await;
    assert!(matches!(result, Err(FacetSearchError::Execution(_))));
    Ok(())
}

#[tokio::test]
async fn unexpected_rows_are_mapping_errors() {
    let search = search_with(CannedExecutor(
        r#"{
            "head": { "vars": ["total"] },
            "results": { "bindings": [ { "total": { "type": "literal", "value": "3" } } ] }
        }"#,
    ));
    let result = search.result_count("events", None).await;
    assert!(matches!(
        result,
        Err(FacetSearchError::Mapping(MappingError::MissingColumn {
            column: "count",
            row: 0
        }))
    ));
}

#[tokio::test]
async fn boolean_answers_are_execution_errors() {
    let search = search_with(CannedExecutor(r#"{ "head": {}, "boolean": false }"#));
    let result = search
        .paginated_results("events", Pagination::new(0, 10), None, &Sort::default())
        .await;
    assert!(matches!(
        result,
        Err(FacetSearchError::Execution(ExecutionError::NotSolutions(_)))
    ));
}
