use crate::test_utils::{search, EVENT, PLACE};
use facet_search::model::{
    BoundingBox, Constraint, Constraints, PaginatedResults, Pagination, Record, Sort,
    SortDirection, TimeBound,
};
use std::error::Error;

fn ids(results: &PaginatedResults) -> Vec<&str> {
    results.data.iter().filter_map(Record::id).collect()
}

fn events(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| format!("{EVENT}{name}")).collect()
}

async fn count(constraints: &Constraints) -> Result<u64, Box<dyn Error>> {
    Ok(search()?
        .result_count("events", Some(constraints))
        .await?
        .count)
}

#[tokio::test]
async fn counts_all_events_without_constraints() -> Result<(), Box<dyn Error>> {
    let result = search()?.result_count("events", None).await?;
    assert_eq!(result.result_class, "events");
    assert_eq!(result.count, 5);
    assert!(result.sparql_query.contains("# no filters"));
    Ok(())
}

#[tokio::test]
async fn empty_constraints_behave_like_none() -> Result<(), Box<dyn Error>> {
    let search = search()?;
    let blank = Constraints::new()
        .with("prefLabel", Constraint::text("  "))
        .with("place", Constraint::uris([""]));
    let unfiltered = search.result_count("events", None).await?;
    let empty = search.result_count("events", Some(&Constraints::new())).await?;
    let blanks = search.result_count("events", Some(&blank)).await?;
    assert_eq!(unfiltered, empty);
    assert_eq!(unfiltered, blanks);
    Ok(())
}

#[tokio::test]
async fn uri_filter_matches_selected_places() -> Result<(), Box<dyn Error>> {
    let paris = format!("{PLACE}paris");
    let london = format!("{PLACE}london");
    let france = format!("{PLACE}france");
    assert_eq!(count(&Constraints::new().with("place", Constraint::uris([&paris]))).await?, 2);
    assert_eq!(
        count(&Constraints::new().with("place", Constraint::uris([&paris, &london]))).await?,
        3
    );
    assert_eq!(count(&Constraints::new().with("place", Constraint::uris([&france]))).await?, 1);
    Ok(())
}

#[tokio::test]
async fn subconcepts_include_narrower_places() -> Result<(), Box<dyn Error>> {
    let france = Constraint::uris([format!("{PLACE}france")]).with_subconcepts();
    assert_eq!(count(&Constraints::new().with("place", france)).await?, 4);
    Ok(())
}

#[tokio::test]
async fn timespan_filter_matches_overlapping_events() -> Result<(), Box<dyn Error>> {
    let search = search()?;
    let constraints = Constraints::new().with(
        "eventTimespan",
        Constraint::timespan(Some(TimeBound::Year(1600)), Some(TimeBound::Year(1620))),
    );
    let page = search
        .paginated_results("events", Pagination::new(0, 10), Some(&constraints), &Sort::default())
        .await?;
    // Only a start in range, or a range that overlaps the lower bound. An end before 1600 does not.
    assert_eq!(ids(&page), events(&["production_lyon", "sale_paris"]));
    Ok(())
}

#[tokio::test]
async fn constraints_of_different_facets_are_conjunctive() -> Result<(), Box<dyn Error>> {
    let constraints = Constraints::new()
        .with("place", Constraint::uris([format!("{PLACE}france")]).with_subconcepts())
        .with(
            "eventTimespan",
            Constraint::timespan(Some(TimeBound::Year(1600)), Some(TimeBound::Year(1620))),
        )
        .with("manuscript", Constraint::text("GOSP"));
    assert_eq!(count(&constraints).await?, 1);
    Ok(())
}

#[tokio::test]
async fn spatial_filter_matches_places_in_the_box() -> Result<(), Box<dyn Error>> {
    let around_paris = BoundingBox {
        lat_min: 48.0,
        long_min: 2.0,
        lat_max: 49.5,
        long_max: 3.0,
    };
    let constraints = Constraints::new().with("place", Constraint::bounding_box(around_paris));
    assert_eq!(count(&constraints).await?, 2);
    Ok(())
}

#[tokio::test]
async fn unsorted_pages_fall_back_to_labels() -> Result<(), Box<dyn Error>> {
    let search = search()?;
    let ascending = search
        .paginated_results("events", Pagination::new(0, 10), None, &Sort::default())
        .await?;
    assert_eq!(
        ids(&ascending),
        events(&[
            "auction_paris",
            "production_lyon",
            "sale_london",
            "sale_paris",
            "transfer_france"
        ])
    );

    let descending = search
        .paginated_results(
            "events",
            Pagination::new(0, 10),
            None,
            &Sort {
                sort_by: None,
                sort_direction: SortDirection::Desc,
            },
        )
        .await?;
    assert_eq!(
        ids(&descending),
        events(&[
            "sale_paris",
            "sale_london",
            "production_lyon",
            "auction_paris",
            "transfer_france"
        ])
    );
    Ok(())
}

#[tokio::test]
async fn page_objects_carry_only_result_class_properties() -> Result<(), Box<dyn Error>> {
    let page = search()?
        .paginated_results(
            "events",
            Pagination::new(0, 10),
            None,
            &Sort::by("eventTimespan", SortDirection::Desc),
        )
        .await?;
    assert!(page.sparql_query.contains("?orderBy"));
    for event in &page.data {
        let keys: Vec<_> = event.iter().map(|(key, _)| key).collect();
        assert!(!keys.contains(&"orderBy"), "{keys:?}");
        assert!(keys
            .iter()
            .all(|key| ["id", "prefLabel", "eventTimespan", "place", "type", "manuscript", "source"]
                .contains(key)));
    }
    Ok(())
}

#[tokio::test]
async fn timespan_sorts_use_direction_specific_dates() -> Result<(), Box<dyn Error>> {
    let search = search()?;
    let by_start = search
        .paginated_results(
            "events",
            Pagination::new(0, 10),
            None,
            &Sort::by("eventTimespan", SortDirection::Asc),
        )
        .await?;
    assert_eq!(
        ids(&by_start),
        events(&[
            "production_lyon",
            "sale_paris",
            "auction_paris",
            "sale_london",
            "transfer_france"
        ])
    );

    let by_end = search
        .paginated_results(
            "events",
            Pagination::new(0, 10),
            None,
            &Sort::by("eventTimespan", SortDirection::Desc),
        )
        .await?;
    assert_eq!(
        ids(&by_end),
        events(&[
            "auction_paris",
            "production_lyon",
            "sale_london",
            "sale_paris",
            "transfer_france"
        ])
    );
    Ok(())
}

#[tokio::test]
async fn pages_request_their_window() -> Result<(), Box<dyn Error>> {
    let search = search()?;
    let second = search
        .paginated_results("events", Pagination::new(1, 2), None, &Sort::default())
        .await?;
    assert_eq!(ids(&second), events(&["sale_london", "sale_paris"]));

    let last = search
        .paginated_results("events", Pagination::new(2, 2), None, &Sort::default())
        .await?;
    assert!(last.sparql_query.contains("LIMIT 2 OFFSET 4"));
    assert_eq!((last.page, last.page_size), (2, 2));
    assert_eq!(ids(&last), events(&["transfer_france"]));

    let beyond = search
        .paginated_results("events", Pagination::new(2, 10), None, &Sort::default())
        .await?;
    assert!(beyond.sparql_query.contains("LIMIT 10 OFFSET 20"));
    assert!(beyond.data.is_empty());
    Ok(())
}

#[tokio::test]
async fn page_entities_satisfy_the_counted_constraints() -> Result<(), Box<dyn Error>> {
    let search = search()?;
    let paris = format!("{PLACE}paris");
    let constraints = Constraints::new().with("place", Constraint::uris([&paris]));

    let count = search.result_count("events", Some(&constraints)).await?;
    let page = search
        .paginated_results("events", Pagination::new(0, 10), Some(&constraints), &Sort::default())
        .await?;
    assert!(page.data.len() as u64 <= count.count);
    assert!(!page.data.is_empty());
    for event in &page.data {
        let places: Vec<_> = event
            .get("place")
            .map(|place| {
                place
                    .values()
                    .iter()
                    .filter_map(|value| value.as_record()?.id())
                    .collect()
            })
            .unwrap_or_default();
        assert!(places.contains(&paris.as_str()), "{:?} is not in Paris", event.id());
    }
    Ok(())
}

#[tokio::test]
async fn result_sets_nest_related_entities() -> Result<(), Box<dyn Error>> {
    let search = search()?;
    let constraints = Constraints::new().with("prefLabel", Constraint::text("lyon"));
    let page = search
        .paginated_results("events", Pagination::new(0, 10), Some(&constraints), &Sort::default())
        .await?;
    assert_eq!(page.data.len(), 1);
    let manuscript = page.data[0]
        .get("manuscript")
        .and_then(|manuscript| manuscript.values().first())
        .and_then(|manuscript| manuscript.as_record());
    assert_eq!(
        manuscript.and_then(|manuscript| manuscript.get("prefLabel")),
        Some(&facet_search::model::PropertyValue::Single(
            facet_search::model::Value::Term("Psalter".to_owned())
        ))
    );
    Ok(())
}

#[tokio::test]
async fn lookup_constraints_only_restrict_related_instances() -> Result<(), Box<dyn Error>> {
    let search = search()?;
    let lyon = format!("{PLACE}lyon");

    let unfiltered = search
        .instance_by_uri("placesMsProduced", None, None, &lyon)
        .await?;
    let place = unfiltered.data.ok_or("Lyon not found")?;
    assert_eq!(place.id(), Some(lyon.as_str()));
    assert!(place.get("related").is_some());
    assert_eq!(place.get("lat").and_then(|lat| lat.terms().next()), Some("45.75"));

    let constraints = Constraints::new().with("prefLabel", Constraint::text("gospels"));
    let filtered = search
        .instance_by_uri("placesMsProduced", None, Some(&constraints), &lyon)
        .await?;
    let place = filtered.data.ok_or("Lyon not found")?;
    assert_eq!(place.id(), Some(lyon.as_str()));
    assert!(place.get("related").is_none());
    assert!(filtered.sparql_query.contains("?related__id skos:prefLabel ?prefLabelLabel ."));
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_share_the_search() -> Result<(), Box<dyn Error>> {
    let search = search()?;
    let places = ["paris", "lyon", "london", "france"].map(|place| {
        Constraints::new().with("place", Constraint::uris([format!("{PLACE}{place}")]))
    });
    let counts = futures::future::try_join_all(
        places
            .iter()
            .map(|constraints| search.result_count("events", Some(constraints))),
    )
    .await?;
    let counts: Vec<_> = counts.into_iter().map(|result| result.count).collect();
    assert_eq!(counts, vec![2, 1, 1, 1]);
    Ok(())
}
