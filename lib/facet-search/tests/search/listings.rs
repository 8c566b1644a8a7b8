use crate::test_utils::{search, MANUSCRIPT, PLACE};
use facet_search::model::{
    Constraint, Constraints, Coordinates, ListingData, NetworkGraph, NetworkLink, Place, Record,
};
use std::error::Error;

#[tokio::test]
async fn production_places_are_grouped_on_request() -> Result<(), Box<dyn Error>> {
    let search = search()?;

    let grouped = search
        .all_results("placesMsProduced", None, None, true)
        .await?;
    assert_eq!(
        grouped.data,
        ListingData::Places(vec![Place {
            id: format!("{PLACE}lyon"),
            pref_label: Some("Lyon".to_owned()),
            location: Coordinates {
                lat: 45.75,
                long: 4.85
            },
            instance_count: Some(1),
        }])
    );

    let coordinates = search
        .all_results("placesMsProduced", None, None, false)
        .await?;
    assert_eq!(
        coordinates.data,
        ListingData::Coordinates(vec![Coordinates {
            lat: 45.75,
            long: 4.85
        }])
    );
    Ok(())
}

#[tokio::test]
async fn listing_constraints_bind_to_the_route_target() -> Result<(), Box<dyn Error>> {
    let constraints = Constraints::new().with("prefLabel", Constraint::text("gospels"));
    let result = search()?
        .all_results("placesMsProduced", None, Some(&constraints), true)
        .await?;
    assert_eq!(result.data, ListingData::Places(Vec::new()));
    assert!(result
        .sparql_query
        .contains("?manuscripts skos:prefLabel ?prefLabelLabel ."));
    Ok(())
}

#[tokio::test]
async fn last_known_locations_count_manuscripts() -> Result<(), Box<dyn Error>> {
    let result = search()?
        .all_results("lastKnownLocations", None, None, false)
        .await?;
    let ListingData::Places(places) = result.data else {
        return Err("expected places".into());
    };
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].id, format!("{PLACE}london"));
    assert_eq!(places[0].instance_count, Some(1));
    Ok(())
}

#[tokio::test]
async fn migrations_nest_both_places() -> Result<(), Box<dyn Error>> {
    let result = search()?
        .all_results("placesMsMigrations", None, None, false)
        .await?;
    let ListingData::Objects(migrations) = result.data else {
        return Err("expected objects".into());
    };
    assert_eq!(migrations.len(), 1);
    let label = |key: &str| {
        migrations[0]
            .get(key)
            .and_then(|place| place.values().first())
            .and_then(|place| place.as_record())
            .and_then(|place| place.get("prefLabel"))
            .and_then(|label| label.terms().next())
            .map(str::to_owned)
    };
    assert_eq!(label("from").as_deref(), Some("Lyon"));
    assert_eq!(label("to").as_deref(), Some("London"));
    assert_eq!(label("manuscript").as_deref(), Some("Psalter"));
    Ok(())
}

#[tokio::test]
async fn events_are_bucketed_by_period() -> Result<(), Box<dyn Error>> {
    let result = search()?
        .all_results("eventsByTimePeriod", None, None, false)
        .await?;
    let ListingData::Objects(periods) = result.data else {
        return Err("expected objects".into());
    };
    let ids: Vec<_> = periods.iter().filter_map(Record::id).collect();
    assert_eq!(ids, vec!["1610-1619", "1620-1629"]);
    assert!(result.sparql_query.contains("(\"1600-1609\" "));
    Ok(())
}

#[tokio::test]
async fn network_fetches_the_nodes_of_its_links() -> Result<(), Box<dyn Error>> {
    let result = search()?
        .all_results("manuscriptsNetwork", None, None, false)
        .await?;
    let ListingData::Network(mut network) = result.data else {
        return Err("expected a network".into());
    };

    network.links.sort_by(|a, b| a.source.cmp(&b.source));
    let link = |source: &str| NetworkLink {
        source: format!("{MANUSCRIPT}{source}"),
        target: format!("{MANUSCRIPT}psalter"),
        weight: Some(1),
    };
    assert_eq!(network.links, vec![link("gospels"), link("hours")]);

    let mut labels: Vec<_> = network
        .nodes
        .iter()
        .filter_map(|node| node.pref_label.as_deref())
        .collect();
    labels.sort_unstable();
    assert_eq!(labels, vec!["Book of Hours", "Gospels", "Psalter"]);
    assert!(network
        .nodes
        .iter()
        .all(|node| node.class.as_deref() == Some("manuscript")));

    let (links_query, nodes_query) = result
        .sparql_query
        .split_once("\n\n")
        .ok_or("the nodes query is missing")?;
    assert!(links_query.contains("(COUNT(DISTINCT ?owner) AS ?weight)"));
    assert!(nodes_query.contains(&format!("<{MANUSCRIPT}psalter>")));
    Ok(())
}

#[tokio::test]
async fn network_without_links_skips_the_nodes_query() -> Result<(), Box<dyn Error>> {
    let constraints = Constraints::new().with("prefLabel", Constraint::text("psalter"));
    let result = search()?
        .all_results("manuscriptsNetwork", None, Some(&constraints), false)
        .await?;
    assert_eq!(result.data, ListingData::Network(NetworkGraph::default()));
    assert!(!result.sparql_query.contains("VALUES ?id"));
    assert!(result
        .sparql_query
        .contains("?source skos:prefLabel ?prefLabelLabel ."));
    Ok(())
}
