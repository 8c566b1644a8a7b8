//! The schema of the [Mapping Manuscript Migrations](https://mappingmanuscriptmigrations.org/)
//! portal.
//!
//! Manuscripts, works, events, actors, and places are the result classes. The listings feed the
//! maps, the timeline, and the manuscript network of the portal, the lookups its entity and
//! info-window pages.

use facet_search_model::{
    FacetConfig, ListingQuery, ListingRoute, LookupRoute, PortalSchema, Prefix, ResultClassSpec,
    ResultShape,
};

const PRODUCTION_PLACE: &str = "^crm:P108_has_produced/crm:P7_took_place_at";
const PRODUCTION_TIMESPAN: &str = "^crm:P108_has_produced/crm:P4_has_time-span";
const BIRTH_PLACE: &str = "crm:P98i_was_born/crm:P7_took_place_at";

const MANUSCRIPT_PROPERTIES: &str = "OPTIONAL { ?id skos:prefLabel ?prefLabel }
OPTIONAL {
  ?id ^crm:P108_has_produced/crm:P14_carried_out_by ?author__id .
  OPTIONAL { ?author__id skos:prefLabel ?author__prefLabel }
}
OPTIONAL {
  ?id ^crm:P108_has_produced/crm:P7_took_place_at ?productionPlace__id .
  OPTIONAL { ?productionPlace__id skos:prefLabel ?productionPlace__prefLabel }
}
OPTIONAL {
  ?id ^crm:P108_has_produced/crm:P4_has_time-span ?productionTimespan__id .
  OPTIONAL { ?productionTimespan__id crm:P82a_begin_of_the_begin ?productionTimespan__start }
  OPTIONAL { ?productionTimespan__id crm:P82b_end_of_the_end ?productionTimespan__end }
}
OPTIONAL {
  ?id dct:source ?source__id .
  OPTIONAL { ?source__id skos:prefLabel ?source__prefLabel }
}";

const MANUSCRIPT_INSTANCE_PROPERTIES: &str = "OPTIONAL { ?id skos:prefLabel ?prefLabel }
OPTIONAL {
  ?id crm:P128_carries ?expression__id .
  OPTIONAL { ?expression__id skos:prefLabel ?expression__prefLabel }
}
OPTIONAL {
  ?id crm:P51_has_former_or_current_owner ?owner__id .
  OPTIONAL { ?owner__id skos:prefLabel ?owner__prefLabel }
}
OPTIONAL {
  ?id mmm-schema:last_known_location ?lastKnownLocation__id .
  OPTIONAL { ?lastKnownLocation__id skos:prefLabel ?lastKnownLocation__prefLabel }
}
OPTIONAL {
  ?id ^crm:P46_is_composed_of ?collection__id .
  OPTIONAL { ?collection__id skos:prefLabel ?collection__prefLabel }
}";

const EXPRESSION_PROPERTIES: &str = "OPTIONAL { ?id skos:prefLabel ?prefLabel }
OPTIONAL {
  ?id crm:P72_has_language ?language__id .
  OPTIONAL { ?language__id skos:prefLabel ?language__prefLabel }
}
OPTIONAL {
  ?id ^crm:P128_carries ?manuscript__id .
  OPTIONAL { ?manuscript__id skos:prefLabel ?manuscript__prefLabel }
}";

const COLLECTION_PROPERTIES: &str = "OPTIONAL { ?id skos:prefLabel ?prefLabel }
OPTIONAL {
  ?id crm:P46_is_composed_of ?manuscript__id .
  OPTIONAL { ?manuscript__id skos:prefLabel ?manuscript__prefLabel }
}
OPTIONAL {
  ?id crm:P51_has_former_or_current_owner ?owner__id .
  OPTIONAL { ?owner__id skos:prefLabel ?owner__prefLabel }
}";

const WORK_PROPERTIES: &str = "OPTIONAL { ?id skos:prefLabel ?prefLabel }
OPTIONAL {
  ?id ^frbroo:R16_initiated/crm:P14_carried_out_by ?author__id .
  OPTIONAL { ?author__id skos:prefLabel ?author__prefLabel }
}
OPTIONAL {
  ?id frbroo:R3_is_realised_in/^crm:P128_carries ?manuscript__id .
  OPTIONAL { ?manuscript__id skos:prefLabel ?manuscript__prefLabel }
}
OPTIONAL {
  ?id dct:source ?source__id .
  OPTIONAL { ?source__id skos:prefLabel ?source__prefLabel }
}";

const EVENT_PROPERTIES: &str = "OPTIONAL { ?id skos:prefLabel ?prefLabel }
OPTIONAL {
  ?id rdf:type ?type__id .
  OPTIONAL { ?type__id skos:prefLabel ?type__prefLabel }
}
OPTIONAL {
  ?id crm:P30_transferred_custody_of|crm:P108_has_produced ?manuscript__id .
  OPTIONAL { ?manuscript__id skos:prefLabel ?manuscript__prefLabel }
}
OPTIONAL {
  ?id crm:P4_has_time-span ?eventTimespan__id .
  OPTIONAL { ?eventTimespan__id crm:P82a_begin_of_the_begin ?eventTimespan__start }
  OPTIONAL { ?eventTimespan__id crm:P82b_end_of_the_end ?eventTimespan__end }
}
OPTIONAL {
  ?id crm:P7_took_place_at ?place__id .
  OPTIONAL { ?place__id skos:prefLabel ?place__prefLabel }
}
OPTIONAL {
  ?id dct:source ?source__id .
  OPTIONAL { ?source__id skos:prefLabel ?source__prefLabel }
}";

const ACTOR_PROPERTIES: &str = "OPTIONAL { ?id skos:prefLabel ?prefLabel }
OPTIONAL {
  ?id rdf:type ?type__id .
  OPTIONAL { ?type__id skos:prefLabel ?type__prefLabel }
}
OPTIONAL {
  ?id crm:P98i_was_born/crm:P7_took_place_at ?birthPlace__id .
  OPTIONAL { ?birthPlace__id skos:prefLabel ?birthPlace__prefLabel }
}
OPTIONAL {
  ?id ^crm:P51_has_former_or_current_owner ?manuscript__id .
  OPTIONAL { ?manuscript__id skos:prefLabel ?manuscript__prefLabel }
}
OPTIONAL {
  ?id dct:source ?source__id .
  OPTIONAL { ?source__id skos:prefLabel ?source__prefLabel }
}";

const PLACE_PROPERTIES: &str = "OPTIONAL { ?id skos:prefLabel ?prefLabel }
OPTIONAL {
  ?id gvp:broaderPreferred ?area__id .
  OPTIONAL { ?area__id skos:prefLabel ?area__prefLabel }
}
OPTIONAL {
  ?id dct:source ?source__id .
  OPTIONAL { ?source__id skos:prefLabel ?source__prefLabel }
}";

const PLACE_INSTANCE_PROPERTIES: &str = "OPTIONAL { ?id skos:prefLabel ?prefLabel }
OPTIONAL {
  ?id gvp:broaderPreferred ?area__id .
  OPTIONAL { ?area__id skos:prefLabel ?area__prefLabel }
}
OPTIONAL { ?id wgs84:lat ?lat ; wgs84:long ?long }
OPTIONAL {
  ?id dct:source ?source__id .
  OPTIONAL { ?source__id skos:prefLabel ?source__prefLabel }
}";

const PLACE_INFO_WINDOW_PROPERTIES: &str = "OPTIONAL { ?id skos:prefLabel ?prefLabel }
OPTIONAL { ?id wgs84:lat ?lat ; wgs84:long ?long }";

const MANUSCRIPTS_PRODUCED_AT: &str = "OPTIONAL {
  ?related__id ^crm:P108_has_produced/crm:P7_took_place_at ?id .
  <FILTER>
  OPTIONAL { ?related__id skos:prefLabel ?related__prefLabel }
}";

const LAST_KNOWN_LOCATIONS_AT: &str = "OPTIONAL {
  ?related__id mmm-schema:last_known_location ?id .
  <FILTER>
  OPTIONAL { ?related__id skos:prefLabel ?related__prefLabel }
}";

const ACTORS_AT: &str = "OPTIONAL {
  ?related__id crm:P98i_was_born/crm:P7_took_place_at ?id .
  <FILTER>
  OPTIONAL { ?related__id skos:prefLabel ?related__prefLabel }
}";

const ALL_PLACES_QUERY: &str = "SELECT ?id ?prefLabel ?lat ?long
WHERE {
  <FILTER>
  ?id a crm:E53_Place ;
      wgs84:lat ?lat ;
      wgs84:long ?long .
  OPTIONAL { ?id skos:prefLabel ?prefLabel }
}";

const PRODUCTION_PLACES_QUERY: &str = "SELECT ?id ?prefLabel ?lat ?long (COUNT(DISTINCT ?manuscripts) AS ?instanceCount)
WHERE {
  <FILTER>
  ?manuscripts ^crm:P108_has_produced/crm:P7_took_place_at ?id .
  ?id wgs84:lat ?lat ;
      wgs84:long ?long .
  OPTIONAL { ?id skos:prefLabel ?prefLabel }
}
GROUP BY ?id ?prefLabel ?lat ?long";

const PRODUCTION_COORDINATES_QUERY: &str = "SELECT ?lat ?long
WHERE {
  <FILTER>
  ?manuscripts ^crm:P108_has_produced/crm:P7_took_place_at ?place .
  ?place wgs84:lat ?lat ;
         wgs84:long ?long .
}";

const LAST_KNOWN_LOCATIONS_QUERY: &str = "SELECT ?id ?prefLabel ?lat ?long (COUNT(DISTINCT ?manuscripts) AS ?instanceCount)
WHERE {
  <FILTER>
  ?manuscripts mmm-schema:last_known_location ?id .
  ?id wgs84:lat ?lat ;
      wgs84:long ?long .
  OPTIONAL { ?id skos:prefLabel ?prefLabel }
}
GROUP BY ?id ?prefLabel ?lat ?long";

const PLACES_ACTORS_QUERY: &str = "SELECT ?id ?prefLabel ?lat ?long (COUNT(DISTINCT ?actor__id) AS ?instanceCount)
WHERE {
  <FILTER>
  ?actor__id crm:P98i_was_born/crm:P7_took_place_at ?id .
  ?id wgs84:lat ?lat ;
      wgs84:long ?long .
  OPTIONAL { ?id skos:prefLabel ?prefLabel }
}
GROUP BY ?id ?prefLabel ?lat ?long";

const MIGRATIONS_QUERY: &str = "SELECT DISTINCT ?id ?manuscript__id ?manuscript__prefLabel
  ?from__id ?from__prefLabel ?from__lat ?from__long
  ?to__id ?to__prefLabel ?to__lat ?to__long
WHERE {
  <FILTER>
  ?manuscript__id ^crm:P108_has_produced/crm:P7_took_place_at ?from__id ;
                  mmm-schema:last_known_location ?to__id .
  FILTER(?from__id != ?to__id)
  OPTIONAL { ?manuscript__id skos:prefLabel ?manuscript__prefLabel }
  ?from__id wgs84:lat ?from__lat ;
            wgs84:long ?from__long .
  OPTIONAL { ?from__id skos:prefLabel ?from__prefLabel }
  ?to__id wgs84:lat ?to__lat ;
          wgs84:long ?to__long .
  OPTIONAL { ?to__id skos:prefLabel ?to__prefLabel }
  BIND(CONCAT(STR(?from__id), \" - \", STR(?to__id)) AS ?id)
}";

const EVENT_PLACES_QUERY: &str = "SELECT ?id ?prefLabel ?lat ?long (COUNT(DISTINCT ?event) AS ?instanceCount)
WHERE {
  <FILTER>
  ?event crm:P7_took_place_at ?id .
  ?id wgs84:lat ?lat ;
      wgs84:long ?long .
  OPTIONAL { ?id skos:prefLabel ?prefLabel }
}
GROUP BY ?id ?prefLabel ?lat ?long";

const EVENTS_BY_PERIOD_QUERY: &str = "SELECT ?id ?type__id (COUNT(DISTINCT ?event) AS ?type__instanceCount)
WHERE {
  <PERIODS>
  <FILTER>
  ?event crm:P4_has_time-span/crm:P82a_begin_of_the_begin ?start ;
         rdf:type ?type__id .
  FILTER(?start >= ?periodStart && ?start <= ?periodEnd)
  BIND(?period AS ?id)
}
GROUP BY ?id ?type__id
ORDER BY ?id";

const NETWORK_LINKS_QUERY: &str = "SELECT ?source ?target (COUNT(DISTINCT ?owner) AS ?weight)
WHERE {
  <FILTER>
  ?source a frbroo:F4_Manifestation_Singleton ;
          crm:P51_has_former_or_current_owner ?owner .
  ?target a frbroo:F4_Manifestation_Singleton ;
          crm:P51_has_former_or_current_owner ?owner .
  FILTER(STR(?source) < STR(?target))
}
GROUP BY ?source ?target";

const NETWORK_NODES_QUERY: &str = "SELECT ?id ?prefLabel ?class
WHERE {
  VALUES ?id { <ID_SET> }
  OPTIONAL { ?id skos:prefLabel ?prefLabel }
  BIND(\"manuscript\" AS ?class)
}";

pub fn prefixes() -> Vec<Prefix> {
    vec![
        Prefix::new("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
        Prefix::new("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
        Prefix::new("skos", "http://www.w3.org/2004/02/skos/core#"),
        Prefix::new("xsd", "http://www.w3.org/2001/XMLSchema#"),
        Prefix::new("dct", "http://purl.org/dc/terms/"),
        Prefix::new("crm", "http://erlangen-crm.org/current/"),
        Prefix::new("frbroo", "http://erlangen-crm.org/efrbroo/"),
        Prefix::new("gvp", "http://vocab.getty.edu/ontology#"),
        Prefix::new("wgs84", "http://www.w3.org/2003/01/geo/wgs84_pos#"),
        Prefix::new("mmm-schema", "http://ldf.fi/mmm/schema/"),
    ]
}

fn pref_label() -> FacetConfig {
    FacetConfig::text("prefLabel", "skos:prefLabel").with_priority(1)
}

fn source() -> FacetConfig {
    FacetConfig::uri("source", "dct:source")
        .with_label_path("dct:source/skos:prefLabel")
        .with_priority(9)
}

/// A place facet reached over `path`. It expands to narrower places and filters by map area.
fn place(id: &str, path: &str) -> FacetConfig {
    FacetConfig::uri(id, path)
        .with_label_path(format!("{path}/skos:prefLabel"))
        .with_hierarchy("gvp:broaderPreferred")
        .with_spatial("wgs84:lat", "wgs84:long")
}

fn timespan(id: &str, path: &str) -> FacetConfig {
    FacetConfig::timespan(
        id,
        path,
        "crm:P82a_begin_of_the_begin",
        "crm:P82b_end_of_the_end",
    )
    .with_timespan_sort(
        format!("{path}/crm:P82a_begin_of_the_begin"),
        format!("{path}/crm:P82b_end_of_the_end"),
    )
}

pub fn manuscripts() -> ResultClassSpec {
    ResultClassSpec::new("manuscripts", ["frbroo:F4_Manifestation_Singleton"])
        .with_result_set_properties(MANUSCRIPT_PROPERTIES)
        .with_default_sort_by("prefLabel")
        .with_facet(pref_label())
        .with_facet(
            FacetConfig::uri("author", "^crm:P108_has_produced/crm:P14_carried_out_by")
                .with_label_path("^crm:P108_has_produced/crm:P14_carried_out_by/skos:prefLabel")
                .with_priority(2),
        )
        .with_facet(place("productionPlace", PRODUCTION_PLACE).with_priority(3))
        .with_facet(timespan("productionTimespan", PRODUCTION_TIMESPAN).with_priority(4))
        .with_facet(
            FacetConfig::uri("language", "crm:P128_carries/crm:P72_has_language")
                .with_label_path("crm:P128_carries/crm:P72_has_language/skos:prefLabel")
                .with_priority(5),
        )
        .with_facet(
            FacetConfig::uri("owner", "crm:P51_has_former_or_current_owner")
                .with_label_path("crm:P51_has_former_or_current_owner/skos:prefLabel")
                .with_priority(6),
        )
        .with_facet(place("lastKnownLocation", "mmm-schema:last_known_location").with_priority(7))
        .with_facet(source())
}

pub fn works() -> ResultClassSpec {
    ResultClassSpec::new("works", ["frbroo:F1_Work"])
        .with_result_set_properties(WORK_PROPERTIES)
        .with_default_sort_by("prefLabel")
        .with_facet(pref_label())
        .with_facet(
            FacetConfig::uri("author", "^frbroo:R16_initiated/crm:P14_carried_out_by")
                .with_label_path("^frbroo:R16_initiated/crm:P14_carried_out_by/skos:prefLabel")
                .with_priority(2),
        )
        .with_facet(
            FacetConfig::uri("language", "frbroo:R3_is_realised_in/crm:P72_has_language")
                .with_label_path("frbroo:R3_is_realised_in/crm:P72_has_language/skos:prefLabel")
                .with_priority(3),
        )
        .with_facet(source())
}

pub fn events() -> ResultClassSpec {
    ResultClassSpec::new(
        "events",
        [
            "crm:E10_Transfer_of_Custody",
            "crm:E12_Production",
            "mmm-schema:ManuscriptActivity",
        ],
    )
    .with_result_set_properties(EVENT_PROPERTIES)
    .with_default_sort_by("prefLabel")
    .with_facet(pref_label())
    .with_facet(place("place", "crm:P7_took_place_at").with_priority(1))
    .with_facet(
        FacetConfig::text(
            "manuscript",
            "(crm:P30_transferred_custody_of|crm:P108_has_produced)/skos:prefLabel",
        )
        .with_priority(2),
    )
    .with_facet(timespan("eventTimespan", "crm:P4_has_time-span").with_priority(3))
    .with_facet(
        FacetConfig::uri("type", "rdf:type")
            .with_label_path("rdf:type/skos:prefLabel")
            .with_priority(4),
    )
    .with_facet(source())
}

pub fn actors() -> ResultClassSpec {
    ResultClassSpec::new("actors", ["crm:E21_Person", "crm:E74_Group", "crm:E39_Actor"])
        .with_result_set_properties(ACTOR_PROPERTIES)
        .with_default_sort_by("prefLabel")
        .with_facet(pref_label())
        .with_facet(
            FacetConfig::uri("type", "rdf:type")
                .with_label_path("rdf:type/skos:prefLabel")
                .with_priority(2),
        )
        .with_facet(place("birthPlace", BIRTH_PLACE).with_priority(3))
        .with_facet(source())
}

pub fn places() -> ResultClassSpec {
    ResultClassSpec::new("places", ["crm:E53_Place"])
        .with_result_set_properties(PLACE_PROPERTIES)
        .with_default_sort_by("prefLabel")
        .with_facet(pref_label())
        .with_facet(
            FacetConfig::uri("area", "gvp:broaderPreferred")
                .with_label_path("gvp:broaderPreferred/skos:prefLabel")
                .with_hierarchy("gvp:broaderPreferred")
                .with_priority(2),
        )
        .with_facet(source())
}

/// The listings behind the maps, the timeline, and the network of the portal.
pub fn listings() -> Vec<ListingRoute> {
    let static_query = |query: &str| ListingQuery::Static(query.to_owned());
    vec![
        ListingRoute::new(
            "placesAll",
            "id",
            static_query(ALL_PLACES_QUERY),
            ResultShape::Objects,
        )
        .with_facet_class("places"),
        ListingRoute::new(
            "placesMsProduced",
            "manuscripts",
            static_query(PRODUCTION_COORDINATES_QUERY),
            ResultShape::Coordinates,
        )
        .with_facet_class("manuscripts")
        .with_grouped(static_query(PRODUCTION_PLACES_QUERY), ResultShape::Places),
        ListingRoute::new(
            "lastKnownLocations",
            "manuscripts",
            static_query(LAST_KNOWN_LOCATIONS_QUERY),
            ResultShape::Places,
        )
        .with_facet_class("manuscripts"),
        ListingRoute::new(
            "placesActors",
            "actor__id",
            static_query(PLACES_ACTORS_QUERY),
            ResultShape::Places,
        )
        .with_facet_class("actors"),
        ListingRoute::new(
            "placesMsMigrations",
            "manuscript__id",
            static_query(MIGRATIONS_QUERY),
            ResultShape::Objects,
        )
        .with_facet_class("manuscripts"),
        ListingRoute::new(
            "placesEvents",
            "event",
            static_query(EVENT_PLACES_QUERY),
            ResultShape::Objects,
        )
        .with_facet_class("events")
        .with_grouped(static_query(EVENT_PLACES_QUERY), ResultShape::Places),
        ListingRoute::new(
            "eventsByTimePeriod",
            "event",
            ListingQuery::TimeBuckets {
                template: EVENTS_BY_PERIOD_QUERY.to_owned(),
                start_year: 1600,
                end_year: 1620,
                period_length: 10,
            },
            ResultShape::Objects,
        )
        .with_facet_class("events"),
        ListingRoute::new(
            "manuscriptsNetwork",
            "source",
            static_query(NETWORK_LINKS_QUERY),
            ResultShape::Network {
                nodes_query: NETWORK_NODES_QUERY.to_owned(),
            },
        )
        .with_facet_class("manuscripts"),
    ]
}

/// The entity pages and the info windows of the map markers.
pub fn lookups() -> Vec<LookupRoute> {
    vec![
        LookupRoute::new("manuscripts", MANUSCRIPT_INSTANCE_PROPERTIES),
        LookupRoute::new("expressions", EXPRESSION_PROPERTIES),
        LookupRoute::new("collections", COLLECTION_PROPERTIES),
        LookupRoute::new("works", WORK_PROPERTIES),
        LookupRoute::new("events", EVENT_PROPERTIES),
        LookupRoute::new("actors", ACTOR_PROPERTIES),
        LookupRoute::new("places", PLACE_INSTANCE_PROPERTIES),
        LookupRoute::new("placesAll", PLACE_INFO_WINDOW_PROPERTIES).with_facet_class("places"),
        LookupRoute::new("placesActors", PLACE_INFO_WINDOW_PROPERTIES)
            .with_facet_class("actors")
            .with_related_instances(ACTORS_AT),
        LookupRoute::new("placesMsProduced", PLACE_INFO_WINDOW_PROPERTIES)
            .with_facet_class("manuscripts")
            .with_related_instances(MANUSCRIPTS_PRODUCED_AT),
        LookupRoute::new("lastKnownLocations", PLACE_INFO_WINDOW_PROPERTIES)
            .with_facet_class("manuscripts")
            .with_related_instances(LAST_KNOWN_LOCATIONS_AT),
        LookupRoute::new("placesEvents", PLACE_INFO_WINDOW_PROPERTIES).with_facet_class("events"),
    ]
}

/// The complete portal schema.
pub fn schema() -> PortalSchema {
    PortalSchema {
        prefixes: prefixes(),
        result_classes: vec![manuscripts(), works(), events(), actors(), places()],
        listings: listings(),
        lookups: lookups(),
    }
}
