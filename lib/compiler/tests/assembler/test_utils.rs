use facet_search_model::{
    FacetConfig, ListingQuery, ListingRoute, LookupRoute, PortalSchema, Prefix, ResultClassSpec,
    ResultShape,
};

pub const PLACES_EVENTS: &str = "
SELECT ?id ?prefLabel (COUNT(DISTINCT ?event) AS ?instanceCount)
WHERE {
  <FILTER>
  ?event crm:P7_took_place_at ?id .
  ?id skos:prefLabel ?prefLabel .
}
GROUP BY ?id ?prefLabel";

pub const EVENTS_BY_PERIOD: &str = "
SELECT ?id ?period (COUNT(DISTINCT ?event) AS ?instanceCount)
WHERE {
  <PERIODS>
  <FILTER>
  ?event crm:P4_has_time-span/crm:P82a_begin_of_the_begin ?start .
  FILTER(?start >= ?periodStart && ?start <= ?periodEnd)
  BIND(?period AS ?id)
}
GROUP BY ?id ?period";

pub fn schema() -> PortalSchema {
    PortalSchema {
        prefixes: vec![
            Prefix::new("crm", "http://erlangen-crm.org/current/"),
            Prefix::new("skos", "http://www.w3.org/2004/02/skos/core#"),
        ],
        result_classes: vec![ResultClassSpec::new(
            "events",
            ["crm:E10_Transfer_of_Custody", "crm:E12_Production"],
        )
        .with_result_set_properties("OPTIONAL { ?id skos:prefLabel ?prefLabel }")
        .with_facet(FacetConfig::text("prefLabel", "skos:prefLabel"))
        .with_facet(
            FacetConfig::uri("place", "crm:P7_took_place_at").with_hierarchy("crm:P89_falls_within"),
        )
        .with_facet(
            FacetConfig::timespan(
                "eventTimespan",
                "crm:P4_has_time-span",
                "crm:P82a_begin_of_the_begin",
                "crm:P82b_end_of_the_end",
            )
            .with_timespan_sort(
                "crm:P4_has_time-span/crm:P82a_begin_of_the_begin",
                "crm:P4_has_time-span/crm:P82b_end_of_the_end",
            ),
        )],
        listings: vec![
            ListingRoute::new(
                "placesEvents",
                "event",
                ListingQuery::Static(PLACES_EVENTS.to_owned()),
                ResultShape::Objects,
            )
            .with_facet_class("events")
            .with_grouped(ListingQuery::Static(PLACES_EVENTS.to_owned()), ResultShape::Places),
            ListingRoute::new(
                "eventsByTimePeriod",
                "event",
                ListingQuery::TimeBuckets {
                    template: EVENTS_BY_PERIOD.to_owned(),
                    start_year: 1600,
                    end_year: 1620,
                    period_length: 10,
                },
                ResultShape::Objects,
            )
            .with_facet_class("events"),
        ],
        lookups: vec![
            LookupRoute::new("places", "OPTIONAL { ?id skos:prefLabel ?prefLabel }")
                .with_facet_class("events")
                .with_related_instances(
                    "OPTIONAL {\n  ?related__id crm:P7_took_place_at ?id .\n  <FILTER>\n}",
                ),
            LookupRoute::new("events", "OPTIONAL { ?id skos:prefLabel ?prefLabel }"),
        ],
    }
}
