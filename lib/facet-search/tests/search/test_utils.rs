use async_trait::async_trait;
use facet_search::execution::{parse_solutions, QueryExecutor, QuerySolution};
use facet_search::model::ExecutionError;
use facet_search::{mmm, FacetSearch, SearchConfig};
use oxigraph::io::RdfFormat;
use oxigraph::sparql::results::QueryResultsFormat;
use oxigraph::store::Store;
use std::error::Error;
use std::sync::Arc;

pub const ENDPOINT: &str = "http://localhost:7878/sparql";

pub const PLACE: &str = "http://ldf.fi/mmm/place/";
pub const EVENT: &str = "http://ldf.fi/mmm/event/";
pub const MANUSCRIPT: &str = "http://ldf.fi/mmm/manifestation_singleton/";

/// Five events at places within France and in London, with open and closed time-spans. The
/// transfer in France has neither a label nor a time-span.
const DATA: &str = r#"
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix crm: <http://erlangen-crm.org/current/> .
@prefix frbroo: <http://erlangen-crm.org/efrbroo/> .
@prefix gvp: <http://vocab.getty.edu/ontology#> .
@prefix wgs84: <http://www.w3.org/2003/01/geo/wgs84_pos#> .
@prefix mmm-schema: <http://ldf.fi/mmm/schema/> .
@prefix place: <http://ldf.fi/mmm/place/> .
@prefix event: <http://ldf.fi/mmm/event/> .
@prefix time: <http://ldf.fi/mmm/time/> .
@prefix ms: <http://ldf.fi/mmm/manifestation_singleton/> .
@prefix actor: <http://ldf.fi/mmm/actor/> .

place:france a crm:E53_Place ; skos:prefLabel "France" ; wgs84:lat 46.0 ; wgs84:long 2.0 .
place:paris a crm:E53_Place ; skos:prefLabel "Paris" ; gvp:broaderPreferred place:france ;
    wgs84:lat 48.8567 ; wgs84:long 2.3508 .
place:lyon a crm:E53_Place ; skos:prefLabel "Lyon" ; gvp:broaderPreferred place:france ;
    wgs84:lat 45.75 ; wgs84:long 4.85 .
place:london a crm:E53_Place ; skos:prefLabel "London" ; wgs84:lat 51.5072 ; wgs84:long -0.1276 .

event:sale_paris a crm:E10_Transfer_of_Custody ;
    skos:prefLabel "Sale in Paris" ;
    crm:P7_took_place_at place:paris ;
    crm:P30_transferred_custody_of ms:gospels ;
    crm:P4_has_time-span time:sale_paris .
time:sale_paris crm:P82a_begin_of_the_begin "1610-01-01"^^xsd:date .

event:sale_london a crm:E10_Transfer_of_Custody ;
    skos:prefLabel "Sale in London" ;
    crm:P7_took_place_at place:london ;
    crm:P4_has_time-span time:sale_london .
time:sale_london crm:P82b_end_of_the_end "1595-12-31"^^xsd:date .

event:production_lyon a crm:E12_Production ;
    skos:prefLabel "Production in Lyon" ;
    crm:P7_took_place_at place:lyon ;
    crm:P108_has_produced ms:psalter ;
    crm:P4_has_time-span time:production_lyon .
time:production_lyon crm:P82a_begin_of_the_begin "1590-01-01"^^xsd:date ;
    crm:P82b_end_of_the_end "1605-12-31"^^xsd:date .

event:auction_paris a crm:E10_Transfer_of_Custody ;
    skos:prefLabel "Auction in Paris" ;
    crm:P7_took_place_at place:paris ;
    crm:P4_has_time-span time:auction_paris .
time:auction_paris crm:P82a_begin_of_the_begin "1625-01-01"^^xsd:date ;
    crm:P82b_end_of_the_end "1626-12-31"^^xsd:date .

event:transfer_france a crm:E10_Transfer_of_Custody ;
    crm:P7_took_place_at place:france .

ms:gospels a frbroo:F4_Manifestation_Singleton ;
    skos:prefLabel "Gospels" ;
    crm:P51_has_former_or_current_owner actor:phillipps .
ms:psalter a frbroo:F4_Manifestation_Singleton ;
    skos:prefLabel "Psalter" ;
    crm:P51_has_former_or_current_owner actor:phillipps , actor:cotton ;
    mmm-schema:last_known_location place:london .
ms:hours a frbroo:F4_Manifestation_Singleton ;
    skos:prefLabel "Book of Hours" ;
    crm:P51_has_former_or_current_owner actor:cotton .

actor:phillipps a crm:E21_Person ; skos:prefLabel "Thomas Phillipps" .
actor:cotton a crm:E21_Person ; skos:prefLabel "Robert Cotton" .
"#;

/// Evaluates queries with an in-memory store.
///
/// The results travel through their JSON serialization, like the results of a remote endpoint.
pub struct StoreExecutor {
    store: Store,
}

impl StoreExecutor {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let store = Store::new()?;
        store.load_from_reader(RdfFormat::Turtle, DATA.as_bytes())?;
        Ok(Self { store })
    }
}

#[async_trait]
impl QueryExecutor for StoreExecutor {
    async fn execute(
        &self,
        query: &str,
        endpoint: &str,
    ) -> Result<Vec<QuerySolution>, ExecutionError> {
        let transport = |error: oxigraph::sparql::EvaluationError| ExecutionError::Transport {
            endpoint: endpoint.to_owned(),
            source: Box::new(error),
        };
        let body = self
            .store
            .query(query)
            .map_err(transport)?
            .write(Vec::new(), QueryResultsFormat::Json)
            .map_err(transport)?;
        parse_solutions(endpoint, &body)
    }
}

/// Fails every query that contains `marker` and delegates the others.
pub struct FailingExecutor {
    inner: StoreExecutor,
    marker: &'static str,
}

impl FailingExecutor {
    pub fn new(marker: &'static str) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            inner: StoreExecutor::new()?,
            marker,
        })
    }
}

#[async_trait]
impl QueryExecutor for FailingExecutor {
    async fn execute(
        &self,
        query: &str,
        endpoint: &str,
    ) -> Result<Vec<QuerySolution>, ExecutionError> {
        if query.contains(self.marker) {
            return Err(ExecutionError::Timeout {
                endpoint: endpoint.to_owned(),
            });
        }
        self.inner.execute(query, endpoint).await
    }
}

/// Answers every query with the same results document.
pub struct CannedExecutor(pub &'static str);

#[async_trait]
impl QueryExecutor for CannedExecutor {
    async fn execute(
        &self,
        _query: &str,
        endpoint: &str,
    ) -> Result<Vec<QuerySolution>, ExecutionError> {
        parse_solutions(endpoint, self.0.as_bytes())
    }
}

pub fn search_with(executor: impl QueryExecutor + 'static) -> FacetSearch {
    FacetSearch::new(
        Arc::new(mmm::schema()),
        Arc::new(executor),
        SearchConfig::default().with_endpoint(ENDPOINT),
    )
}

pub fn search() -> Result<FacetSearch, Box<dyn Error>> {
    Ok(search_with(StoreExecutor::new()?))
}
