use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use facet_search::model::SortDirection;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "facet-search")]
/// Faceted search over a SPARQL endpoint
pub struct Args {
    #[command(flatten)]
    pub options: Options,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs)]
pub struct Options {
    /// SPARQL endpoint the queries are sent to
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    pub endpoint: Option<String>,
    /// Maximal duration of a single query in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
    /// JSON file describing the portal schema
    ///
    /// By default the schema of the Mapping Manuscript Migrations portal is used.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub schema: Option<PathBuf>,
    /// Active constraints as a JSON object keyed by facet id
    ///
    /// For example: {"place": {"uriFilter": ["http://ldf.fi/mmm/place/tgn_7008038"], "selectAlsoSubconcepts": true}}
    #[arg(short, long, global = true)]
    pub constraints: Option<String>,
    /// Print the assembled query instead of executing it
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Count the instances of a result class
    Count {
        /// Result class to count
        result_class: String,
    },
    /// Fetch one sorted page of a result class
    Results {
        /// Result class to page through
        result_class: String,
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u64,
        /// Number of entities per page
        #[arg(long, default_value_t = 10)]
        page_size: u64,
        /// Facet to sort by
        ///
        /// By default the result class' own sort key is used.
        #[arg(long)]
        sort_by: Option<String>,
        /// Sort direction, "asc" or "desc"
        #[arg(long, default_value_t = SortDirection::Asc)]
        sort_direction: SortDirection,
    },
    /// Run the unpaginated listing of a result class
    All {
        /// Listing to run
        result_class: String,
        /// Facet class the constraints belong to
        #[arg(long)]
        facet_class: Option<String>,
        /// Aggregate the rows, for listings that support it
        #[arg(long)]
        group_by: bool,
    },
    /// Look up a single entity and its related instances
    Instance {
        /// Result class of the entity
        result_class: String,
        /// IRI of the entity
        #[arg(value_hint = ValueHint::Url)]
        uri: String,
        /// Facet class the constraints belong to
        #[arg(long)]
        facet_class: Option<String>,
    },
}
