use crate::cli::{Args, Command, Options};
use anyhow::Context;
use clap::Parser;
use facet_search::compiler::{validate_schema, QueryRequest};
use facet_search::model::{Constraints, Pagination, PortalSchema, Sort};
use facet_search::{mmm, FacetSearch, SearchConfig};
use serde::Serialize;
use std::fs::File;
use std::io::{stderr, stdout, BufReader, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let Args { options, command } = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(stderr)
        .init();

    let search = FacetSearch::with_http(Arc::new(load_schema(&options)?), config(&options));
    tracing::debug!(endpoint = %search.config().endpoint, "Configured the search");
    let constraints = options
        .constraints
        .as_deref()
        .map(serde_json::from_str::<Constraints>)
        .transpose()
        .context("The --constraints option is not a valid constraints object")?;
    let constraints = constraints.as_ref();

    match command {
        Command::Count { result_class } => {
            if options.dry_run {
                return print_query(
                    &search,
                    &QueryRequest::Count {
                        result_class: &result_class,
                        constraints,
                    },
                );
            }
            print_json(&search.result_count(&result_class, constraints).await?)
        }
        Command::Results {
            result_class,
            page,
            page_size,
            sort_by,
            sort_direction,
        } => {
            let pagination = Pagination::new(page, page_size);
            let sort = Sort {
                sort_by,
                sort_direction,
            };
            if options.dry_run {
                return print_query(
                    &search,
                    &QueryRequest::ResultSet {
                        result_class: &result_class,
                        constraints,
                        pagination,
                        sort: &sort,
                    },
                );
            }
            print_json(
                &search
                    .paginated_results(&result_class, pagination, constraints, &sort)
                    .await?,
            )
        }
        Command::All {
            result_class,
            facet_class,
            group_by,
        } => {
            if options.dry_run {
                return print_query(
                    &search,
                    &QueryRequest::Listing {
                        result_class: &result_class,
                        facet_class: facet_class.as_deref(),
                        constraints,
                        group_by,
                    },
                );
            }
            print_json(
                &search
                    .all_results(&result_class, facet_class.as_deref(), constraints, group_by)
                    .await?,
            )
        }
        Command::Instance {
            result_class,
            uri,
            facet_class,
        } => {
            if options.dry_run {
                return print_query(
                    &search,
                    &QueryRequest::Lookup {
                        result_class: &result_class,
                        facet_class: facet_class.as_deref(),
                        constraints,
                        uri: &uri,
                    },
                );
            }
            print_json(
                &search
                    .instance_by_uri(&result_class, facet_class.as_deref(), constraints, &uri)
                    .await?,
            )
        }
    }
}

/// Loads the portal schema and checks it before any request is served.
fn load_schema(options: &Options) -> anyhow::Result<PortalSchema> {
    let Some(path) = &options.schema else {
        let schema = mmm::schema();
        validate_schema(&schema).context("The built-in schema is invalid")?;
        return Ok(schema);
    };
    let file = File::open(path)
        .with_context(|| format!("Failed to open the schema file {}", path.display()))?;
    let schema = PortalSchema::from_json_reader(BufReader::new(file))
        .with_context(|| format!("Invalid schema file {}", path.display()))?;
    validate_schema(&schema)
        .with_context(|| format!("The schema file {} is inconsistent", path.display()))?;
    Ok(schema)
}

fn config(options: &Options) -> SearchConfig {
    let mut config = SearchConfig::default();
    if let Some(endpoint) = &options.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Some(timeout) = options.timeout {
        config = config.with_request_timeout(Duration::from_secs(timeout));
    }
    config
}

fn print_query(search: &FacetSearch, request: &QueryRequest<'_>) -> anyhow::Result<()> {
    let query = search.compile(request)?;
    let mut stdout = stdout().lock();
    writeln!(stdout, "{}", query.text)?;
    Ok(stdout.flush()?)
}

fn print_json(response: &impl Serialize) -> anyhow::Result<()> {
    let mut stdout = stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, response)?;
    writeln!(stdout)?;
    Ok(stdout.flush()?)
}
