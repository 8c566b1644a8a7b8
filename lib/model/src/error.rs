use oxiri::IriParseError;
use std::error::Error;
use std::fmt;

/// The result type used throughout the facet search crates.
pub type FacetSearchResult<T> = Result<T, FacetSearchError>;

/// An error raised while compiling, executing, or mapping a faceted query.
///
/// Every kind halts the current request. No partial results are returned.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FacetSearchError {
    /// The deployed schema is missing something the request needs.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The request carries a malformed value.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The query endpoint could not be reached or returned garbage.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    /// The returned rows do not have the expected shape.
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// The coarse kind of a [`FacetSearchError`], used by callers to choose a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Execution,
    Mapping,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Validation => "validation",
            ErrorKind::Execution => "execution",
            ErrorKind::Mapping => "mapping",
        })
    }
}

impl FacetSearchError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FacetSearchError::Configuration(_) => ErrorKind::Configuration,
            FacetSearchError::Validation(_) => ErrorKind::Validation,
            FacetSearchError::Execution(_) => ErrorKind::Execution,
            FacetSearchError::Mapping(_) => ErrorKind::Mapping,
        }
    }

    /// Only execution failures may succeed when the same request is sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FacetSearchError::Execution(_))
    }
}

/// A deployment bug: the schema does not describe what the request needs.
///
/// These errors must not be retried.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// No result class with this id exists in the schema.
    #[error("Unknown result class '{0}'")]
    UnknownResultClass(String),
    /// The facet class has no facet with this id.
    #[error("Facet '{facet}' is not defined for facet class '{facet_class}'")]
    UnknownFacet { facet_class: String, facet: String },
    /// The facet exists, but it has no predicate path to filter on.
    #[error("Facet '{facet}' of facet class '{facet_class}' has no predicate path")]
    MissingPredicate { facet_class: String, facet: String },
    /// A filter kind needs a property the facet does not configure.
    #[error("Facet '{facet}' of facet class '{facet_class}' has no {property}")]
    MissingFacetProperty {
        facet_class: String,
        facet: String,
        property: &'static str,
    },
    /// The result class cannot be sorted by this key.
    #[error("Result class '{result_class}' cannot be sorted by '{sort_by}'")]
    UnknownSortKey {
        result_class: String,
        sort_by: String,
    },
    /// No listing query is registered for the result class.
    #[error("No listing query is registered for result class '{0}'")]
    UnknownListing(String),
    /// No instance query is registered for the result class.
    #[error("No instance query is registered for result class '{0}'")]
    UnknownLookup(String),
    /// A template still contains a placeholder after substitution.
    #[error("Placeholder '{placeholder}' is unresolved in the {template} query")]
    UnresolvedPlaceholder {
        template: String,
        placeholder: String,
    },
    /// A facet id cannot be turned into a query variable.
    #[error("'{0}' cannot be used as a query variable name")]
    InvalidVariableName(String),
    /// A property path of the schema is not valid SPARQL.
    #[error("Invalid property path '{path}' in {location}: {message}")]
    InvalidPropertyPath {
        location: String,
        path: String,
        message: String,
    },
    /// The assembled query is not valid SPARQL.
    #[error("The assembled {template} query is not valid SPARQL: {message}")]
    InvalidQuery { template: String, message: String },
    /// The schema document could not be read.
    #[error("Could not load the portal schema: {0}")]
    Schema(#[source] Box<dyn Error + Send + Sync + 'static>),
}

/// The request is malformed. It is rejected before anything is executed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The constraint value does not fit the facet's filter type.
    #[error("Facet '{facet}' expects a {expected} but a {actual} was given")]
    FilterTypeMismatch {
        facet: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// A user supplied IRI is not a valid IRI.
    #[error("Invalid IRI '{iri}': {error}")]
    InvalidIri {
        iri: String,
        #[source]
        error: IriParseError,
    },
    /// A time bound is neither a year nor an `xsd:date`.
    #[error("Invalid time bound '{0}', expected a year or a YYYY-MM-DD date")]
    InvalidTimeBound(String),
    /// The lower time bound is after the upper one.
    #[error("Time range of facet '{facet}' starts at {min} after it ends at {max}")]
    InvertedTimeRange {
        facet: String,
        min: String,
        max: String,
    },
    /// The bounding box is not usable.
    #[error("Invalid bounding box for facet '{facet}': {reason}")]
    InvalidBoundingBox { facet: String, reason: &'static str },
    /// Pages must hold at least one row.
    #[error("The page size must be greater than zero")]
    EmptyPage,
    /// `page * page_size` does not fit into the offset.
    #[error("Page {page} with page size {page_size} is out of range")]
    PageOutOfRange { page: u64, page_size: u64 },
}

/// The executor could not produce rows. The caller may retry.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExecutionError {
    /// The endpoint could not be reached.
    #[error("Could not send the query to '{endpoint}': {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn Error + Send + Sync + 'static>,
    },
    /// The endpoint did not answer in time.
    #[error("The query to '{endpoint}' timed out")]
    Timeout { endpoint: String },
    /// The endpoint answered with an error status.
    #[error("The endpoint '{endpoint}' answered with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response body is not a SPARQL results document.
    #[error("Could not parse the results returned by '{endpoint}': {source}")]
    Parse {
        endpoint: String,
        #[source]
        source: Box<dyn Error + Send + Sync + 'static>,
    },
    /// The endpoint returned a boolean or a graph instead of solutions.
    #[error("The endpoint '{0}' did not return solutions")]
    NotSolutions(String),
}

/// The rows returned by the executor do not match the projection.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MappingError {
    /// A column every row must bind is unbound or absent.
    #[error("Expected column '{column}' is missing in row {row}")]
    MissingColumn { column: &'static str, row: usize },
    /// A column could not be parsed into the expected type.
    #[error("Column '{column}' in row {row} holds '{value}' which is not a valid {expected}")]
    InvalidValue {
        column: &'static str,
        row: usize,
        value: String,
        expected: &'static str,
    },
    /// A scalar query returned no rows.
    #[error("Expected a single row but the result is empty")]
    EmptyResult,
    /// The rows of a single listing query cannot take this shape.
    #[error("The rows of a listing query cannot be mapped into the {0} shape")]
    UnsupportedShape(&'static str),
}
