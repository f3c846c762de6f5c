//! Rich diagnostic error types for the provdal engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. Query errors additionally carry the HTTP
//! status code the DAL protocol assigns to them.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the provdal engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum ProvError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("duplicate {kind} id: {id}")]
    #[diagnostic(
        code(provdal::store::duplicate_id),
        help("Every id must be unique within its record kind. Rename one of the records.")
    )]
    DuplicateId { kind: &'static str, id: String },

    #[error("{relation} {id}: {endpoint} endpoint \"{target}\" does not resolve to a known node")]
    #[diagnostic(
        code(provdal::store::unknown_endpoint),
        help(
            "Both endpoints of a relation must reference nodes that were ingested \
             before the relation. Check the dataset for a typo in the referenced id, \
             or add the missing node record."
        )
    )]
    UnknownEndpoint {
        relation: &'static str,
        id: String,
        endpoint: &'static str,
        target: String,
    },

    #[error("failed to read dataset file: {source}")]
    #[diagnostic(
        code(provdal::store::io),
        help("Check that the dataset path exists and is readable.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("dataset parse error: {source}")]
    #[diagnostic(
        code(provdal::store::parse),
        help("The dataset must be a JSON object with one array per record kind.")
    )]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

/// Errors raised while resolving ProvDAL request parameters.
///
/// The variants map onto the DAL status codes: everything malformed is 400,
/// an explicit format clashing with the `Accept` header is 406, and an
/// unknown format or an `Accept` header matching nothing supported is 415.
#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("the ID parameter is required")]
    #[diagnostic(
        code(provdal::query::missing_id),
        help("Pass at least one ID=<identifier> parameter.")
    )]
    MissingId,

    #[error("parameter {name} must occur only once or not at all")]
    #[diagnostic(
        code(provdal::query::duplicate_parameter),
        help("Only ID may be repeated; every other parameter is single-valued.")
    )]
    DuplicateParameter { name: String },

    #[error("{} {} {} not supported by this service",
        if .names.len() == 1 { "parameter" } else { "parameters" },
        .names.join(", "),
        if .names.len() == 1 { "is" } else { "are" })]
    #[diagnostic(
        code(provdal::query::unknown_parameter),
        help(
            "Recognized parameters are ID, DEPTH, DIRECTION, RESPONSEFORMAT, \
             MODEL, MEMBERS, STEPS and AGENT (case-insensitive)."
        )
    )]
    UnknownParameters { names: Vec<String> },

    #[error("invalid value for parameter {name}: {value}")]
    #[diagnostic(
        code(provdal::query::invalid_value),
        help(
            "DEPTH takes ALL or a non-negative integer, DIRECTION takes BACK or \
             FORTH, MODEL takes IVOA or W3C, and the flag parameters take \
             TRUE/1 or FALSE/0."
        )
    )]
    InvalidValue { name: &'static str, value: String },

    #[error("format {format} is not acceptable for Accept header \"{accept}\"")]
    #[diagnostic(
        code(provdal::query::not_acceptable),
        help(
            "The requested RESPONSEFORMAT produces a media type the Accept \
             header rules out. Relax the Accept header or request another format."
        )
    )]
    NotAcceptable { format: &'static str, accept: String },

    #[error("unknown format {format} was requested, cannot handle this")]
    #[diagnostic(
        code(provdal::query::unsupported_format),
        help("Supported formats: PROV-N, PROV-JSON, PROV-XML, GRAPH, GRAPH-JSON.")
    )]
    UnsupportedFormat { format: String },

    #[error("no supported media type matches Accept header \"{accept}\"")]
    #[diagnostic(
        code(provdal::query::unsupported_media_type),
        help("The service produces text/plain, application/json and text/xml.")
    )]
    UnsupportedAccept { accept: String },
}

impl QueryError {
    /// HTTP status code the DAL protocol assigns to this error.
    pub fn http_status(&self) -> u16 {
        match self {
            QueryError::MissingId
            | QueryError::DuplicateParameter { .. }
            | QueryError::UnknownParameters { .. }
            | QueryError::InvalidValue { .. } => 400,
            QueryError::NotAcceptable { .. } => 406,
            QueryError::UnsupportedFormat { .. } | QueryError::UnsupportedAccept { .. } => 415,
        }
    }
}

// ---------------------------------------------------------------------------
// Render errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("JSON encoding error: {source}")]
    #[diagnostic(code(provdal::render::json))]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("XML encoding error: {source}")]
    #[diagnostic(code(provdal::render::xml))]
    Xml {
        #[source]
        source: std::io::Error,
    },

    #[error("relation {relation} references node {id} that is missing from the node list")]
    #[diagnostic(
        code(provdal::render::dangling_link),
        help(
            "The graph view resolves relation endpoints against the serialized \
             node buckets. A miss here means the document was assembled without \
             one of the endpoints."
        )
    )]
    DanglingLink { relation: &'static str, id: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    #[diagnostic(
        code(provdal::config::io),
        help("Check that the path exists and has read permissions.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {source}")]
    #[diagnostic(
        code(provdal::config::parse),
        help("The config file must be valid TOML; see the README for the schema.")
    )]
    Parse {
        #[source]
        source: toml::de::Error,
    },
}

/// Convenience alias for functions returning provdal results.
pub type ProvResult<T> = std::result::Result<T, ProvError>;
