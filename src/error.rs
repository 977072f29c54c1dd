//! Error types for the boundary operations of Quarry.
//!
//! Query evaluation itself is fail-soft and never returns these errors; they are
//! produced by data loading, query/config file handling, the raw endpoint client
//! and result serialization.

use thiserror::Error;

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;

/// Main error type for Quarry
#[derive(Error, Debug)]
pub enum QuarryError {
    /// Malformed N-Triples/N-Quads input
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Query description could not be read
    #[error("Query error: {0}")]
    QueryError(String),

    /// SPARQL results payload could not be read or written
    #[error("Results error: {0}")]
    ResultsError(String),

    /// Backing store error
    #[error("Store error: {0}")]
    StoreError(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Invalid IRI or term
    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for QuarryError {
    fn from(err: std::io::Error) -> Self {
        QuarryError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for QuarryError {
    fn from(err: serde_json::Error) -> Self {
        QuarryError::QueryError(err.to_string())
    }
}

impl From<reqwest::Error> for QuarryError {
    fn from(err: reqwest::Error) -> Self {
        QuarryError::HttpError(err.to_string())
    }
}

impl From<sparesults::QueryResultsParseError> for QuarryError {
    fn from(err: sparesults::QueryResultsParseError) -> Self {
        QuarryError::ResultsError(err.to_string())
    }
}

impl From<oxigraph::store::StorageError> for QuarryError {
    fn from(err: oxigraph::store::StorageError) -> Self {
        QuarryError::StoreError(err.to_string())
    }
}

impl From<csv::Error> for QuarryError {
    fn from(err: csv::Error) -> Self {
        QuarryError::ResultsError(err.to_string())
    }
}
